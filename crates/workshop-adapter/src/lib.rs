//! ---
//! ems_section: "03-adapters"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Workshop controller and adapter."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! The workshop adapter: a small demonstration device exposing strings, bounded
//! numbers, computed values, a selection, a toggle and a write-only trigger through a
//! [`workshop_tree::ParameterTree`], with one value refreshed on a fixed interval.

pub mod adapter;
pub mod controller;
pub mod error;
pub mod options;
pub mod state;

pub use adapter::WorkshopAdapter;
pub use controller::WorkshopController;
pub use error::ControllerError;
pub use options::WorkshopOptions;
pub use state::{Field, WorkshopState};

/// Module name under which the adapter registers in an adapter catalog.
pub const MODULE_NAME: &str = "workshop";
