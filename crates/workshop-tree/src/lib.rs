//! ---
//! ems_section: "02-parameter-tree"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Path-addressable parameter tree."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Typed parameter tree addressed by `/`-separated paths.
//!
//! The tree never captures domain state. Accessor leaves carry a field tag that is
//! dispatched through a [`ParamSource`] implemented by whoever owns the state, so the
//! owner stays the sole writer of its fields.
#![warn(missing_docs)]

pub mod error;
pub mod metadata;
pub mod node;
pub mod path;
pub mod tree;
pub mod value;

pub use error::{FieldError, TreeError};
pub use metadata::Metadata;
pub use node::{Access, Branch, Node, ParamSource};
pub use tree::{BoundsPolicy, ParameterTree};
pub use value::ValueKind;
