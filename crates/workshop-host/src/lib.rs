//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Adapter contract and host runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Host side of the adapter contract.
//!
//! Adapters are plain synchronous objects. The [`AdapterHost`] owns all of them on a
//! single tokio task which serves get/set requests and fires scheduled ticks in turn,
//! so adapter state is never touched concurrently and needs no locks.

pub mod adapter;
pub mod catalog;
pub mod error;
pub mod host;

pub use adapter::{Adapter, AdapterDirectory, AdapterHandle};
pub use catalog::{AdapterCatalog, AdapterFactory};
pub use error::{AdapterError, HostError};
pub use host::{AdapterHost, HostHandle, HostRuntime};
