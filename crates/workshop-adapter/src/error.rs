//! ---
//! ems_section: "03-adapters"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Workshop controller and adapter."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use thiserror::Error;
use workshop_tree::TreeError;

/// Errors surfaced by [`crate::WorkshopController`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControllerError {
    /// Addressing failure from the parameter tree, message unchanged.
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("invalid workshop options: {0}")]
    Options(String),
}

impl ControllerError {
    pub(crate) fn options(message: impl Into<String>) -> Self {
        Self::Options(message.into())
    }
}
