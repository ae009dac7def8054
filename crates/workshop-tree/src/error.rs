//! ---
//! ems_section: "02-parameter-tree"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Path-addressable parameter tree."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use serde_json::Value;
use thiserror::Error;

/// Result alias used by tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Addressing failures raised by [`crate::ParameterTree`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    /// The path does not resolve to a node.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    /// A write targeted a leaf without a setter.
    #[error("Parameter {0} is read-only")]
    ReadOnly(String),
    /// A read targeted a leaf without a getter.
    #[error("Parameter {0} is write-only")]
    WriteOnly(String),
    /// The supplied value kind does not match the leaf.
    #[error("Type mismatch setting {path}: got {actual} expected {expected}")]
    TypeMismatch {
        /// Path of the leaf being written.
        path: String,
        /// Kind currently held by the leaf.
        expected: &'static str,
        /// Kind supplied by the caller.
        actual: &'static str,
    },
    /// Data for a branch path was not a mapping.
    #[error("Cannot set {path}: expected a mapping of child names, got {actual}")]
    NotABranch {
        /// Path of the branch being written.
        path: String,
        /// Kind supplied by the caller.
        actual: &'static str,
    },
    /// An enforced lower bound was violated.
    #[error("{path}: value {value} is below the minimum of {min}")]
    BelowMinimum {
        /// Path of the leaf being written.
        path: String,
        /// Rejected value.
        value: Value,
        /// Declared minimum.
        min: Value,
    },
    /// An enforced upper bound was violated.
    #[error("{path}: value {value} is above the maximum of {max}")]
    AboveMaximum {
        /// Path of the leaf being written.
        path: String,
        /// Rejected value.
        value: Value,
        /// Declared maximum.
        max: Value,
    },
    /// The state owner refused the value.
    #[error("Failed to set {path}: {source}")]
    Setter {
        /// Path of the leaf being written.
        path: String,
        /// Reason reported by the state owner.
        #[source]
        source: FieldError,
    },
}

impl TreeError {
    /// Path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            TreeError::InvalidPath(path)
            | TreeError::ReadOnly(path)
            | TreeError::WriteOnly(path) => path,
            TreeError::TypeMismatch { path, .. }
            | TreeError::NotABranch { path, .. }
            | TreeError::BelowMinimum { path, .. }
            | TreeError::AboveMaximum { path, .. }
            | TreeError::Setter { path, .. } => path,
        }
    }
}

/// Rejection reported by a [`crate::ParamSource`] write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The value has the right kind but cannot be represented by the field.
    #[error("value cannot be converted to {expected}")]
    Coercion {
        /// Representation the field requires.
        expected: &'static str,
    },
    /// The owner refused the value for a domain reason.
    #[error("{0}")]
    Rejected(String),
}
