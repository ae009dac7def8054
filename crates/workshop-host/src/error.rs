//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Adapter contract and host runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fmt::Display;

use thiserror::Error;

/// Error type every adapter maps its domain failures into.
///
/// Only the message crosses the boundary, so the host handles failures from any
/// adapter uniformly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AdapterError {
    message: String,
}

impl AdapterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Re-wrap any displayable error, keeping its message verbatim.
    pub fn from_display(err: &impl Display) -> Self {
        Self::new(err.to_string())
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failures raised by the host itself or forwarded from an adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("no adapter registered under the name '{0}'")]
    UnknownAdapter(String),
    #[error("adapter '{adapter}' names unknown module '{module}'")]
    UnknownModule { adapter: String, module: String },
    #[error("adapter '{adapter}' could not be constructed: {source}")]
    Construction {
        adapter: String,
        #[source]
        source: AdapterError,
    },
    #[error("adapter host is not running")]
    Stopped,
    #[error("adapter host task failed: {0}")]
    Join(String),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_errors_keep_the_message() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "Invalid path: nope");
        let err = AdapterError::from_display(&inner);
        assert_eq!(err.to_string(), "Invalid path: nope");
        assert_eq!(HostError::from(err).to_string(), "Invalid path: nope");
    }
}
