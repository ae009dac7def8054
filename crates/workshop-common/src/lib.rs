//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the adapter host."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Shared primitives for the Workshop workspace.
//! This crate exposes configuration loading and tracing initialisation
//! consumed by the host binary and the integration tests.

pub mod config;
pub mod logging;

pub use config::{AdapterConfig, ApiConfig, AppConfig, LoadedAppConfig, LoggingConfig};
pub use logging::{init_tracing, LogFormat};
