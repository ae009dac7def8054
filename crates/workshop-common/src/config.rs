//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the adapter host."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::logging::LogFormat;

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_api_enabled() -> bool {
    true
}

fn default_api_listen() -> SocketAddr {
    "127.0.0.1:8888".parse().expect("valid default api address")
}

/// Primary configuration object for the adapter host.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub adapters: IndexMap<String, AdapterConfig>,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "WORKSHOP_CONFIG";

    /// Load configuration from disk, respecting the `WORKSHOP_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    /// Read and validate a single configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<AppConfig>()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Retrieve an adapter configuration by name.
    pub fn adapter(&self, name: &str) -> Option<&AdapterConfig> {
        self.adapters.get(name)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        if self.adapters.is_empty() {
            return Err(anyhow!("configuration must declare at least one adapter"));
        }
        for (name, adapter) in &self.adapters {
            adapter.validate(name)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Per-adapter section: which factory builds it and the options handed to it untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdapterConfig {
    pub module: String,
    #[serde(default)]
    pub options: IndexMap<String, Value>,
}

impl AdapterConfig {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            options: IndexMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() || name.contains('/') {
            return Err(anyhow!(
                "adapter name '{}' must be non-empty and must not contain '/'",
                name
            ));
        }
        if self.module.trim().is_empty() {
            return Err(anyhow!("adapter '{}' must name a module", name));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_enabled")]
    pub enabled: bool,
    #[serde(default = "default_api_listen")]
    pub listen: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: default_api_enabled(),
            listen: default_api_listen(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"
        [logging]
        format = "pretty"

        [api]
        listen = "0.0.0.0:9000"

        [adapters.workshop]
        module = "workshop"

        [adapters.workshop.options]
        num_val = 4
        selection_list = ["red", "green"]
    "#;

    #[test]
    fn parses_adapter_sections_in_order() {
        let config: AppConfig = SAMPLE.parse().unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.api.listen, "0.0.0.0:9000".parse().unwrap());
        let adapter = config.adapter("workshop").unwrap();
        assert_eq!(adapter.module, "workshop");
        assert_eq!(adapter.options["num_val"], json!(4));
        assert_eq!(adapter.options["selection_list"], json!(["red", "green"]));
    }

    #[test]
    fn rejects_configuration_without_adapters() {
        let err = "[api]\nenabled = false\n".parse::<AppConfig>().unwrap_err();
        assert!(err.to_string().contains("at least one adapter"));
    }

    #[test]
    fn rejects_adapter_names_with_separators() {
        let err = "[adapters.\"a/b\"]\nmodule = \"workshop\"\n"
            .parse::<AppConfig>()
            .unwrap_err();
        assert!(err.to_string().contains("must not contain"));
    }

    #[test]
    fn rejects_blank_module() {
        let err = "[adapters.workshop]\nmodule = \" \"\n"
            .parse::<AppConfig>()
            .unwrap_err();
        assert!(err.to_string().contains("must name a module"));
    }
}
