//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Adapter contract and host runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use indexmap::IndexMap;
use serde_json::Value;
use tracing::info;
use workshop_common::config::AdapterConfig;

use crate::adapter::Adapter;
use crate::error::{AdapterError, HostError};

/// Constructor for one adapter module: receives the adapter name and its opaque options.
pub type AdapterFactory =
    fn(&str, &IndexMap<String, Value>) -> Result<Box<dyn Adapter>, AdapterError>;

/// Module name to factory table consulted when building adapters from configuration.
#[derive(Clone, Default)]
pub struct AdapterCatalog {
    factories: IndexMap<String, AdapterFactory>,
}

impl std::fmt::Debug for AdapterCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterCatalog")
            .field("modules", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AdapterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `module`, replacing any previous entry.
    pub fn with(mut self, module: impl Into<String>, factory: AdapterFactory) -> Self {
        self.register(module, factory);
        self
    }

    pub fn register(&mut self, module: impl Into<String>, factory: AdapterFactory) {
        self.factories.insert(module.into(), factory);
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build a single adapter.
    pub fn create(&self, name: &str, config: &AdapterConfig) -> Result<Box<dyn Adapter>, HostError> {
        let factory = self
            .factories
            .get(&config.module)
            .ok_or_else(|| HostError::UnknownModule {
                adapter: name.to_owned(),
                module: config.module.clone(),
            })?;
        let adapter = factory(name, &config.options).map_err(|source| HostError::Construction {
            adapter: name.to_owned(),
            source,
        })?;
        info!(adapter = %name, module = %config.module, "adapter constructed");
        Ok(adapter)
    }

    /// Build every configured adapter, preserving configuration order.
    pub fn create_all(
        &self,
        configs: &IndexMap<String, AdapterConfig>,
    ) -> Result<IndexMap<String, Box<dyn Adapter>>, HostError> {
        configs
            .iter()
            .map(|(name, config)| Ok((name.clone(), self.create(name, config)?)))
            .collect()
    }
}
