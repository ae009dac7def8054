//! ---
//! ems_section: "03-adapters"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Workshop controller and adapter."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::time::Duration;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::info;
use workshop_host::{Adapter, AdapterDirectory, AdapterError};

use crate::controller::WorkshopController;
use crate::error::ControllerError;
use crate::options::WorkshopOptions;

/// Host-facing wrapper around a single [`WorkshopController`].
#[derive(Debug)]
pub struct WorkshopAdapter {
    controller: WorkshopController,
}

impl WorkshopAdapter {
    pub fn new(options: WorkshopOptions) -> Result<Self, ControllerError> {
        Ok(Self {
            controller: WorkshopController::new(options)?,
        })
    }

    /// Catalog entry point, see [`workshop_host::AdapterFactory`].
    pub fn factory(
        name: &str,
        options: &IndexMap<String, Value>,
    ) -> Result<Box<dyn Adapter>, AdapterError> {
        let controller =
            WorkshopController::from_options(options).map_err(|err| AdapterError::from_display(&err))?;
        info!(adapter = %name, "workshop adapter loaded");
        Ok(Box::new(Self { controller }))
    }

    pub fn controller(&self) -> &WorkshopController {
        &self.controller
    }
}

impl Adapter for WorkshopAdapter {
    fn initialize(&mut self, adapters: &AdapterDirectory) {
        self.controller.initialize(adapters);
    }

    fn cleanup(&mut self) {
        self.controller.cleanup();
    }

    fn get(&self, path: &str, with_metadata: bool) -> Result<Value, AdapterError> {
        self.controller
            .get(path, with_metadata)
            .map_err(|err| AdapterError::from_display(&err))
    }

    fn set(&mut self, path: &str, data: Value) -> Result<(), AdapterError> {
        self.controller
            .set(path, data)
            .map_err(|err| AdapterError::from_display(&err))
    }

    fn tick_interval(&self) -> Option<Duration> {
        Some(self.controller.update_interval())
    }

    fn tick(&mut self) {
        self.controller.tick();
    }
}
