//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Adapter contract and host runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::time::Duration;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{AdapterError, HostError};
use crate::host::HostHandle;

/// Contract implemented by every adapter loaded into the host.
///
/// All methods run on the host task, one at a time.
pub trait Adapter: Send + 'static {
    /// Called once after every adapter has been constructed, with handles to all of them.
    fn initialize(&mut self, _adapters: &AdapterDirectory) {}

    /// Called once when the host shuts down.
    fn cleanup(&mut self) {}

    /// Read the value (or subtree) at `path`.
    fn get(&self, path: &str, with_metadata: bool) -> Result<Value, AdapterError>;

    /// Write `data` to `path`.
    fn set(&mut self, path: &str, data: Value) -> Result<(), AdapterError>;

    /// Period of the adapter's background task, if it has one.
    fn tick_interval(&self) -> Option<Duration> {
        None
    }

    /// Background task body, fired every [`Adapter::tick_interval`].
    fn tick(&mut self) {}
}

/// Handle to one named adapter, usable from any task other than the host task.
#[derive(Debug, Clone)]
pub struct AdapterHandle {
    name: String,
    host: HostHandle,
}

impl AdapterHandle {
    pub(crate) fn new(name: impl Into<String>, host: HostHandle) -> Self {
        Self {
            name: name.into(),
            host,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn get(&self, path: &str, with_metadata: bool) -> Result<Value, HostError> {
        self.host.get(&self.name, path, with_metadata).await
    }

    pub async fn set(&self, path: &str, data: Value) -> Result<(), HostError> {
        self.host.set(&self.name, path, data).await
    }
}

/// Every adapter known to the host, in load order.
///
/// Awaiting a handle from inside an adapter callback would wait on the host task
/// itself; spawn a task for cross-adapter calls instead.
#[derive(Debug, Clone, Default)]
pub struct AdapterDirectory {
    handles: IndexMap<String, AdapterHandle>,
}

impl AdapterDirectory {
    pub(crate) fn new<'a>(names: impl IntoIterator<Item = &'a String>, host: &HostHandle) -> Self {
        Self {
            handles: names
                .into_iter()
                .map(|name| (name.clone(), AdapterHandle::new(name.clone(), host.clone())))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AdapterHandle> {
        self.handles.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
