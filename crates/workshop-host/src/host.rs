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
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, trace};

use crate::adapter::{Adapter, AdapterDirectory, AdapterHandle};
use crate::error::HostError;

const DEFAULT_QUEUE_DEPTH: usize = 64;

type Adapters = IndexMap<String, Box<dyn Adapter>>;

enum Request {
    Get {
        adapter: String,
        path: String,
        with_metadata: bool,
        reply: oneshot::Sender<Result<Value, HostError>>,
    },
    Set {
        adapter: String,
        path: String,
        data: Value,
        reply: oneshot::Sender<Result<(), HostError>>,
    },
    Names {
        reply: oneshot::Sender<Vec<String>>,
    },
}

/// Background task registration for one adapter.
#[derive(Debug)]
struct Schedule {
    index: usize,
    period: Duration,
    due: Instant,
}

/// Collection of adapters waiting to be started on the host task.
pub struct AdapterHost {
    adapters: Adapters,
}

impl Default for AdapterHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterHost {
    pub fn new() -> Self {
        Self {
            adapters: IndexMap::new(),
        }
    }

    pub fn from_adapters(adapters: IndexMap<String, Box<dyn Adapter>>) -> Self {
        Self { adapters }
    }

    /// Add an adapter; a later adapter with the same name replaces the earlier one.
    pub fn with_adapter(mut self, name: impl Into<String>, adapter: Box<dyn Adapter>) -> Self {
        self.adapters.insert(name.into(), adapter);
        self
    }

    /// Spawn the host task. Must be called from within a tokio runtime.
    ///
    /// The task initialises every adapter before serving the first request.
    pub fn start(self) -> HostRuntime {
        let (requests_tx, requests_rx) = mpsc::channel(DEFAULT_QUEUE_DEPTH);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = HostHandle {
            requests: requests_tx,
        };
        let directory = AdapterDirectory::new(self.adapters.keys(), &handle);
        let task = tokio::spawn(run_host(self.adapters, directory, requests_rx, shutdown_rx));
        HostRuntime {
            handle,
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Running host returned by [`AdapterHost::start`].
#[derive(Debug)]
pub struct HostRuntime {
    handle: HostHandle,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl HostRuntime {
    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }

    /// Stop serving, run every adapter's cleanup, and wait for the task to finish.
    pub async fn shutdown(self) -> Result<(), HostError> {
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|err| HostError::Join(err.to_string()))
    }
}

/// Cloneable client of the host task.
#[derive(Debug, Clone)]
pub struct HostHandle {
    requests: mpsc::Sender<Request>,
}

impl HostHandle {
    pub async fn get(
        &self,
        adapter: &str,
        path: &str,
        with_metadata: bool,
    ) -> Result<Value, HostError> {
        let (reply, response) = oneshot::channel();
        self.submit(Request::Get {
            adapter: adapter.to_owned(),
            path: path.to_owned(),
            with_metadata,
            reply,
        })
        .await?;
        response.await.map_err(|_| HostError::Stopped)?
    }

    pub async fn set(&self, adapter: &str, path: &str, data: Value) -> Result<(), HostError> {
        let (reply, response) = oneshot::channel();
        self.submit(Request::Set {
            adapter: adapter.to_owned(),
            path: path.to_owned(),
            data,
            reply,
        })
        .await?;
        response.await.map_err(|_| HostError::Stopped)?
    }

    /// Names of the loaded adapters in load order.
    pub async fn adapters(&self) -> Result<Vec<String>, HostError> {
        let (reply, response) = oneshot::channel();
        self.submit(Request::Names { reply }).await?;
        response.await.map_err(|_| HostError::Stopped)
    }

    /// Handle bound to a single adapter name. The name is not checked until first use.
    pub fn adapter(&self, name: impl Into<String>) -> AdapterHandle {
        AdapterHandle::new(name, self.clone())
    }

    async fn submit(&self, request: Request) -> Result<(), HostError> {
        self.requests
            .send(request)
            .await
            .map_err(|_| HostError::Stopped)
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::Get { adapter, path, .. } => write!(f, "Get({adapter}/{path})"),
            Request::Set { adapter, path, .. } => write!(f, "Set({adapter}/{path})"),
            Request::Names { .. } => f.write_str("Names"),
        }
    }
}

async fn run_host(
    mut adapters: Adapters,
    directory: AdapterDirectory,
    mut requests: mpsc::Receiver<Request>,
    mut shutdown: oneshot::Receiver<()>,
) {
    for (name, adapter) in adapters.iter_mut() {
        adapter.initialize(&directory);
        info!(adapter = %name, "adapter initialised");
    }

    let started = Instant::now();
    let mut schedules: Vec<Schedule> = adapters
        .values()
        .enumerate()
        .filter_map(|(index, adapter)| {
            let period = adapter.tick_interval().filter(|period| !period.is_zero())?;
            Some(Schedule {
                index,
                period,
                due: started + period,
            })
        })
        .collect();
    info!(
        adapters = adapters.len(),
        scheduled = schedules.len(),
        "adapter host running"
    );

    loop {
        let next_due = schedules.iter().map(|schedule| schedule.due).min();
        tokio::select! {
            _ = &mut shutdown => {
                debug!("adapter host shutdown requested");
                break;
            }
            _ = sleep_until(next_due.unwrap_or(started)), if next_due.is_some() => {
                let now = Instant::now();
                for schedule in schedules.iter_mut().filter(|schedule| schedule.due <= now) {
                    if let Some((name, adapter)) = adapters.get_index_mut(schedule.index) {
                        trace!(adapter = %name, "adapter tick");
                        adapter.tick();
                    }
                    schedule.due = now + schedule.period;
                }
            }
            Some(request) = requests.recv() => serve(&mut adapters, request),
        }
    }

    for (name, adapter) in adapters.iter_mut() {
        adapter.cleanup();
        info!(adapter = %name, "adapter cleaned up");
    }
    info!("adapter host stopped");
}

fn serve(adapters: &mut Adapters, request: Request) {
    trace!(request = ?request, "serving host request");
    match request {
        Request::Get {
            adapter,
            path,
            with_metadata,
            reply,
        } => {
            let result = match adapters.get(&adapter) {
                Some(target) => target.get(&path, with_metadata).map_err(HostError::from),
                None => Err(HostError::UnknownAdapter(adapter)),
            };
            let _ = reply.send(result);
        }
        Request::Set {
            adapter,
            path,
            data,
            reply,
        } => {
            let result = match adapters.get_mut(&adapter) {
                Some(target) => target.set(&path, data).map_err(HostError::from),
                None => Err(HostError::UnknownAdapter(adapter)),
            };
            let _ = reply.send(result);
        }
        Request::Names { reply } => {
            let _ = reply.send(adapters.keys().cloned().collect());
        }
    }
}
