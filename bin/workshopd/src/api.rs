//! ---
//! ems_section: "05-networking-external-interfaces"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "HTTP parameter API served by the Workshop daemon."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::net::{SocketAddr, TcpListener as StdTcpListener};

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use workshop_host::{HostError, HostHandle};

/// Version segment of every API route.
pub const API_VERSION: &str = "0.1";

/// Handle to the running API server.
#[derive(Debug)]
pub struct ApiServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<()>>,
}

impl ApiServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.task.await {
            Ok(result) => result,
            Err(err) => Err(err.into()),
        }
    }
}

pub fn router(host: HostHandle) -> Router {
    Router::new()
        .route(&format!("/api/{API_VERSION}/adapters"), get(list_adapters))
        .route(
            &format!("/api/{API_VERSION}/:adapter"),
            get(get_root).put(put_root),
        )
        .route(
            &format!("/api/{API_VERSION}/:adapter/*path"),
            get(get_path).put(put_path),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(host)
}

/// Bind `addr` and serve the parameter API until [`ApiServer::shutdown`].
pub fn spawn_api_server(host: HostHandle, addr: SocketAddr) -> Result<ApiServer> {
    let listener = StdTcpListener::bind(addr)
        .with_context(|| format!("failed to bind API listener {addr}"))?;
    listener
        .set_nonblocking(true)
        .context("failed to configure API listener as non-blocking")?;
    let addr = listener
        .local_addr()
        .context("failed to read API listener address")?;
    let tcp_listener =
        TcpListener::from_std(listener).context("failed to create tokio listener")?;

    let router = router(host);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task: JoinHandle<Result<()>> = tokio::spawn(async move {
        info!(address = %addr, "api server listening");
        if let Err(err) = axum::serve(tcp_listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
        {
            error!(address = %addr, error = %err, "api server exited with error");
            return Err(err.into());
        }
        info!(address = %addr, "api server stopped");
        Ok(())
    });

    Ok(ApiServer {
        addr,
        shutdown: Some(shutdown_tx),
        task,
    })
}

#[derive(Debug, Default, Deserialize)]
struct AccessQuery {
    #[serde(default)]
    metadata: bool,
}

#[derive(Debug, Serialize)]
struct AdapterList {
    adapters: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<HostError> for ApiError {
    fn from(err: HostError) -> Self {
        let status = match &err {
            HostError::Adapter(_) | HostError::UnknownAdapter(_) => StatusCode::BAD_REQUEST,
            HostError::Stopped => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, error = %self.message, "api request failed");
        }
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

fn wants_metadata(query: &AccessQuery, headers: &HeaderMap) -> bool {
    query.metadata
        || headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.contains("metadata=true"))
}

async fn list_adapters(State(host): State<HostHandle>) -> Result<Json<AdapterList>, ApiError> {
    let adapters = host.adapters().await?;
    Ok(Json(AdapterList { adapters }))
}

async fn get_root(
    State(host): State<HostHandle>,
    Path(adapter): Path<String>,
    Query(query): Query<AccessQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    read(&host, &adapter, "", wants_metadata(&query, &headers)).await
}

async fn get_path(
    State(host): State<HostHandle>,
    Path((adapter, path)): Path<(String, String)>,
    Query(query): Query<AccessQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    read(&host, &adapter, &path, wants_metadata(&query, &headers)).await
}

async fn put_root(
    State(host): State<HostHandle>,
    Path(adapter): Path<String>,
    Query(query): Query<AccessQuery>,
    headers: HeaderMap,
    Json(data): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    host.set(&adapter, "", data).await?;
    read(&host, &adapter, "", wants_metadata(&query, &headers)).await
}

async fn put_path(
    State(host): State<HostHandle>,
    Path((adapter, path)): Path<(String, String)>,
    Query(query): Query<AccessQuery>,
    headers: HeaderMap,
    Json(data): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    host.set(&adapter, &path, data).await?;
    read(&host, &adapter, &path, wants_metadata(&query, &headers)).await
}

async fn read(
    host: &HostHandle,
    adapter: &str,
    path: &str,
    with_metadata: bool,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(host.get(adapter, path, with_metadata).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use workshop_adapter::WorkshopAdapter;
    use workshop_common::AdapterConfig;
    use workshop_host::{AdapterCatalog, AdapterHost};

    fn start_host() -> workshop_host::HostRuntime {
        let catalog = AdapterCatalog::new().with(workshop_adapter::MODULE_NAME, WorkshopAdapter::factory);
        let adapter = catalog
            .create(
                "workshop",
                &AdapterConfig::new(workshop_adapter::MODULE_NAME).with_option("random_seed", 11),
            )
            .unwrap();
        AdapterHost::new().with_adapter("workshop", adapter).start()
    }

    #[tokio::test]
    async fn serves_get_and_put() {
        let runtime = start_host();
        let server = spawn_api_server(runtime.handle(), "127.0.0.1:0".parse().unwrap()).unwrap();
        let base = format!("http://{}/api/{API_VERSION}", server.addr());
        let client = reqwest::Client::new();

        let list: Value = client
            .get(format!("{base}/adapters"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(list, json!({ "adapters": ["workshop"] }));

        let value: Value = client
            .get(format!("{base}/workshop/num_val"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(value, json!(10));

        let response = client
            .put(format!("{base}/workshop/info"))
            .json(&json!({ "label": "bench" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let info: Value = response.json().await.unwrap();
        assert_eq!(info["label"], json!("bench"));

        let described: Value = client
            .get(format!("{base}/workshop/num_val?metadata=true"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(described["max"], json!(100));

        let described: Value = client
            .get(format!("{base}/workshop/toggle"))
            .header("Accept", "application/json;metadata=true")
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(described["writeable"], json!(true));

        drop(client);
        server.shutdown().await.unwrap();
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn maps_failures_to_status_codes() {
        let runtime = start_host();
        let host = runtime.handle();
        let server = spawn_api_server(host.clone(), "127.0.0.1:0".parse().unwrap()).unwrap();
        let base = format!("http://{}/api/{API_VERSION}", server.addr());
        let client = reqwest::Client::new();

        let response = client
            .put(format!("{base}/workshop/is_even"))
            .json(&json!(true))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Parameter is_even is read-only" }));

        let response = client.get(format!("{base}/nobody")).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        runtime.shutdown().await.unwrap();
        let response = client
            .get(format!("{base}/workshop/num_val"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);

        drop(client);
        server.shutdown().await.unwrap();
    }
}
