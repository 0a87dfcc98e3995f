//! Receiver service - wires verifier, timeseries and HTTP routes together.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use doorky_timeseries::{ColumnStore, TimeseriesService};
use doorky_verifier::{SecretRegistry, UpdateVerifier};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::adapters::storage::{RocksDbColumnStore, RocksDbConfig};
use crate::api::space_api::{handle_spaceapi, SpaceApi};
use crate::api::write_api::handle_door_status;
use crate::api::AppState;
use crate::config::ReceiverConfig;
use crate::error::ReceiverError;
use crate::metrics::ReceiverMetrics;

/// Door status receiver
pub struct ReceiverService {
    bind: SocketAddr,
    state: AppState,
}

impl ReceiverService {
    /// Create the service on the RocksDB database named by the configuration.
    pub fn new(config: &ReceiverConfig) -> Result<Self, ReceiverError> {
        config.validate()?;

        let directory = config.database.directory();
        std::fs::create_dir_all(&directory).map_err(|e| {
            ReceiverError::Storage(doorky_timeseries::ColumnStoreError::Io {
                message: format!("cannot create {}: {}", directory.display(), e),
            })
        })?;

        info!(path = %directory.display(), "Opening timeseries database");
        let store = RocksDbColumnStore::open(RocksDbConfig::at(directory))?;
        Self::with_store(config, store)
    }

    /// Create the service on an arbitrary column store.
    pub fn with_store<S>(config: &ReceiverConfig, store: S) -> Result<Self, ReceiverError>
    where
        S: ColumnStore + 'static,
    {
        config.validate()?;

        let registry = SecretRegistry::from_secrets(&config.doors)?;
        let metrics = Arc::new(ReceiverMetrics::new());
        let spaceapi = SpaceApi::from_config(config).map(Arc::new);

        info!(
            doors = registry.len(),
            policy = ?config.door_name_policy,
            spaceapi = spaceapi.is_some(),
            "Receiver configured"
        );

        let verifier = UpdateVerifier::new(registry, Arc::clone(&metrics))
            .with_policy(config.door_name_policy);

        let state = AppState {
            verifier: Arc::new(verifier),
            timeseries: Arc::new(TimeseriesService::new(store)),
            metrics,
            spaceapi,
            store_timeout: config.database.timeout(),
        };

        Ok(Self {
            bind: config.http.bind,
            state,
        })
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<ReceiverMetrics> {
        Arc::clone(&self.state.metrics)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Build the HTTP router.
    ///
    /// `/api/spaceapi` is only mounted when SpaceAPI export is configured.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/api/doorstatus", get(handle_door_status))
            .route("/health", get(health_check))
            .route("/metrics", get(metrics_json));

        if self.state.spaceapi.is_some() {
            router = router.route("/api/spaceapi", get(handle_spaceapi));
        }

        let middleware = ServiceBuilder::new().layer(TraceLayer::new_for_http());

        router.layer(middleware).with_state(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), ReceiverError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.bind)
            .await
            .map_err(|e| ReceiverError::Bind {
                addr: self.bind.to_string(),
                message: e.to_string(),
            })?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), ReceiverError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            info!(addr = %addr, "Starting HTTP server");
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ReceiverError::Server(e.to_string()))?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "doorky-receiver",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_json(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}
