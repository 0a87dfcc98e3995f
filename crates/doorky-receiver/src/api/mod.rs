//! # HTTP API
//!
//! - `write_api` - `GET /api/doorstatus`, signed update ingestion
//! - `space_api` - `GET /api/spaceapi`, SpaceAPI status export
//! - `error` - `ApiError` and its status mapping

pub mod error;
pub mod space_api;
pub mod write_api;

use std::sync::Arc;
use std::time::Duration;

use doorky_timeseries::{TimeseriesApi, TimeseriesError};
use doorky_verifier::UpdateVerificationApi;

use crate::metrics::ReceiverMetrics;
use error::ApiError;
use space_api::SpaceApi;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn UpdateVerificationApi>,
    pub timeseries: Arc<dyn TimeseriesApi>,
    pub metrics: Arc<ReceiverMetrics>,
    /// `None` when SpaceAPI export is not configured.
    pub spaceapi: Option<Arc<SpaceApi>>,
    pub store_timeout: Duration,
}

impl AppState {
    /// Run a timeseries call on the blocking pool, bounded by the store
    /// timeout.
    pub async fn call_store<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn TimeseriesApi) -> Result<T, TimeseriesError> + Send + 'static,
    {
        let timeseries = Arc::clone(&self.timeseries);
        let task = tokio::task::spawn_blocking(move || f(timeseries.as_ref()));

        match tokio::time::timeout(self.store_timeout, task).await {
            Err(_) => Err(ApiError::StoreTimeout {
                millis: self.store_timeout.as_millis() as u64,
            }),
            Ok(Err(e)) => Err(ApiError::Internal(format!("store task failed: {}", e))),
            Ok(Ok(result)) => result.map_err(ApiError::Store),
        }
    }
}
