//! Door status ingestion.
//!
//! `GET /api/doorstatus?door=&val=&ts=&hash=&iv=`. A verified update is
//! written to the timeseries; anything else is rejected with the status
//! mapped by `ApiError`.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
};
use doorky_verifier::{InputError, RawUpdateFields};
use tracing::{debug, error, warn};

use super::error::ApiError;
use super::AppState;

/// Handle a signed door status update.
pub async fn handle_door_status(
    State(state): State<AppState>,
    query: Result<Query<RawUpdateFields>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(fields) = query.map_err(|e| {
        warn!(error = %e, "Error parsing query string");
        ApiError::from(state.verifier.reject(InputError::MalformedRequest.into()))
    })?;

    let update = state.verifier.verify(&fields)?;

    let door = update.door.clone();
    let timestamp = update.timestamp_micros();
    let value = update.value;

    match state
        .call_store(move |ts| ts.insert(&door, timestamp, value))
        .await
    {
        Ok(()) => {
            state.metrics.record_accepted();
            debug!(door = %update.door, value, ts = update.timestamp_seconds, "Stored door update");
            Ok(StatusCode::OK)
        }
        Err(e) => {
            state.metrics.record_insert_error();
            error!(door = %update.door, error = %e, "Unable to insert door update");
            Err(e)
        }
    }
}
