//! HTTP error mapping.
//!
//! Response bodies carry only the canonical status text; the detailed reason
//! goes to the log and the metrics.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use doorky_timeseries::TimeseriesError;
use doorky_verifier::{AuthError, Rejection};
use thiserror::Error;

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The update failed verification.
    #[error("update rejected: {0}")]
    Rejected(#[from] Rejection),
    /// The timeseries store returned an error.
    #[error("store error: {0}")]
    Store(#[from] TimeseriesError),
    /// The store call did not finish within the configured timeout.
    #[error("store call timed out after {millis}ms")]
    StoreTimeout { millis: u64 },
    /// A status document could not be serialized.
    #[error("Error marshalling response: {0}")]
    Render(String),
    /// The endpoint is not enabled.
    #[error("not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected(Rejection::Input(_)) => StatusCode::BAD_REQUEST,
            ApiError::Rejected(Rejection::Auth(AuthError::UnknownDoor)) => StatusCode::NOT_FOUND,
            ApiError::Rejected(Rejection::Auth(AuthError::HashVerificationFailed)) => {
                StatusCode::FORBIDDEN
            }
            ApiError::Rejected(Rejection::Crypto(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_)
            | ApiError::StoreTimeout { .. }
            | ApiError::Render(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let text = status.canonical_reason().unwrap_or_default();
        let body = match &self {
            ApiError::Render(_) => format!("{}: {}", text, self),
            _ => text.to_string(),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorky_timeseries::ColumnStoreError;
    use doorky_verifier::{CryptoError, InputError};

    #[test]
    fn test_rejection_status_mapping() {
        let cases: [(Rejection, StatusCode); 6] = [
            (InputError::MalformedRequest.into(), StatusCode::BAD_REQUEST),
            (InputError::TimestampOutOfRange.into(), StatusCode::BAD_REQUEST),
            (InputError::InvalidIv.into(), StatusCode::BAD_REQUEST),
            (AuthError::UnknownDoor.into(), StatusCode::NOT_FOUND),
            (AuthError::HashVerificationFailed.into(), StatusCode::FORBIDDEN),
            (CryptoError::CipherInitFailed.into(), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (rejection, status) in cases {
            let reason = rejection.to_string();
            assert_eq!(ApiError::from(rejection).status(), status, "{reason}");
        }
    }

    #[test]
    fn test_store_errors_are_internal() {
        let store = ApiError::from(TimeseriesError::Store(ColumnStoreError::Io {
            message: "disk full".into(),
        }));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::StoreTimeout { millis: 5 }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_render_error_is_internal() {
        let response = ApiError::Render("bad float".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
