//! # Receiver Metrics
//!
//! Process-wide counters, exposed as a flat JSON map on `GET /metrics`.
//! Rejections are keyed by their reason name.

use std::sync::atomic::{AtomicU64, Ordering};

use doorky_verifier::{Rejection, RejectionCounter};

/// Receiver metrics
#[derive(Default)]
pub struct ReceiverMetrics {
    // Rejections, indexed like `Rejection::ALL_REASONS`
    rejections: [AtomicU64; Rejection::ALL_REASONS.len()],

    // Ingestion
    pub updates_accepted: AtomicU64,
    pub insert_errors: AtomicU64,

    // SpaceAPI
    pub spaceapi_requests: AtomicU64,
    pub spaceapi_door_errors: AtomicU64,
}

impl ReceiverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&self) {
        self.updates_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insert_error(&self) {
        self.insert_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_spaceapi_request(&self) {
        self.spaceapi_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_spaceapi_door_error(&self) {
        self.spaceapi_door_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for a rejection reason; 0 for unknown names.
    pub fn rejections(&self, reason: &str) -> u64 {
        Rejection::ALL_REASONS
            .iter()
            .position(|r| *r == reason)
            .map(|i| self.rejections[i].load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (reason, counter) in Rejection::ALL_REASONS.iter().zip(&self.rejections) {
            map.insert(
                (*reason).to_string(),
                counter.load(Ordering::Relaxed).into(),
            );
        }
        map.insert(
            "insert-error".into(),
            self.insert_errors.load(Ordering::Relaxed).into(),
        );
        map.insert(
            "updates-accepted".into(),
            self.updates_accepted.load(Ordering::Relaxed).into(),
        );
        map.insert(
            "spaceapi-requests".into(),
            self.spaceapi_requests.load(Ordering::Relaxed).into(),
        );
        map.insert(
            "spaceapi-door-errors".into(),
            self.spaceapi_door_errors.load(Ordering::Relaxed).into(),
        );
        serde_json::Value::Object(map)
    }
}

impl RejectionCounter for ReceiverMetrics {
    fn record_rejection(&self, reason: &'static str) {
        if let Some(i) = Rejection::ALL_REASONS.iter().position(|r| *r == reason) {
            self.rejections[i].fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorky_verifier::{AuthError, InputError};

    #[test]
    fn test_rejection_counting() {
        let metrics = ReceiverMetrics::new();
        let rejection: Rejection = AuthError::UnknownDoor.into();
        metrics.record_rejection(rejection.reason());
        metrics.record_rejection(rejection.reason());
        metrics.record_rejection(Rejection::from(InputError::InvalidIv).reason());

        assert_eq!(metrics.rejections("unknown-door"), 2);
        assert_eq!(metrics.rejections("invalid-iv"), 1);
        assert_eq!(metrics.rejections("unparseable-hash"), 0);
        assert_eq!(metrics.rejections("no-such-reason"), 0);
    }

    #[test]
    fn test_json_export_lists_every_counter() {
        let metrics = ReceiverMetrics::new();
        metrics.record_accepted();
        metrics.record_insert_error();
        metrics.record_rejection("hash-verification-failed");

        let json = metrics.to_json();
        for reason in Rejection::ALL_REASONS {
            assert!(json.get(reason).is_some(), "missing {reason}");
        }
        assert_eq!(json["hash-verification-failed"], 1);
        assert_eq!(json["updates-accepted"], 1);
        assert_eq!(json["insert-error"], 1);
        assert_eq!(json["spaceapi-requests"], 0);
    }
}
