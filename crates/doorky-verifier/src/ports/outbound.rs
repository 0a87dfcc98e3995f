//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::entities::DerivedKey;

/// Resolves a door name to its derived key.
///
/// Production: `SecretRegistry`.
pub trait KeyLookup: Send + Sync {
    fn key_for(&self, door: &str) -> Option<&DerivedKey>;
}

/// Counts rejections by reason name.
pub trait RejectionCounter: Send + Sync {
    fn record_rejection(&self, reason: &'static str);
}

/// Counter that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRejectionCounter;

impl RejectionCounter for NoopRejectionCounter {
    fn record_rejection(&self, _reason: &'static str) {}
}

impl<T: KeyLookup + ?Sized> KeyLookup for std::sync::Arc<T> {
    fn key_for(&self, door: &str) -> Option<&DerivedKey> {
        (**self).key_for(door)
    }
}

impl<T: RejectionCounter + ?Sized> RejectionCounter for std::sync::Arc<T> {
    fn record_rejection(&self, reason: &'static str) {
        (**self).record_rejection(reason)
    }
}
