//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::{DoorReading, TimestampMicros};
use crate::domain::errors::TimeseriesError;

/// Append/query API of the door timeseries.
///
/// Implementations must be thread-safe; one instance is shared by every
/// request handler.
pub trait TimeseriesApi: Send + Sync {
    /// Record that `door` was open (`true`) or closed (`false`) at
    /// `timestamp`.
    ///
    /// Re-inserting the same `(door, timestamp)` rewrites the same cell.
    fn insert(
        &self,
        door: &str,
        timestamp: TimestampMicros,
        value: bool,
    ) -> Result<(), TimeseriesError>;

    /// Most recent reading for `door`, by timestamp value.
    ///
    /// # Errors
    /// * `TimeseriesError::NotFound` - nothing was ever recorded for `door`
    /// * `TimeseriesError::Store` - the column store failed
    fn last_value(&self, door: &str) -> Result<DoorReading, TimeseriesError>;
}
