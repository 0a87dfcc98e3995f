//! # Timeseries Service
//!
//! Application service implementing `TimeseriesApi` on top of any
//! `ColumnStore`.
//!
//! - Writes go to the `timeseries` family at `ConsistencyLevel::Quorum`.
//! - The latest-value read uses `ConsistencyLevel::One`; a slightly stale
//!   answer is acceptable for status display.

use tracing::{debug, warn};

use crate::domain::entities::{
    Column, ConsistencyLevel, DoorReading, KeyRange, SlicePredicate, TimestampMicros,
    TIMESERIES_CF,
};
use crate::domain::errors::TimeseriesError;
use crate::domain::row_key;
use crate::ports::inbound::TimeseriesApi;
use crate::ports::outbound::ColumnStore;

const OPEN: u8 = 0x01;
const CLOSED: u8 = 0x00;

/// Door timeseries backed by a column store.
pub struct TimeseriesService<S: ColumnStore> {
    store: S,
}

impl<S: ColumnStore> TimeseriesService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ColumnStore> TimeseriesApi for TimeseriesService<S> {
    fn insert(
        &self,
        door: &str,
        timestamp: TimestampMicros,
        value: bool,
    ) -> Result<(), TimeseriesError> {
        let key = row_key::encode(timestamp);
        let column = Column::new(door, vec![if value { OPEN } else { CLOSED }], timestamp);

        self.store
            .insert(TIMESERIES_CF, &key, column, ConsistencyLevel::Quorum)?;

        debug!(door, timestamp, value, "Recorded door state");
        Ok(())
    }

    fn last_value(&self, door: &str) -> Result<DoorReading, TimeseriesError> {
        let predicate = SlicePredicate::columns([door]);
        let range = KeyRange::unbounded(1);

        let slices =
            self.store
                .get_range_slices(TIMESERIES_CF, &predicate, &range, ConsistencyLevel::One)?;

        for slice in &slices {
            let Some(column) = slice.column(door.as_bytes()) else {
                continue;
            };

            let timestamp_micros =
                row_key::decode(&slice.key).map_err(|e| TimeseriesError::Corrupt {
                    door: door.to_string(),
                    reason: e.to_string(),
                })?;

            let open = match column.value.first() {
                Some(byte) => *byte == OPEN,
                None => {
                    warn!(door, "Empty column value in timeseries");
                    return Err(TimeseriesError::Corrupt {
                        door: door.to_string(),
                        reason: "empty column value".to_string(),
                    });
                }
            };

            return Ok(DoorReading {
                timestamp_micros,
                open,
            });
        }

        Err(TimeseriesError::NotFound {
            door: door.to_string(),
        })
    }
}
