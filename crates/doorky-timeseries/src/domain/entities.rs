//! # Domain Entities
//!
//! Value types shared between the timeseries service and column store
//! adapters. They mirror the vocabulary of wide-column stores: a row key
//! addresses a row, a row holds named columns, and each column carries its
//! own write timestamp.

/// Microseconds since the Unix epoch.
pub type TimestampMicros = i64;

/// Column family holding all door timeseries.
pub const TIMESERIES_CF: &str = "timeseries";

/// Consistency level requested from the backing store.
///
/// Stronger levels trade latency for durability. Adapters without
/// replication map these onto whatever durability knobs they have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsistencyLevel {
    /// A single replica acknowledges.
    One,
    /// A majority of replicas acknowledges.
    Quorum,
    /// Every replica acknowledges.
    All,
}

impl ConsistencyLevel {
    /// Whether the write must reach durable storage before acknowledging.
    pub fn requires_sync(&self) -> bool {
        matches!(self, ConsistencyLevel::Quorum | ConsistencyLevel::All)
    }
}

/// A single named cell inside a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: Vec<u8>,
    /// Column payload.
    pub value: Vec<u8>,
    /// Write timestamp used for last-write-wins resolution.
    pub timestamp: TimestampMicros,
}

impl Column {
    pub fn new(
        name: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
        timestamp: TimestampMicros,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            timestamp,
        }
    }

    /// Whether this column should replace `existing` under last-write-wins.
    ///
    /// Ties go to the incoming write.
    pub fn supersedes(&self, existing: &Column) -> bool {
        self.timestamp >= existing.timestamp
    }
}

/// Selects which columns a range query returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicePredicate {
    /// Column names to return. Rows carrying none of them are skipped.
    pub column_names: Vec<Vec<u8>>,
}

impl SlicePredicate {
    pub fn columns<I, C>(names: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        Self {
            column_names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, name: &[u8]) -> bool {
        self.column_names.iter().any(|c| c.as_slice() == name)
    }
}

/// Range of row keys, both ends inclusive. An empty bound is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    pub start_key: Vec<u8>,
    pub end_key: Vec<u8>,
    /// Maximum number of rows returned.
    pub count: usize,
}

impl KeyRange {
    /// Unbounded range returning at most `count` rows.
    pub fn unbounded(count: usize) -> Self {
        Self {
            start_key: Vec::new(),
            end_key: Vec::new(),
            count,
        }
    }

    /// Whether `key` lies inside the range.
    pub fn contains(&self, key: &[u8]) -> bool {
        let after_start = self.start_key.is_empty() || key >= self.start_key.as_slice();
        let before_end = self.end_key.is_empty() || key <= self.end_key.as_slice();
        after_start && before_end
    }

    /// Whether `key` lies beyond the end bound.
    pub fn is_past_end(&self, key: &[u8]) -> bool {
        !self.end_key.is_empty() && key > self.end_key.as_slice()
    }
}

/// One row returned by a range query, restricted to the predicate columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySlice {
    pub key: Vec<u8>,
    pub columns: Vec<Column>,
}

impl KeySlice {
    pub fn column(&self, name: &[u8]) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.as_slice() == name)
    }
}

/// Latest known state of a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorReading {
    /// When the state was reported, in microseconds since the epoch.
    pub timestamp_micros: TimestampMicros,
    /// `true` when the door was open.
    pub open: bool,
}

impl DoorReading {
    /// Whole seconds since the epoch (floored).
    pub fn timestamp_seconds(&self) -> i64 {
        self.timestamp_micros.div_euclid(1_000_000)
    }
}
