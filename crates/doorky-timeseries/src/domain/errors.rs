//! # Domain Errors
//!
//! Error types for the timeseries store.
//!
//! Column store failures are surfaced unchanged to the caller. Nothing in
//! this crate retries.

use thiserror::Error;

/// Row key could not be decoded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowKeyError {
    #[error("invalid row key length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors raised by a `ColumnStore` adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColumnStoreError {
    /// The backing store could not be reached or failed the operation.
    #[error("column store I/O error: {message}")]
    Io { message: String },

    /// The requested column family does not exist.
    #[error("unknown column family: {0}")]
    UnknownColumnFamily(String),

    /// Stored bytes could not be interpreted.
    #[error("column store corruption: {message}")]
    Corruption { message: String },

    /// The operation did not complete in time.
    #[error("column store operation timed out after {millis}ms")]
    Timeout { millis: u64 },
}

/// Errors returned by `TimeseriesApi`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeseriesError {
    /// No row carries a column for this door.
    #[error("no value found for {door}")]
    NotFound { door: String },

    /// A stored row could not be decoded.
    #[error("corrupt timeseries entry for {door}: {reason}")]
    Corrupt { door: String, reason: String },

    /// The column store failed.
    #[error(transparent)]
    Store(#[from] ColumnStoreError),
}

impl TimeseriesError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TimeseriesError::NotFound { .. })
    }
}
