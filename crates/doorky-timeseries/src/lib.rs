//! # Door Timeseries Store
//!
//! Append-only record of door state changes, kept in a column-oriented store
//! so that "what is the latest state of door X" is a single bounded range
//! query.
//!
//! ## Key Layout
//!
//! ```text
//!  column family "timeseries"
//!  ┌──────────────────────────┬───────────────┬───────────────┐
//!  │ row key                  │ column "back" │ column "front"│
//!  ├──────────────────────────┼───────────────┼───────────────┤
//!  │ BE(-1700000300000000)    │               │ 0x00          │  newest
//!  │ BE(-1700000200000000)    │ 0x01          │               │
//!  │ BE(-1700000100000000)    │               │ 0x01          │  oldest
//!  └──────────────────────────┴───────────────┴───────────────┘
//! ```
//!
//! Row keys are the big-endian encoding of the negated microsecond
//! timestamp, so the store's ascending key order is newest-first and the
//! first row carrying a door's column is that door's latest value.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Row-key codec, entities, errors
//! - `ports/` - `TimeseriesApi` (inbound) and `ColumnStore` (outbound)
//! - `service.rs` - `TimeseriesService`, the application service
//!
//! ## Usage
//!
//! ```ignore
//! use doorky_timeseries::{InMemoryColumnStore, TimeseriesApi, TimeseriesService};
//!
//! let service = TimeseriesService::new(InMemoryColumnStore::new());
//! service.insert("front", 1_700_000_000_000_000, true)?;
//! let reading = service.last_value("front")?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::entities::{
    Column, ConsistencyLevel, DoorReading, KeyRange, KeySlice, SlicePredicate, TimestampMicros,
    TIMESERIES_CF,
};
pub use domain::errors::{ColumnStoreError, RowKeyError, TimeseriesError};
pub use domain::row_key;
pub use ports::inbound::TimeseriesApi;
pub use ports::outbound::{ColumnStore, InMemoryColumnStore};
pub use service::TimeseriesService;
