//! # Production Storage Adapters
//!
//! RocksDB implementation of the `ColumnStore` port. The in-memory store
//! from `doorky-timeseries` is re-exported for tests and ephemeral runs.

pub mod rocksdb_adapter;

pub use doorky_timeseries::InMemoryColumnStore;
pub use rocksdb_adapter::{RocksDbColumnStore, RocksDbConfig, COLUMN_FAMILIES};
