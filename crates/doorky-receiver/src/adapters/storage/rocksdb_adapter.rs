//! # RocksDB Column Store Adapter
//!
//! Embedded RocksDB implementation of the `ColumnStore` port.
//!
//! ## Physical Layout
//!
//! Each logical column family maps onto a RocksDB column family. A cell
//! `(row, column)` is one RocksDB entry:
//!
//! ```text
//! key   = row_key ‖ column_name ‖ u16_be(len(column_name))
//! value = i64_be(column_timestamp) ‖ column_value
//! ```
//!
//! Every data family has a companion `<family>.by_column` index holding one
//! empty entry per cell:
//!
//! ```text
//! key   = u16_be(len(column_name)) ‖ column_name ‖ row_key
//! ```
//!
//! A column's index entries are contiguous and sorted by row key, so a range
//! query seeks straight to the first row carrying the column instead of
//! walking rows that only carry other columns.
//!
//! ## Concurrency
//!
//! `DB` is shared without a lock. Only the last-write-wins read-compare-write
//! in `insert` is serialized; scans never wait on writers.
//!
//! ## Configuration
//!
//! - Snappy compression
//! - Bloom filters (10 bits per key)
//! - fsync on write for `Quorum`/`All`, or always when `sync_writes` is set

use std::collections::BTreeSet;
use std::path::PathBuf;

use doorky_timeseries::{
    Column, ColumnStore, ColumnStoreError, ConsistencyLevel, KeyRange, KeySlice, SlicePredicate,
    TIMESERIES_CF,
};
use parking_lot::Mutex;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch,
    WriteOptions, DB,
};

/// Data column families opened by the receiver. Each also gets an index.
pub const COLUMN_FAMILIES: &[&str] = &[TIMESERIES_CF];

const NAME_LEN_SUFFIX: usize = 2;
const TIMESTAMP_PREFIX: usize = 8;

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 32MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Maximum number of write buffers (default: 3)
    pub max_write_buffer_number: i32,
    /// fsync every write regardless of consistency level (default: false)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/doorky"),
            block_cache_size: 32 * 1024 * 1024,  // 32MB
            write_buffer_size: 16 * 1024 * 1024, // 16MB
            max_write_buffer_number: 3,
            sync_writes: false,
        }
    }
}

impl RocksDbConfig {
    /// Config rooted at `path` with default tuning.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create config for testing (smaller buffers)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 1024 * 1024,  // 1MB
            write_buffer_size: 1024 * 1024, // 1MB
            max_write_buffer_number: 2,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed column store.
pub struct RocksDbColumnStore {
    db: DB,
    /// Serializes last-write-wins resolution in `insert`.
    write_lock: Mutex<()>,
    sync_writes: bool,
}

/// Name of the column index companion of `column_family`.
pub fn index_family(column_family: &str) -> String {
    format!("{}.by_column", column_family)
}

impl RocksDbColumnStore {
    /// Open or create the database, including every column family in
    /// `COLUMN_FAMILIES` and its index.
    pub fn open(config: RocksDbConfig) -> Result<Self, ColumnStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .flat_map(|name| [name.to_string(), index_family(name)])
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors).map_err(|e| {
            ColumnStoreError::Io {
                message: format!("Failed to open RocksDB at {}: {}", config.path.display(), e),
            }
        })?;

        Ok(Self {
            db,
            write_lock: Mutex::new(()),
            sync_writes: config.sync_writes,
        })
    }

    fn write_options(&self, consistency: ConsistencyLevel) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.sync_writes || consistency.requires_sync());
        write_opts
    }

    /// Data family handle and its index handle.
    fn families(
        &self,
        column_family: &str,
    ) -> Result<(&ColumnFamily, &ColumnFamily), ColumnStoreError> {
        let unknown = || ColumnStoreError::UnknownColumnFamily(column_family.to_string());
        let data = self.db.cf_handle(column_family).ok_or_else(unknown)?;
        let index = self
            .db
            .cf_handle(&index_family(column_family))
            .ok_or_else(unknown)?;
        Ok((data, index))
    }

    /// Up to `range.count` rows of `range` carrying `column_name`, ascending.
    fn indexed_rows(
        &self,
        index: &ColumnFamily,
        column_name: &[u8],
        range: &KeyRange,
    ) -> Result<Vec<Vec<u8>>, ColumnStoreError> {
        let prefix = index_key(column_name, &[])?;
        let seek = index_key(column_name, &range.start_key)?;

        let mut rows = Vec::new();
        for item in self
            .db
            .iterator_cf(index, IteratorMode::From(seek.as_slice(), Direction::Forward))
        {
            let (key, _) = item.map_err(|e| ColumnStoreError::Io {
                message: format!("RocksDB index scan failed: {}", e),
            })?;
            let Some(row) = key.strip_prefix(prefix.as_slice()) else {
                break;
            };
            if range.is_past_end(row) || rows.len() == range.count {
                break;
            }
            if range.contains(row) {
                rows.push(row.to_vec());
            }
        }
        Ok(rows)
    }

    fn read_cell(
        &self,
        data: &ColumnFamily,
        row_key: &[u8],
        column_name: &[u8],
    ) -> Result<Option<Column>, ColumnStoreError> {
        let key = cell_key(row_key, column_name)?;
        let raw = self.db.get_cf(data, &key).map_err(|e| ColumnStoreError::Io {
            message: format!("RocksDB get failed: {}", e),
        })?;
        raw.map(|raw| decode_cell(&key, column_name, &raw)).transpose()
    }
}

/// Build the physical key of a cell.
pub fn cell_key(row_key: &[u8], column_name: &[u8]) -> Result<Vec<u8>, ColumnStoreError> {
    let name_len = name_len(column_name)?;
    let mut key = Vec::with_capacity(row_key.len() + column_name.len() + NAME_LEN_SUFFIX);
    key.extend_from_slice(row_key);
    key.extend_from_slice(column_name);
    key.extend_from_slice(&name_len.to_be_bytes());
    Ok(key)
}

/// Build the column index key of a cell.
pub fn index_key(column_name: &[u8], row_key: &[u8]) -> Result<Vec<u8>, ColumnStoreError> {
    let name_len = name_len(column_name)?;
    let mut key = Vec::with_capacity(NAME_LEN_SUFFIX + column_name.len() + row_key.len());
    key.extend_from_slice(&name_len.to_be_bytes());
    key.extend_from_slice(column_name);
    key.extend_from_slice(row_key);
    Ok(key)
}

fn name_len(column_name: &[u8]) -> Result<u16, ColumnStoreError> {
    u16::try_from(column_name.len()).map_err(|_| ColumnStoreError::Io {
        message: format!("column name of {} bytes is too long", column_name.len()),
    })
}

fn encode_cell(column: &Column) -> Vec<u8> {
    let mut value = Vec::with_capacity(TIMESTAMP_PREFIX + column.value.len());
    value.extend_from_slice(&column.timestamp.to_be_bytes());
    value.extend_from_slice(&column.value);
    value
}

fn decode_cell(key: &[u8], name: &[u8], raw: &[u8]) -> Result<Column, ColumnStoreError> {
    if raw.len() < TIMESTAMP_PREFIX {
        return Err(ColumnStoreError::Corruption {
            message: format!(
                "cell {} holds {} bytes, too short for a timestamp",
                hex_preview(key),
                raw.len()
            ),
        });
    }
    let (ts, value) = raw.split_at(TIMESTAMP_PREFIX);
    let mut ts_bytes = [0u8; TIMESTAMP_PREFIX];
    ts_bytes.copy_from_slice(ts);
    Ok(Column::new(name, value, i64::from_be_bytes(ts_bytes)))
}

fn hex_preview(key: &[u8]) -> String {
    hex::encode(&key[..key.len().min(16)])
}

impl ColumnStore for RocksDbColumnStore {
    fn insert(
        &self,
        column_family: &str,
        row_key: &[u8],
        column: Column,
        consistency: ConsistencyLevel,
    ) -> Result<(), ColumnStoreError> {
        let (data, index) = self.families(column_family)?;
        let key = cell_key(row_key, &column.name)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(data, &key, encode_cell(&column));
        batch.put_cf(index, index_key(&column.name, row_key)?, b"");

        let _guard = self.write_lock.lock();
        if let Some(current) = self.read_cell(data, row_key, &column.name)? {
            if !column.supersedes(&current) {
                return Ok(());
            }
        }

        self.db
            .write_opt(batch, &self.write_options(consistency))
            .map_err(|e| ColumnStoreError::Io {
                message: format!("RocksDB write failed: {}", e),
            })
    }

    fn get_range_slices(
        &self,
        column_family: &str,
        predicate: &SlicePredicate,
        range: &KeyRange,
        _consistency: ConsistencyLevel,
    ) -> Result<Vec<KeySlice>, ColumnStoreError> {
        let (data, index) = self.families(column_family)?;
        if range.count == 0 {
            return Ok(Vec::new());
        }

        let names: BTreeSet<&[u8]> = predicate.column_names.iter().map(Vec::as_slice).collect();

        // The first `count` rows overall are among the first `count` rows of
        // some predicate column.
        let mut rows = BTreeSet::new();
        for name in &names {
            rows.extend(self.indexed_rows(index, name, range)?);
        }

        let mut slices = Vec::with_capacity(range.count.min(rows.len()));
        for row in rows.into_iter().take(range.count) {
            let mut columns = Vec::with_capacity(names.len());
            for name in &names {
                if let Some(column) = self.read_cell(data, &row, name)? {
                    columns.push(column);
                }
            }
            if !columns.is_empty() {
                slices.push(KeySlice { key: row, columns });
            }
        }

        Ok(slices)
    }
}
