//! # Outbound Ports (Driven Ports)
//!
//! The column-oriented store the timeseries service writes to.
//!
//! Production: `RocksDbColumnStore` (doorky-receiver/adapters/storage)
//! Testing: `InMemoryColumnStore` (below)

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use crate::domain::entities::{Column, ConsistencyLevel, KeyRange, KeySlice, SlicePredicate};
use crate::domain::errors::ColumnStoreError;

/// Abstract interface for a wide-column store.
///
/// Rows are ordered by unsigned byte comparison of their keys. Within a row,
/// a column is overwritten only by a write whose column timestamp is not
/// older (last-write-wins).
pub trait ColumnStore: Send + Sync {
    /// Write one column into row `row_key` of `column_family`.
    fn insert(
        &self,
        column_family: &str,
        row_key: &[u8],
        column: Column,
        consistency: ConsistencyLevel,
    ) -> Result<(), ColumnStoreError>;

    /// Scan rows in ascending key order.
    ///
    /// Only rows carrying at least one predicate column are returned, each
    /// restricted to the predicate columns, up to `range.count` rows.
    fn get_range_slices(
        &self,
        column_family: &str,
        predicate: &SlicePredicate,
        range: &KeyRange,
        consistency: ConsistencyLevel,
    ) -> Result<Vec<KeySlice>, ColumnStoreError>;
}

impl<T: ColumnStore + ?Sized> ColumnStore for std::sync::Arc<T> {
    fn insert(
        &self,
        column_family: &str,
        row_key: &[u8],
        column: Column,
        consistency: ConsistencyLevel,
    ) -> Result<(), ColumnStoreError> {
        (**self).insert(column_family, row_key, column, consistency)
    }

    fn get_range_slices(
        &self,
        column_family: &str,
        predicate: &SlicePredicate,
        range: &KeyRange,
        consistency: ConsistencyLevel,
    ) -> Result<Vec<KeySlice>, ColumnStoreError> {
        (**self).get_range_slices(column_family, predicate, range, consistency)
    }
}

type Rows = BTreeMap<Vec<u8>, BTreeMap<Vec<u8>, Column>>;

/// In-memory column store for unit tests.
///
/// Consistency levels are accepted and ignored.
pub struct InMemoryColumnStore {
    families: RwLock<HashMap<String, Rows>>,
}

impl InMemoryColumnStore {
    /// Create a store with the `timeseries` family.
    pub fn new() -> Self {
        let families = HashMap::from([(crate::TIMESERIES_CF.to_string(), Rows::new())]);
        Self {
            families: RwLock::new(families),
        }
    }

    /// Number of rows stored in `column_family`.
    pub fn row_count(&self, column_family: &str) -> usize {
        self.families
            .read()
            .get(column_family)
            .map(|rows| rows.len())
            .unwrap_or(0)
    }
}

impl Default for InMemoryColumnStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnStore for InMemoryColumnStore {
    fn insert(
        &self,
        column_family: &str,
        row_key: &[u8],
        column: Column,
        _consistency: ConsistencyLevel,
    ) -> Result<(), ColumnStoreError> {
        let mut families = self.families.write();
        let rows = families
            .get_mut(column_family)
            .ok_or_else(|| ColumnStoreError::UnknownColumnFamily(column_family.to_string()))?;

        let row = rows.entry(row_key.to_vec()).or_default();
        let stale = row
            .get(&column.name)
            .is_some_and(|existing| !column.supersedes(existing));
        if !stale {
            row.insert(column.name.clone(), column);
        }
        Ok(())
    }

    fn get_range_slices(
        &self,
        column_family: &str,
        predicate: &SlicePredicate,
        range: &KeyRange,
        _consistency: ConsistencyLevel,
    ) -> Result<Vec<KeySlice>, ColumnStoreError> {
        let families = self.families.read();
        let rows = families
            .get(column_family)
            .ok_or_else(|| ColumnStoreError::UnknownColumnFamily(column_family.to_string()))?;

        let mut slices = Vec::new();
        for (key, row) in rows.iter() {
            if slices.len() >= range.count || range.is_past_end(key) {
                break;
            }
            if !range.contains(key) {
                continue;
            }
            let columns: Vec<Column> = row
                .values()
                .filter(|c| predicate.matches(&c.name))
                .cloned()
                .collect();
            if !columns.is_empty() {
                slices.push(KeySlice {
                    key: key.clone(),
                    columns,
                });
            }
        }
        Ok(slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TIMESERIES_CF;

    #[test]
    fn test_range_skips_rows_without_predicate_columns() {
        let store = InMemoryColumnStore::new();
        store
            .insert(TIMESERIES_CF, &[1], Column::new("back", vec![1], 1), ConsistencyLevel::One)
            .unwrap();
        store
            .insert(TIMESERIES_CF, &[2], Column::new("front", vec![0], 2), ConsistencyLevel::One)
            .unwrap();

        let slices = store
            .get_range_slices(
                TIMESERIES_CF,
                &SlicePredicate::columns(["front"]),
                &KeyRange::unbounded(1),
                ConsistencyLevel::One,
            )
            .unwrap();

        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].key, vec![2]);
        assert_eq!(slices[0].columns.len(), 1);
    }

    #[test]
    fn test_older_write_does_not_overwrite() {
        let store = InMemoryColumnStore::new();
        store
            .insert(TIMESERIES_CF, &[1], Column::new("front", vec![1], 20), ConsistencyLevel::One)
            .unwrap();
        store
            .insert(TIMESERIES_CF, &[1], Column::new("front", vec![0], 10), ConsistencyLevel::One)
            .unwrap();

        let slices = store
            .get_range_slices(
                TIMESERIES_CF,
                &SlicePredicate::columns(["front"]),
                &KeyRange::unbounded(10),
                ConsistencyLevel::One,
            )
            .unwrap();
        assert_eq!(slices[0].columns[0].value, vec![1]);
    }

    #[test]
    fn test_unknown_family() {
        let store = InMemoryColumnStore::new();
        let err = store
            .insert("missing", &[1], Column::new("x", vec![], 0), ConsistencyLevel::One)
            .unwrap_err();
        assert_eq!(err, ColumnStoreError::UnknownColumnFamily("missing".into()));
    }

    #[test]
    fn test_bounded_range() {
        let store = InMemoryColumnStore::new();
        for key in 1u8..=5 {
            store
                .insert(
                    TIMESERIES_CF,
                    &[key],
                    Column::new("front", vec![key], key as i64),
                    ConsistencyLevel::One,
                )
                .unwrap();
        }
        let range = KeyRange {
            start_key: vec![2],
            end_key: vec![4],
            count: 10,
        };
        let slices = store
            .get_range_slices(
                TIMESERIES_CF,
                &SlicePredicate::columns(["front"]),
                &range,
                ConsistencyLevel::One,
            )
            .unwrap();
        let keys: Vec<u8> = slices.iter().map(|s| s.key[0]).collect();
        assert_eq!(keys, vec![2, 3, 4]);
        assert_eq!(store.row_count(TIMESERIES_CF), 5);
    }
}
