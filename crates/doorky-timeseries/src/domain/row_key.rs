//! # Row Key Codec
//!
//! Maps a microsecond timestamp to the 8-byte row key used by the
//! `timeseries` column family.
//!
//! The key is the big-endian encoding of `-timestamp`. Negation reverses
//! chronological order, so for `t1 > t2 > 0` we get `encode(t1) < encode(t2)`
//! under unsigned byte comparison and an ascending scan yields the newest
//! record first.
//!
//! The ordering only holds for strictly positive timestamps: `0` encodes to
//! all-zero bytes and negative timestamps encode to small positive integers,
//! both of which sort ahead of every positive timestamp. `doorky-verifier`
//! rejects such timestamps before they reach a store. `decode` is the exact
//! inverse of `encode` for every `i64`.

use super::entities::TimestampMicros;
use super::errors::RowKeyError;

/// Width of an encoded row key in bytes.
pub const ROW_KEY_LEN: usize = 8;

/// Encode a microsecond timestamp as a row key.
pub fn encode(timestamp: TimestampMicros) -> [u8; ROW_KEY_LEN] {
    (timestamp.wrapping_neg() as u64).to_be_bytes()
}

/// Decode a row key back to its microsecond timestamp.
///
/// # Errors
///
/// Returns `RowKeyError::InvalidLength` unless `key` is exactly 8 bytes.
pub fn decode(key: &[u8]) -> Result<TimestampMicros, RowKeyError> {
    let bytes: [u8; ROW_KEY_LEN] = key.try_into().map_err(|_| RowKeyError::InvalidLength {
        expected: ROW_KEY_LEN,
        actual: key.len(),
    })?;
    Ok((u64::from_be_bytes(bytes) as i64).wrapping_neg())
}
