//! # Field Parsing and Canonical Digest
//!
//! Parsers for the individual query fields, and the digest a sender must
//! have encrypted.
//!
//! The digest covers the *literal* field text (`val=1` and `val=true` hash
//! differently). Senders depend on this byte-for-byte.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use sha2::{Digest, Sha256};

use super::entities::{DIGEST_LEN, IV_LEN};
use super::errors::InputError;

/// Parse a boolean the way sensor firmware formats it.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_value(raw: &str) -> Result<bool, InputError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(InputError::UnparseableValue),
    }
}

/// Parse a signed decimal timestamp in seconds.
pub fn parse_timestamp(raw: &str) -> Result<i64, InputError> {
    raw.parse::<i64>()
        .map_err(|_| InputError::UnparseableTimestamp)
}

/// Convert a parsed timestamp to microseconds.
///
/// Only instants after the epoch are accepted. Row keys order readings by
/// negated timestamp, which keeps newest-first only for positive values.
pub fn timestamp_micros(seconds: i64) -> Result<i64, InputError> {
    if seconds <= 0 {
        return Err(InputError::TimestampOutOfRange);
    }
    seconds
        .checked_mul(1_000_000)
        .ok_or(InputError::TimestampOutOfRange)
}

/// Decode the URL-safe, padded base64 `hash` field into a 32-byte block.
pub fn decode_hash(raw: &str) -> Result<[u8; DIGEST_LEN], InputError> {
    let bytes = URL_SAFE
        .decode(raw)
        .map_err(|_| InputError::UnparseableHash)?;
    bytes.try_into().map_err(|_| InputError::UnparseableHash)
}

/// Decode the hex `iv` field into exactly one cipher block.
pub fn decode_iv(raw: &str) -> Result<[u8; IV_LEN], InputError> {
    let bytes = hex::decode(raw).map_err(|_| InputError::InvalidIv)?;
    bytes.try_into().map_err(|_| InputError::InvalidIv)
}

/// `SHA-256(door "\n" val "\n" ts)` over the literal field text.
pub fn expected_digest(door: &str, raw_val: &str, raw_ts: &str) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(door.as_bytes());
    hasher.update(b"\n");
    hasher.update(raw_val.as_bytes());
    hasher.update(b"\n");
    hasher.update(raw_ts.as_bytes());

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Encode a ciphertext block the way it travels in the `hash` field.
pub fn encode_hash(ciphertext: &[u8; DIGEST_LEN]) -> String {
    URL_SAFE.encode(ciphertext)
}
