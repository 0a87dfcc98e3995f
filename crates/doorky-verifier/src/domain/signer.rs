//! # Update Signer
//!
//! Sender side of the scheme: produces the `hash` and `iv` query values a
//! sensor attaches to an update. Used by sensor tooling and tests.

use super::canonical::{encode_hash, expected_digest};
use super::cipher::encrypt_digest;
use super::entities::{DerivedKey, RawUpdateFields, IV_LEN};
use super::errors::CryptoError;

/// Query values carrying the authenticity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedFields {
    /// URL-safe base64 of the encrypted digest.
    pub hash: String,
    /// Hex-encoded IV.
    pub iv: String,
}

/// Sign `door`/`val`/`ts` exactly as they will appear in the query.
pub fn sign_update(
    key: &DerivedKey,
    door: &str,
    val: &str,
    ts: &str,
    iv: &[u8; IV_LEN],
) -> Result<SignedFields, CryptoError> {
    let digest = expected_digest(door, val, ts);
    let ciphertext = encrypt_digest(key, iv, &digest)?;
    Ok(SignedFields {
        hash: encode_hash(&ciphertext),
        iv: hex::encode(iv),
    })
}

impl SignedFields {
    /// Assemble the complete set of query fields.
    pub fn into_fields(self, door: &str, val: &str, ts: &str) -> RawUpdateFields {
        RawUpdateFields {
            door: door.to_string(),
            val: val.to_string(),
            ts: ts.to_string(),
            hash: self.hash,
            iv: self.iv,
        }
    }
}
