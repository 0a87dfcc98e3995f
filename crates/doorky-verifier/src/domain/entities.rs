//! # Domain Entities

use aes::Aes256;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::cipher::decrypt_digest;
use super::errors::AuthError;

/// Size of a SHA-256 digest and of the `hash` ciphertext.
pub const DIGEST_LEN: usize = 32;

/// AES block size and IV length.
pub const IV_LEN: usize = 16;

/// Shared secret of one door, as configured.
#[derive(Clone, Deserialize)]
pub struct DoorSecret {
    /// Door identifier used in update requests.
    pub name: String,
    /// Human readable location (exported via SpaceAPI).
    #[serde(default)]
    pub location: String,
    /// Raw shared secret; only its SHA-256 digest is used as key material.
    pub secret: String,
}

impl DoorSecret {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            secret: secret.into(),
        }
    }

    /// Derive the AES-256 key for this door.
    pub fn derive_key(&self) -> DerivedKey {
        DerivedKey::derive(self.secret.as_bytes())
    }
}

impl fmt::Debug for DoorSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoorSecret")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// `SHA-256(secret)`, used as an AES-256 key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; DIGEST_LEN]);

impl DerivedKey {
    /// Derive a key from raw secret bytes.
    pub fn derive(secret: &[u8]) -> Self {
        let mut key = [0u8; DIGEST_LEN];
        key.copy_from_slice(&Sha256::digest(secret));
        Self(key)
    }

    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

/// How strictly door names are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorNamePolicy {
    /// Non-empty and made only of ASCII letters and digits.
    #[default]
    Strict,
    /// Contains at least one ASCII letter or digit anywhere.
    Lenient,
}

impl DoorNamePolicy {
    pub fn accepts(&self, door: &str) -> bool {
        match self {
            DoorNamePolicy::Strict => {
                !door.is_empty() && door.bytes().all(|b| b.is_ascii_alphanumeric())
            }
            DoorNamePolicy::Lenient => door.bytes().any(|b| b.is_ascii_alphanumeric()),
        }
    }
}

/// Literal query fields of an update request. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawUpdateFields {
    pub door: String,
    pub val: String,
    pub ts: String,
    pub hash: String,
    pub iv: String,
}

/// A fully decoded update, before the authenticity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUpdateRequest {
    pub door: String,
    pub value: bool,
    pub timestamp_seconds: i64,
    /// `timestamp_seconds` in microseconds, already range checked.
    pub timestamp_micros: i64,
    pub hash_ciphertext: [u8; DIGEST_LEN],
    pub iv: [u8; IV_LEN],
}

impl SignedUpdateRequest {
    /// Decrypt the hash and compare it in constant time with `expected`.
    pub fn authenticate(
        self,
        cipher: Aes256,
        expected: &[u8; DIGEST_LEN],
    ) -> Result<VerifiedUpdate, AuthError> {
        let plaintext = decrypt_digest(cipher, &self.iv, &self.hash_ciphertext);
        if !bool::from(plaintext[..].ct_eq(&expected[..])) {
            return Err(AuthError::HashVerificationFailed);
        }

        Ok(VerifiedUpdate {
            door: self.door,
            value: self.value,
            timestamp_seconds: self.timestamp_seconds,
            timestamp_micros: self.timestamp_micros,
        })
    }
}

/// An update that passed verification. Only `SignedUpdateRequest::authenticate`
/// produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUpdate {
    pub door: String,
    /// `true` when the door reported open.
    pub value: bool,
    pub timestamp_seconds: i64,
    timestamp_micros: i64,
}

impl VerifiedUpdate {
    /// The reported time in microseconds since the epoch.
    pub fn timestamp_micros(&self) -> i64 {
        self.timestamp_micros
    }
}
