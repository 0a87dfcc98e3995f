//! # Secret Registry
//!
//! Immutable mapping from door name to derived key, built once at start-up.
//! Safe for unsynchronized concurrent reads.

use std::collections::HashMap;

use super::entities::{DerivedKey, DoorSecret};
use super::errors::RegistryError;
use crate::ports::outbound::KeyLookup;

/// Door name → `SHA-256(secret)`.
#[derive(Debug)]
pub struct SecretRegistry {
    keys: HashMap<String, DerivedKey>,
}

impl SecretRegistry {
    /// Build the registry, deriving one key per door.
    ///
    /// # Errors
    /// Rejects empty names, empty secrets and duplicate door names.
    pub fn from_secrets(secrets: &[DoorSecret]) -> Result<Self, RegistryError> {
        let mut keys = HashMap::with_capacity(secrets.len());

        for secret in secrets {
            if secret.name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if secret.secret.is_empty() {
                return Err(RegistryError::EmptySecret(secret.name.clone()));
            }
            if keys
                .insert(secret.name.clone(), secret.derive_key())
                .is_some()
            {
                return Err(RegistryError::DuplicateDoor(secret.name.clone()));
            }
        }

        Ok(Self { keys })
    }

    pub fn lookup(&self, door: &str) -> Option<&DerivedKey> {
        self.keys.get(door)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeyLookup for SecretRegistry {
    fn key_for(&self, door: &str) -> Option<&DerivedKey> {
        self.lookup(door)
    }
}
