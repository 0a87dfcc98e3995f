//! # Update Verification Service
//!
//! Implements `UpdateVerificationApi` as a fail-fast pipeline:
//!
//! ```text
//! door name → val → ts → ts range → hash → key lookup → cipher → iv → decrypt → compare
//! ```
//!
//! The key lookup precedes all cipher work, and the IV is validated before
//! anything is decrypted. Every rejection is counted before it is returned.

use tracing::{debug, warn};

use crate::domain::canonical::{
    decode_hash, decode_iv, expected_digest, parse_timestamp, parse_value, timestamp_micros,
};
use crate::domain::cipher::init_cipher;
use crate::domain::entities::{
    DoorNamePolicy, RawUpdateFields, SignedUpdateRequest, VerifiedUpdate,
};
use crate::domain::errors::{AuthError, InputError, Rejection};
use crate::ports::inbound::UpdateVerificationApi;
use crate::ports::outbound::{KeyLookup, RejectionCounter};

/// Signed update verifier.
pub struct UpdateVerifier<K: KeyLookup, C: RejectionCounter> {
    keys: K,
    counter: C,
    policy: DoorNamePolicy,
}

impl<K: KeyLookup, C: RejectionCounter> UpdateVerifier<K, C> {
    /// Create a verifier with the strict door name policy.
    pub fn new(keys: K, counter: C) -> Self {
        Self {
            keys,
            counter,
            policy: DoorNamePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DoorNamePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn check(&self, fields: &RawUpdateFields) -> Result<VerifiedUpdate, Rejection> {
        if !self.policy.accepts(&fields.door) {
            return Err(InputError::InvalidDoorName.into());
        }
        let value = parse_value(&fields.val)?;
        let timestamp_seconds = parse_timestamp(&fields.ts)?;
        let timestamp_micros = timestamp_micros(timestamp_seconds)?;
        let hash_ciphertext = decode_hash(&fields.hash)?;

        let key = self
            .keys
            .key_for(&fields.door)
            .ok_or(AuthError::UnknownDoor)?;
        let cipher = init_cipher(key)?;
        let iv = decode_iv(&fields.iv)?;

        let request = SignedUpdateRequest {
            door: fields.door.clone(),
            value,
            timestamp_seconds,
            timestamp_micros,
            hash_ciphertext,
            iv,
        };
        let expected = expected_digest(&fields.door, &fields.val, &fields.ts);

        Ok(request.authenticate(cipher, &expected)?)
    }
}

impl<K: KeyLookup, C: RejectionCounter> UpdateVerificationApi for UpdateVerifier<K, C> {
    fn verify(&self, fields: &RawUpdateFields) -> Result<VerifiedUpdate, Rejection> {
        match self.check(fields) {
            Ok(update) => {
                debug!(
                    door = %update.door,
                    value = update.value,
                    ts = update.timestamp_seconds,
                    "Update verified"
                );
                Ok(update)
            }
            Err(rejection) => {
                warn!(
                    door = %fields.door,
                    reason = rejection.reason(),
                    "Rejected door update"
                );
                Err(self.reject(rejection))
            }
        }
    }

    fn reject(&self, rejection: Rejection) -> Rejection {
        self.counter.record_rejection(rejection.reason());
        rejection
    }
}
