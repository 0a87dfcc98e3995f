//! # Verification Errors
//!
//! Every rejection carries a stable reason name. The names double as counter
//! names and are never sent back to the client.

use thiserror::Error;

/// Malformed or ill-typed request fields. Always caused by the client.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("malformed-request")]
    MalformedRequest,
    #[error("invalid-door-name")]
    InvalidDoorName,
    #[error("unparseable-value")]
    UnparseableValue,
    #[error("unparseable-timestamp")]
    UnparseableTimestamp,
    /// Not after the epoch, or too large for microseconds.
    #[error("timestamp-out-of-range")]
    TimestampOutOfRange,
    #[error("unparseable-hash")]
    UnparseableHash,
    #[error("invalid-iv")]
    InvalidIv,
}

/// Unknown door or failed authenticity check.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("unknown-door")]
    UnknownDoor,
    #[error("hash-verification-failed")]
    HashVerificationFailed,
}

/// Key material or cipher failure. Indicates an operational defect.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("cipher-init-failed")]
    CipherInitFailed,
}

/// Classified reason an update was not accepted.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl Rejection {
    /// Every reason name, in pipeline order.
    pub const ALL_REASONS: [&'static str; 10] = [
        "malformed-request",
        "invalid-door-name",
        "unparseable-value",
        "unparseable-timestamp",
        "timestamp-out-of-range",
        "unparseable-hash",
        "unknown-door",
        "cipher-init-failed",
        "invalid-iv",
        "hash-verification-failed",
    ];

    /// Stable reason name.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::Input(e) => match e {
                InputError::MalformedRequest => "malformed-request",
                InputError::InvalidDoorName => "invalid-door-name",
                InputError::UnparseableValue => "unparseable-value",
                InputError::UnparseableTimestamp => "unparseable-timestamp",
                InputError::TimestampOutOfRange => "timestamp-out-of-range",
                InputError::UnparseableHash => "unparseable-hash",
                InputError::InvalidIv => "invalid-iv",
            },
            Rejection::Auth(e) => match e {
                AuthError::UnknownDoor => "unknown-door",
                AuthError::HashVerificationFailed => "hash-verification-failed",
            },
            Rejection::Crypto(CryptoError::CipherInitFailed) => "cipher-init-failed",
        }
    }
}

/// Errors building a `SecretRegistry`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("door name must not be empty")]
    EmptyName,

    #[error("door {0} is configured more than once")]
    DuplicateDoor(String),

    #[error("door {0} has an empty secret")]
    EmptySecret(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_matches_display() {
        let all = [
            Rejection::from(InputError::MalformedRequest),
            InputError::InvalidDoorName.into(),
            InputError::UnparseableValue.into(),
            InputError::UnparseableTimestamp.into(),
            InputError::TimestampOutOfRange.into(),
            InputError::UnparseableHash.into(),
            AuthError::UnknownDoor.into(),
            CryptoError::CipherInitFailed.into(),
            InputError::InvalidIv.into(),
            AuthError::HashVerificationFailed.into(),
        ];
        for (rejection, name) in all.iter().zip(Rejection::ALL_REASONS) {
            assert_eq!(rejection.reason(), name);
            assert_eq!(rejection.to_string(), name);
        }
    }
}
