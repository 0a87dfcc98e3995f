//! # Signed Update Verifier
//!
//! Turns an unauthenticated door status update into a trust-checked event.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): secret registry, field parsing, AES-CBC
//!   digest decryption. No I/O.
//! - **Ports Layer** (`ports/`): `UpdateVerificationApi` (inbound),
//!   `KeyLookup` and `RejectionCounter` (outbound)
//! - **Service Layer** (`service.rs`): the fail-fast verification pipeline
//!
//! ## Signature Scheme
//!
//! A sensor sends `door`, `val`, `ts`, `hash` and `iv`. `hash` is
//! `SHA-256(door "\n" val "\n" ts)` encrypted with AES-256-CBC under
//! `SHA-256(secret)` and the given IV. The verifier decrypts `hash` and
//! compares it, in constant time, with the digest it computes from the
//! literal field text.
//!
//! ## Security Notes
//!
//! - The scheme is not a MAC. CBC ciphertext is malleable, so the only
//!   guarantee is that a valid `hash` decrypts to the exact expected digest.
//! - There is no replay protection. Re-sending a valid update rewrites the
//!   same row.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::entities::{
    DerivedKey, DoorNamePolicy, DoorSecret, RawUpdateFields, SignedUpdateRequest, VerifiedUpdate,
};
pub use domain::errors::{AuthError, CryptoError, InputError, RegistryError, Rejection};
pub use domain::registry::SecretRegistry;
pub use domain::signer::{sign_update, SignedFields};
pub use ports::inbound::UpdateVerificationApi;
pub use ports::outbound::{KeyLookup, NoopRejectionCounter, RejectionCounter};
pub use service::UpdateVerifier;
