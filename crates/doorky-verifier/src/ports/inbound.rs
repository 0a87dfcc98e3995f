//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::{RawUpdateFields, VerifiedUpdate};
use crate::domain::errors::Rejection;

/// Verification API used by the ingestion handler.
///
/// Implementations must be thread-safe (`Send + Sync`) and stateless across
/// calls.
pub trait UpdateVerificationApi: Send + Sync {
    /// Check a signed update.
    ///
    /// Stages run in a fixed order and stop at the first failure; a rejection
    /// has no side effects other than being counted.
    fn verify(&self, fields: &RawUpdateFields) -> Result<VerifiedUpdate, Rejection>;

    /// Report a rejection that happened before `verify` could run, such as a
    /// query string that could not be parsed.
    fn reject(&self, rejection: Rejection) -> Rejection;
}
