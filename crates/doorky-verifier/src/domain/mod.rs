//! # Domain Layer
//!
//! Pure verification logic with no I/O dependencies.

pub mod canonical;
pub mod cipher;
pub mod entities;
pub mod errors;
pub mod registry;
pub mod signer;
