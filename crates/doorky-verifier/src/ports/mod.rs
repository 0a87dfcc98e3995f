//! # Ports Layer
//!
//! - **Inbound (Driving)**: `UpdateVerificationApi`
//! - **Outbound (Driven)**: `KeyLookup`, `RejectionCounter`

pub mod inbound;
pub mod outbound;
