//! # Ports Layer
//!
//! - `inbound.rs` - Driving port (API used by the HTTP handlers)
//! - `outbound.rs` - Driven port (the column store this service needs)

pub mod inbound;
pub mod outbound;
