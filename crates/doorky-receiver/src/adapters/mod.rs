//! # Adapters
//!
//! Outbound port implementations backed by real infrastructure.

pub mod storage;
