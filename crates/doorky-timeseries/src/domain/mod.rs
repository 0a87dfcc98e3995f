//! # Domain Layer
//!
//! Pure logic for the timeseries store. No I/O happens here.
//!
//! ## Modules
//!
//! - `row_key` - Negated-timestamp row key codec
//! - `entities` - Columns, key ranges, readings
//! - `errors` - Domain error types

pub mod entities;
pub mod errors;
pub mod row_key;
