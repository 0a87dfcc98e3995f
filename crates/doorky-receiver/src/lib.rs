//! # Doorky Receiver
//!
//! HTTP front end for door sensors.
//!
//! ```text
//!  sensor ──GET /api/doorstatus──→ write_api ──verify──→ UpdateVerifier
//!                                      │
//!                                      └──insert──→ TimeseriesService ──→ RocksDB
//!
//!  client ──GET /api/spaceapi───→ space_api ──last_value (per door)──┘
//! ```
//!
//! ## Modules
//!
//! - `config` - TOML configuration and validation
//! - `adapters/` - RocksDB implementation of the `ColumnStore` port
//! - `api/` - request handlers and HTTP error mapping
//! - `metrics` - rejection and ingestion counters
//! - `service` - `ReceiverService`, router and server lifecycle
//! - `telemetry` - tracing subscriber setup
//!
//! ## Usage
//!
//! ```ignore
//! use doorky_receiver::{ReceiverConfig, ReceiverService};
//!
//! let config = ReceiverConfig::load("doorky.toml")?;
//! let service = ReceiverService::new(&config)?;
//! service.run(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod service;
pub mod telemetry;

pub use api::space_api::{SpaceApi, SpaceApiDocument, StatusDocument};
pub use api::AppState;
pub use config::{ConfigError, ReceiverConfig};
pub use error::ReceiverError;
pub use metrics::ReceiverMetrics;
pub use service::ReceiverService;
