//! Service-level errors (start-up and serving, not per request).

use doorky_timeseries::ColumnStoreError;
use doorky_verifier::RegistryError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Door secrets could not be loaded
    #[error("secret registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Timeseries database could not be opened
    #[error("storage error: {0}")]
    Storage(#[from] ColumnStoreError),

    /// Server socket bind error
    #[error("cannot bind {addr}: {message}")]
    Bind { addr: String, message: String },

    /// HTTP server terminated with an error
    #[error("server error: {0}")]
    Server(String),
}
