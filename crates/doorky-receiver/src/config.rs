//! # Receiver Configuration
//!
//! Loaded once at start-up from a TOML file and validated before anything
//! else is constructed.
//!
//! ```toml
//! primary_door = "front"
//!
//! [http]
//! bind = "0.0.0.0:8080"
//!
//! [database]
//! path = "./data"
//! keyspace = "doorky"
//! timeout_ms = 1000
//!
//! [[door]]
//! name = "front"
//! location = "Main entrance"
//! secret = "..."
//! ```

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use doorky_verifier::{DoorNamePolicy, DoorSecret};
use serde::Deserialize;

use crate::api::space_api::SpaceApiDocument;

/// Top-level receiver configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiverConfig {
    /// Door whose state drives the SpaceAPI `state` block.
    #[serde(default)]
    pub primary_door: Option<String>,
    #[serde(default)]
    pub door_name_policy: DoorNamePolicy,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Known doors and their shared secrets, in display order.
    #[serde(default, rename = "door")]
    pub doors: Vec<DoorSecret>,
    /// SpaceAPI metadata. `/api/spaceapi` is served only when present.
    #[serde(default)]
    pub spaceapi: Option<SpaceApiDocument>,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

/// Timeseries database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Base directory for database files.
    pub path: PathBuf,
    /// Subdirectory under `path` holding this deployment's data.
    pub keyspace: String,
    /// Upper bound on a single store call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data"),
            keyspace: "doorky".to_string(),
            timeout_ms: 1000,
        }
    }
}

impl DatabaseConfig {
    pub fn directory(&self) -> PathBuf {
        self.path.join(&self.keyspace)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
    #[error("invalid TOML: {0}")]
    Parse(String),
    #[error("no doors configured")]
    NoDoors,
    #[error("door with empty name")]
    EmptyDoorName,
    #[error("door {0} configured more than once")]
    DuplicateDoor(String),
    #[error("door {0} has an empty secret")]
    EmptySecret(String),
    #[error("primary door {0} is not a configured door")]
    UnknownPrimaryDoor(String),
    #[error("database timeout must be greater than zero")]
    InvalidTimeout,
    #[error("database keyspace must not be empty")]
    EmptyKeyspace,
}

impl ReceiverConfig {
    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.doors.is_empty() {
            return Err(ConfigError::NoDoors);
        }

        let mut seen = HashSet::new();
        for door in &self.doors {
            if door.name.is_empty() {
                return Err(ConfigError::EmptyDoorName);
            }
            if !seen.insert(door.name.as_str()) {
                return Err(ConfigError::DuplicateDoor(door.name.clone()));
            }
            if door.secret.is_empty() {
                return Err(ConfigError::EmptySecret(door.name.clone()));
            }
        }

        if let Some(primary) = &self.primary_door {
            if !seen.contains(primary.as_str()) {
                return Err(ConfigError::UnknownPrimaryDoor(primary.clone()));
            }
        }

        if self.database.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.database.keyspace.is_empty() {
            return Err(ConfigError::EmptyKeyspace);
        }

        Ok(())
    }
}
