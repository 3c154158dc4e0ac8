//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! daemon. All types derive Serde traits for deserialization from config
//! files, and every field has a default so the daemon runs with no file
//! at all.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the notary daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Storage locations.
    pub storage: StorageConfig,

    /// Process signal handling.
    pub signals: SignalConfig,

    /// Listener limits.
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Explicit data-directory root. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,

    /// Contract file name inside the data directory.
    pub contract_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            contract_file: "notary.toml".to_string(),
        }
    }
}

/// Signal handling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Install the process signal handler during bootstrap.
    pub install: bool,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self { install: true }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            max_connections: 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter directive (overridden by RUST_LOG).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
