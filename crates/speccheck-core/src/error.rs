//! Error types for SpecCheck sessions and configuration
//!
//! Verification outcomes are data. These errors cover the edges: reading
//! configuration and input files, and initializing telemetry.

use speccheck_model::ModelError;
use speccheck_ports::StoreError;
use std::path::{Path, PathBuf};

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Read {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override has an unusable value
    #[error("invalid value for {var}: {value}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Rejected value
        value: String,
    },
}

/// Top-level SpecCheck error
#[derive(Debug, thiserror::Error)]
pub enum SpecCheckError {
    /// Configuration problem
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Input file could not be read
    #[error("cannot read input {path}: {source}")]
    Input {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON input did not match the schema
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML input did not match the schema
    #[error("invalid YAML input: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Input adapter contract violation
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Result store could not be opened
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Subscriber could not be installed
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

impl SpecCheckError {
    /// Create input error for path
    pub fn input(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Input {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
