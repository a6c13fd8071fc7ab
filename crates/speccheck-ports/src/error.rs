//! Error types for the ports
//!
//! Analysis errors never escape the verification core; they are logged and
//! replaced with a placeholder. Store errors surface to whoever wired the
//! store in.

use std::path::{Path, PathBuf};

/// Text-analysis backend failures
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// No backend configured or reachable
    #[error("analyzer unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with an error
    #[error("analyzer backend error: {0}")]
    Backend(String),
}

/// Persistence failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error
    #[error("io error at {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Record could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create IO error for path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
