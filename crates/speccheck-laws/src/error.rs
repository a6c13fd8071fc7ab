//! Errors for the categorical checker
//!
//! [`ExecutionError`] never escapes a law check: it is folded into a failing
//! result. [`LawError`] rejects malformed check input at construction.

use thiserror::Error;

/// Running a morphism went wrong
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// No transform registered under this name
    #[error("unknown transform: {0}")]
    UnknownTransform(String),

    /// Composition nests deeper than the configured budget
    #[error("composition depth {depth} exceeds limit {limit}")]
    DepthExceeded {
        /// Depth of the offending morphism
        depth: usize,
        /// Configured limit
        limit: usize,
    },

    /// The transform returned an error
    #[error("transform '{transform}' failed: {message}")]
    Failed {
        /// Transform name
        transform: String,
        /// Reported reason
        message: String,
    },

    /// The transform panicked
    #[error("transform '{transform}' panicked: {message}")]
    Panicked {
        /// Transform name
        transform: String,
        /// Panic payload, if printable
        message: String,
    },
}

impl ExecutionError {
    /// Create a failure error
    #[must_use]
    pub fn failed(transform: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            transform: transform.into(),
            message: message.into(),
        }
    }
}

/// Malformed law-check input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LawError {
    /// Operad checks need at least three operations
    #[error("operad coherence needs at least 3 operations, got {0}")]
    TooFewOperations(usize),

    /// An overlap names a section that does not exist
    #[error("overlap references unknown section '{0}'")]
    UnknownSection(String),
}
