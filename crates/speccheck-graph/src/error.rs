//! Graph engine errors

use thiserror::Error;

/// Errors raised while assembling a derivation graph by hand
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Edge endpoint is not in the graph
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// A node with this id already exists
    #[error("duplicate node: {0}")]
    DuplicateNode(String),
}
