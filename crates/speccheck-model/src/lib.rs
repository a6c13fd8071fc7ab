//! SpecCheck Model
//!
//! Plain data shared by the graph engine and the categorical checker.
//!
//! # Core Concepts
//!
//! - [`Morphism`] / [`OperationSpec`]: composable operations, as data
//! - [`GraphNode`] / [`GraphEdge`]: the derivation graph vocabulary
//! - [`Contradiction`] / [`VerificationGraphResult`]: graph findings
//! - [`CounterExample`] / [`VerificationResult`]: law findings
//! - [`SpecData`]: what an input adapter hands to the graph engine
//!
//! Every type serializes to a plain key-value document; the field names are
//! the stable persistence contract.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod graph;
mod morphism;
mod spec_data;
mod verification;

pub use error::ModelError;
pub use graph::{
    Contradiction, ContradictionKind, DerivationKind, DerivationPath, GraphEdge, GraphNode,
    NodeId, NodeKind, Severity, VerificationGraphResult, VerificationStatus, SOURCE_KEY,
};
pub use morphism::{Morphism, OperationSpec, ValueType};
pub use spec_data::{SpecData, SpecItem};
pub use verification::{CounterExample, Law, TestInput, VerificationResult};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
