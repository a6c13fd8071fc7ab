//! SpecCheck Graph Engine
//!
//! Builds a derivation graph (principles → requirements → design →
//! implementation) from parsed specification input and reports structural
//! defects.
//!
//! # Core Concepts
//!
//! - [`GraphEngine`]: entry point; `build` from [`SpecData`], `analyze` a graph
//! - [`DerivationGraph`]: arena storage over `petgraph`, addressed by node id
//! - [`ContradictionDetector`]: pluggable check; five stock detectors run in parallel
//! - [`find_orphans`] / [`derivation_paths`] / [`determine_status`]: traceability
//! - [`generate_resolution_strategies`]: category → advice lookup
//!
//! # Example
//!
//! ```rust
//! use speccheck_graph::GraphEngine;
//! use speccheck_model::{SpecData, SpecItem};
//!
//! let data = SpecData {
//!     requirements: vec![SpecItem::new("r1", "Agents compose into pipelines")],
//!     ..SpecData::default()
//! };
//! let result = GraphEngine::default().build(&data);
//! assert!(result.orphaned_nodes.is_empty());
//! ```
//!
//! [`SpecData`]: speccheck_model::SpecData

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod analysis;
mod builder;
mod config;
mod detectors;
mod engine;
mod error;
mod graph;
mod resolution;
mod text;

pub use analysis::{derivation_paths, determine_status, find_orphans};
pub use builder::GraphBuilder;
pub use config::{default_principles, GraphConfig, PrincipleSeed};
pub use detectors::{
    default_detectors, CircularDependencyDetector, ContradictionDetector,
    MutuallyExclusiveTermsDetector, OverSpecificationDetector, ResourceConflictDetector,
    SemanticNegationDetector,
};
pub use engine::GraphEngine;
pub use error::GraphError;
pub use graph::DerivationGraph;
pub use resolution::{generate_resolution_strategies, strategies_for};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
