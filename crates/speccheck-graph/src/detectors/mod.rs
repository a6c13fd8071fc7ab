//! Contradiction detectors
//!
//! Each detector reads an immutable [`DerivationGraph`] and reports what it
//! finds. Detectors are independent of one another and run in parallel.

mod circular;
mod exclusive;
mod negation;
mod overspec;
mod resource;

pub use circular::CircularDependencyDetector;
pub use exclusive::MutuallyExclusiveTermsDetector;
pub use negation::SemanticNegationDetector;
pub use overspec::OverSpecificationDetector;
pub use resource::ResourceConflictDetector;

use crate::config::GraphConfig;
use crate::graph::DerivationGraph;
use crate::text::tokenize;
use petgraph::graph::NodeIndex;
use speccheck_model::{Contradiction, NodeId};

/// A structural or semantic check over a derivation graph
pub trait ContradictionDetector: Send + Sync {
    /// Detector name, for logs
    fn name(&self) -> &str;

    /// Contradictions found; every referenced id must exist in `graph`
    fn detect(&self, graph: &DerivationGraph) -> Vec<Contradiction>;
}

/// The five stock detectors, in reporting order
#[must_use]
pub fn default_detectors(config: &GraphConfig) -> Vec<Box<dyn ContradictionDetector>> {
    vec![
        Box::new(CircularDependencyDetector),
        Box::new(MutuallyExclusiveTermsDetector::new(config.antonym_pairs.clone())),
        Box::new(ResourceConflictDetector::new(
            config.resource_keywords.clone(),
            config.resource_node_threshold,
        )),
        Box::new(SemanticNegationDetector::new(config.negation_pairs.clone())),
        Box::new(OverSpecificationDetector::new(
            config.over_specification_ratio,
            config.max_in_degree,
        )),
    ]
}

/// Token lists for every node, indexed like the graph
fn node_tokens(graph: &DerivationGraph) -> Vec<(NodeIndex, Vec<String>)> {
    graph
        .nodes()
        .map(|(idx, node)| (idx, tokenize(&node.text())))
        .collect()
}

fn ids(graph: &DerivationGraph, indices: &[NodeIndex]) -> Vec<NodeId> {
    indices
        .iter()
        .filter_map(|idx| graph.node_at(*idx).map(|n| n.id.clone()))
        .collect()
}

/// Nodes on either side of a polarity split, in graph order, when distinct
/// nodes exist on both sides
fn opposing(left: &[NodeIndex], right: &[NodeIndex]) -> Option<Vec<NodeIndex>> {
    let distinct = left.iter().any(|l| right.iter().any(|r| r != l));
    if !distinct {
        return None;
    }
    let mut involved: Vec<NodeIndex> = left.to_vec();
    for r in right {
        if !involved.contains(r) {
            involved.push(*r);
        }
    }
    involved.sort();
    Some(involved)
}
