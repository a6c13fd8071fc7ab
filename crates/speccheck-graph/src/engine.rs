//! Graph engine entry point

use crate::analysis::{derivation_paths, determine_status, find_orphans};
use crate::builder::GraphBuilder;
use crate::config::GraphConfig;
use crate::detectors::{default_detectors, ContradictionDetector};
use crate::graph::DerivationGraph;
use crate::resolution::generate_resolution_strategies;
use rayon::prelude::*;
use speccheck_model::{Contradiction, GraphNode, SpecData, VerificationGraphResult};

/// Builds derivation graphs and analyzes them
///
/// # Example
///
/// ```
/// use speccheck_graph::GraphEngine;
/// use speccheck_model::{SpecData, SpecItem, VerificationStatus};
///
/// let engine = GraphEngine::default();
/// let data = SpecData {
///     implementation_tasks: vec![SpecItem::new("t1", "Unrelated chore")],
///     ..SpecData::default()
/// };
/// let result = engine.build(&data);
/// assert_eq!(result.status, VerificationStatus::NeedsReview);
/// assert_eq!(result.orphaned_nodes[0].as_str(), "t1");
/// ```
pub struct GraphEngine {
    config: GraphConfig,
    detectors: Vec<Box<dyn ContradictionDetector>>,
}

impl GraphEngine {
    /// Engine with the stock detectors
    #[must_use]
    pub fn new(config: GraphConfig) -> Self {
        let detectors = default_detectors(&config);
        Self { config, detectors }
    }

    /// Append a detector; runs after the stock ones
    #[must_use]
    pub fn with_detector(mut self, detector: impl ContradictionDetector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Build a graph from adapter input and analyze it
    #[must_use]
    pub fn build(&self, data: &SpecData) -> VerificationGraphResult {
        let span = tracing::info_span!("graph_build", items = data.item_count());
        let _guard = span.enter();

        let graph = GraphBuilder::new(&self.config).build(data);
        metrics::counter!("speccheck_graph_builds_total").increment(1);
        self.analyze(&graph)
    }

    /// Analyze an already assembled graph
    #[must_use]
    pub fn analyze(&self, graph: &DerivationGraph) -> VerificationGraphResult {
        let contradictions = self.detect_contradictions(graph);
        let orphaned_nodes = find_orphans(graph);
        let paths = derivation_paths(graph);
        let status = determine_status(&contradictions, &orphaned_nodes, &paths);

        let orphan_nodes: Vec<&GraphNode> = orphaned_nodes
            .iter()
            .filter_map(|id| graph.node(id))
            .collect();
        let resolution_strategies = generate_resolution_strategies(&contradictions, &orphan_nodes);

        metrics::counter!("speccheck_graph_contradictions_total")
            .increment(contradictions.len() as u64);
        tracing::info!(
            "graph analyzed: {} nodes, {} contradictions, {} orphans, status {:?}",
            graph.node_count(),
            contradictions.len(),
            orphaned_nodes.len(),
            status
        );

        VerificationGraphResult {
            graph_id: graph.content_hash(),
            status,
            nodes: graph.nodes().map(|(_, n)| n.clone()).collect(),
            edges: graph.edges().cloned().collect(),
            contradictions,
            orphaned_nodes,
            derivation_paths: paths,
            resolution_strategies,
        }
    }

    /// Run every detector in parallel; results in detector order
    ///
    /// Contradictions naming nodes absent from `graph` are dropped.
    #[must_use]
    pub fn detect_contradictions(&self, graph: &DerivationGraph) -> Vec<Contradiction> {
        let per_detector: Vec<Vec<Contradiction>> = self
            .detectors
            .par_iter()
            .map(|detector| {
                let found = detector.detect(graph);
                tracing::debug!("{}: {} contradictions", detector.name(), found.len());
                found
            })
            .collect();

        per_detector
            .into_iter()
            .flatten()
            .filter(|c| {
                let valid = c.node_ids.iter().all(|id| graph.contains(id));
                if !valid {
                    tracing::error!("dropping {} contradiction with dangling node ids", c.kind.as_str());
                }
                valid
            })
            .collect()
    }
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl std::fmt::Debug for GraphEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.detectors.iter().map(|d| d.name()).collect();
        f.debug_struct("GraphEngine")
            .field("config", &self.config)
            .field("detectors", &names)
            .finish()
    }
}
