use super::ContradictionDetector;
use crate::graph::DerivationGraph;
use crate::resolution::strategies_for;
use speccheck_model::{Contradiction, ContradictionKind, Severity};

/// Dense graphs with nodes derived from too many parents
#[derive(Debug, Clone)]
pub struct OverSpecificationDetector {
    ratio: f64,
    max_in_degree: usize,
}

impl OverSpecificationDetector {
    /// Active when `edges > ratio * nodes`; flags in-degree above `max_in_degree`
    #[must_use]
    pub fn new(ratio: f64, max_in_degree: usize) -> Self {
        Self {
            ratio,
            max_in_degree,
        }
    }
}

impl ContradictionDetector for OverSpecificationDetector {
    fn name(&self) -> &str {
        "over_specification"
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&self, graph: &DerivationGraph) -> Vec<Contradiction> {
        if (graph.edge_count() as f64) <= self.ratio * graph.node_count() as f64 {
            return Vec::new();
        }

        graph
            .nodes()
            .filter_map(|(idx, node)| {
                let in_degree = graph.in_degree(idx);
                (in_degree > self.max_in_degree).then(|| {
                    Contradiction::new(
                        ContradictionKind::OverSpecification,
                        Severity::Low,
                        vec![node.id.clone()],
                        format!("{} derives from {in_degree} parents", node.id),
                    )
                    .with_strategies(
                        strategies_for(ContradictionKind::OverSpecification)
                            .iter()
                            .copied(),
                    )
                })
            })
            .collect()
    }
}
