use super::{ids, node_tokens, ContradictionDetector};
use crate::graph::DerivationGraph;
use crate::resolution::strategies_for;
use crate::text::contains_phrase;
use petgraph::graph::NodeIndex;
use speccheck_model::{Contradiction, ContradictionKind, Severity};

/// Many nodes competing for shared resources
#[derive(Debug, Clone)]
pub struct ResourceConflictDetector {
    keywords: Vec<String>,
    threshold: usize,
}

impl ResourceConflictDetector {
    /// Raise an advisory once more than `threshold` nodes mention a keyword
    #[must_use]
    pub fn new(keywords: Vec<String>, threshold: usize) -> Self {
        Self {
            keywords,
            threshold,
        }
    }
}

impl ContradictionDetector for ResourceConflictDetector {
    fn name(&self) -> &str {
        "resource_conflict"
    }

    fn detect(&self, graph: &DerivationGraph) -> Vec<Contradiction> {
        let mentioning: Vec<NodeIndex> = node_tokens(graph)
            .into_iter()
            .filter(|(_, t)| self.keywords.iter().any(|k| contains_phrase(t, k)))
            .map(|(idx, _)| idx)
            .collect();

        if mentioning.len() <= self.threshold {
            return Vec::new();
        }

        let named = ids(graph, &mentioning[..3.min(mentioning.len())]);
        let list: Vec<&str> = named.iter().map(|id| id.as_str()).collect();
        vec![Contradiction::new(
            ContradictionKind::ResourceConflict,
            Severity::Low,
            named.clone(),
            format!(
                "{} nodes compete for shared resources, including {}",
                mentioning.len(),
                list.join(", ")
            ),
        )
        .with_strategies(strategies_for(ContradictionKind::ResourceConflict).iter().copied())]
    }
}
