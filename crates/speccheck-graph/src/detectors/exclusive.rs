use super::{ids, node_tokens, opposing, ContradictionDetector};
use crate::graph::DerivationGraph;
use crate::resolution::strategies_for;
use crate::text::contains_phrase;
use petgraph::graph::NodeIndex;
use speccheck_model::{Contradiction, ContradictionKind, Severity};

/// Distinct nodes asking for opposite properties
#[derive(Debug, Clone)]
pub struct MutuallyExclusiveTermsDetector {
    pairs: Vec<(String, String)>,
}

impl MutuallyExclusiveTermsDetector {
    /// Detector over antonym pairs
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl ContradictionDetector for MutuallyExclusiveTermsDetector {
    fn name(&self) -> &str {
        "mutually_exclusive_terms"
    }

    fn detect(&self, graph: &DerivationGraph) -> Vec<Contradiction> {
        let tokens = node_tokens(graph);
        let mut out = Vec::new();

        for (left, right) in &self.pairs {
            let matching = |term: &str| -> Vec<NodeIndex> {
                tokens
                    .iter()
                    .filter(|(_, t)| contains_phrase(t, term))
                    .map(|(idx, _)| *idx)
                    .collect()
            };
            let left_nodes = matching(left);
            let right_nodes = matching(right);

            if let Some(involved) = opposing(&left_nodes, &right_nodes) {
                out.push(
                    Contradiction::new(
                        ContradictionKind::MutuallyExclusiveTerms,
                        Severity::Medium,
                        ids(graph, &involved),
                        format!("nodes require both '{left}' and '{right}'"),
                    )
                    .with_strategies(
                        strategies_for(ContradictionKind::MutuallyExclusiveTerms)
                            .iter()
                            .copied(),
                    ),
                );
            }
        }

        out
    }
}
