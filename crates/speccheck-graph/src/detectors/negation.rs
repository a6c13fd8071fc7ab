use super::{ids, node_tokens, opposing, ContradictionDetector};
use crate::graph::DerivationGraph;
use crate::resolution::strategies_for;
use crate::text::{contains_affirmative, contains_phrase};
use petgraph::graph::NodeIndex;
use speccheck_model::{Contradiction, ContradictionKind, Severity};

/// One node asserts an obligation another node negates
///
/// An occurrence of the affirmative phrase counts only where it is not the
/// start of the negated phrase, so "must not" is never read as "must".
#[derive(Debug, Clone)]
pub struct SemanticNegationDetector {
    pairs: Vec<(String, String)>,
}

impl SemanticNegationDetector {
    /// Detector over (affirmative, negated) phrase pairs
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl ContradictionDetector for SemanticNegationDetector {
    fn name(&self) -> &str {
        "semantic_negation"
    }

    fn detect(&self, graph: &DerivationGraph) -> Vec<Contradiction> {
        let tokens = node_tokens(graph);
        let mut out = Vec::new();

        for (affirmative, negated) in &self.pairs {
            let positive: Vec<NodeIndex> = tokens
                .iter()
                .filter(|(_, t)| contains_affirmative(t, affirmative, negated))
                .map(|(idx, _)| *idx)
                .collect();
            let negative: Vec<NodeIndex> = tokens
                .iter()
                .filter(|(_, t)| contains_phrase(t, negated))
                .map(|(idx, _)| *idx)
                .collect();

            if let Some(involved) = opposing(&positive, &negative) {
                out.push(
                    Contradiction::new(
                        ContradictionKind::SemanticNegation,
                        Severity::Medium,
                        ids(graph, &involved),
                        format!("'{affirmative}' in one node is contradicted by '{negated}' in another"),
                    )
                    .with_strategies(
                        strategies_for(ContradictionKind::SemanticNegation)
                            .iter()
                            .copied(),
                    ),
                );
            }
        }

        out
    }
}
