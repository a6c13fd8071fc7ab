//! Derivation graph construction from adapter input

use crate::config::GraphConfig;
use crate::graph::DerivationGraph;
use crate::text::{significant_tokens, tokenize};
use speccheck_model::{
    DerivationKind, GraphEdge, GraphNode, NodeId, NodeKind, SpecData, SpecItem, SOURCE_KEY,
};
use std::collections::{BTreeSet, HashSet};

/// A node that was added, with what the linker needs to know about it
struct Placed<'a> {
    id: NodeId,
    item: &'a SpecItem,
    tokens: BTreeSet<String>,
}

/// Builds a [`DerivationGraph`] from [`SpecData`]
///
/// Construction never fails: duplicate ids are skipped with a warning and
/// unresolvable parents are ignored, leaving the node orphaned.
#[derive(Debug, Clone)]
pub struct GraphBuilder<'c> {
    config: &'c GraphConfig,
}

impl<'c> GraphBuilder<'c> {
    /// Builder over a configuration
    #[must_use]
    pub fn new(config: &'c GraphConfig) -> Self {
        Self { config }
    }

    /// Assemble the graph
    #[must_use]
    pub fn build(&self, data: &SpecData) -> DerivationGraph {
        let mut graph = DerivationGraph::new();

        let mut principle_keywords: Vec<(NodeId, HashSet<String>)> = Vec::new();
        for seed in &self.config.principles {
            if graph.add_node(seed.to_node()).is_ok() {
                principle_keywords.push((
                    NodeId::new(seed.id.as_str()),
                    seed.keywords.iter().map(|k| k.to_lowercase()).collect(),
                ));
            } else {
                tracing::warn!("duplicate seeded principle {} skipped", seed.id);
            }
        }

        let principles = place(&mut graph, NodeKind::Principle, "principles", &data.principles);
        for placed in &principles {
            principle_keywords.push((
                placed.id.clone(),
                significant_tokens(&placed.item.name).into_iter().collect(),
            ));
        }
        let requirements = place(&mut graph, NodeKind::Requirement, "requirements", &data.requirements);
        let designs = place(&mut graph, NodeKind::Design, "design_elements", &data.design_elements);
        let tasks = place(
            &mut graph,
            NodeKind::Implementation,
            "implementation_tasks",
            &data.implementation_tasks,
        );

        for placed in &principles {
            self.link_explicit(&mut graph, placed, NodeKind::Principle);
        }

        for req in &requirements {
            if self.link_explicit(&mut graph, req, NodeKind::Requirement) {
                continue;
            }
            let words: HashSet<String> = tokenize(&text_of(req.item)).into_iter().collect();
            for (principle, keywords) in &principle_keywords {
                if keywords.iter().any(|k| words.contains(k)) {
                    self.link(&mut graph, principle, req, DerivationKind::DerivesFrom);
                }
            }
        }

        for design in &designs {
            if !self.link_explicit(&mut graph, design, NodeKind::Design) {
                self.link_best_overlap(&mut graph, design, &requirements);
            }
        }

        for task in &tasks {
            if !self.link_explicit(&mut graph, task, NodeKind::Implementation) {
                self.link_best_overlap(&mut graph, task, &designs);
            }
        }

        tracing::debug!(
            "built derivation graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// Link explicit parents; true if at least one resolved
    fn link_explicit(&self, graph: &mut DerivationGraph, child: &Placed<'_>, kind: NodeKind) -> bool {
        let mut linked = false;
        for parent in &child.item.derives_from {
            let parent_id = NodeId::new(parent.as_str());
            let Some(parent_kind) = graph.node(&parent_id).map(|n| n.kind) else {
                tracing::warn!("{} derives from unknown node {}", child.id, parent);
                continue;
            };
            let derivation = if parent_kind == NodeKind::Principle {
                DerivationKind::DerivesFrom
            } else if parent_kind == kind {
                DerivationKind::Refines
            } else {
                DerivationKind::Implements
            };
            self.link(graph, &parent_id, child, derivation);
            linked = true;
        }
        linked
    }

    fn link_best_overlap(&self, graph: &mut DerivationGraph, child: &Placed<'_>, parents: &[Placed<'_>]) {
        let scores: Vec<usize> = parents
            .iter()
            .map(|p| p.tokens.intersection(&child.tokens).count())
            .collect();
        let best = scores.iter().copied().max().unwrap_or(0);
        if best == 0 {
            return;
        }
        for (parent, score) in parents.iter().zip(scores) {
            if score == best {
                self.link(graph, &parent.id, child, DerivationKind::Implements);
            }
        }
    }

    fn link(&self, graph: &mut DerivationGraph, parent: &NodeId, child: &Placed<'_>, kind: DerivationKind) {
        let confidence = child.item.confidence.unwrap_or(self.config.default_confidence);
        let edge = GraphEdge::new(parent.clone(), child.id.clone(), kind, confidence);
        if let Err(e) = graph.add_edge(edge) {
            tracing::warn!("edge {} -> {} skipped: {}", parent, child.id, e);
        }
    }
}

fn text_of(item: &SpecItem) -> String {
    format!("{} {}", item.name, item.description)
}

fn place<'a>(
    graph: &mut DerivationGraph,
    kind: NodeKind,
    field: &str,
    items: &'a [SpecItem],
) -> Vec<Placed<'a>> {
    let mut placed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let id = if item.id.trim().is_empty() {
            NodeId::new(format!("{}:{index}", kind.as_str()))
        } else {
            NodeId::new(item.id.as_str())
        };
        let source = item
            .section
            .clone()
            .unwrap_or_else(|| format!("{field}[{index}]"));
        let node = GraphNode::new(id.clone(), kind, item.name.as_str())
            .with_description(item.description.as_str())
            .with_metadata(SOURCE_KEY, source);

        match graph.add_node(node) {
            Ok(_) => placed.push(Placed {
                id,
                item,
                tokens: significant_tokens(&text_of(item)),
            }),
            Err(e) => tracing::warn!("{} skipped: {}", field, e),
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parents_of(graph: &DerivationGraph, id: &str) -> Vec<String> {
        graph
            .edges()
            .filter(|e| e.target_id.as_str() == id)
            .map(|e| e.source_id.to_string())
            .collect()
    }

    #[test]
    fn seeds_seven_principles() {
        let config = GraphConfig::default();
        let graph = GraphBuilder::new(&config).build(&SpecData::new());
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn requirement_links_by_keyword() {
        let config = GraphConfig::default();
        let data = SpecData {
            requirements: vec![SpecItem::new("r1", "Agents compose into pipelines")
                .with_description("Every agent is a morphism")],
            ..SpecData::default()
        };
        let graph = GraphBuilder::new(&config).build(&data);
        assert_eq!(parents_of(&graph, "r1"), vec!["principle:composable".to_string()]);
    }

    #[test]
    fn explicit_parent_wins_and_picks_kind() {
        let config = GraphConfig::default();
        let data = SpecData {
            requirements: vec![
                SpecItem::new("r1", "Composition").derives_from("principle:ethical"),
                SpecItem::new("r2", "Refined composition").derives_from("r1"),
            ],
            design_elements: vec![SpecItem::new("d1", "Router").derives_from("r2")],
            ..SpecData::default()
        };
        let graph = GraphBuilder::new(&config).build(&data);

        assert_eq!(parents_of(&graph, "r1"), vec!["principle:ethical".to_string()]);
        let kinds: Vec<DerivationKind> = graph.edges().map(|e| e.derivation_kind).collect();
        assert_eq!(
            kinds,
            vec![
                DerivationKind::DerivesFrom,
                DerivationKind::Refines,
                DerivationKind::Implements
            ]
        );
    }

    #[test]
    fn design_and_task_follow_best_overlap() {
        let config = GraphConfig::default();
        let data = SpecData {
            requirements: vec![
                SpecItem::new("r1", "Privacy consent ledger"),
                SpecItem::new("r2", "Playful greeting personality"),
            ],
            design_elements: vec![SpecItem::new("d1", "Consent ledger store")],
            implementation_tasks: vec![SpecItem::new("t1", "Write ledger store schema")],
            ..SpecData::default()
        };
        let graph = GraphBuilder::new(&config).build(&data);
        assert_eq!(parents_of(&graph, "d1"), vec!["r1".to_string()]);
        assert_eq!(parents_of(&graph, "t1"), vec!["d1".to_string()]);
    }

    #[test]
    fn generated_ids_and_sources() {
        let config = GraphConfig::default();
        let data = SpecData {
            implementation_tasks: vec![SpecItem::new("", "Unrelated chore")],
            ..SpecData::default()
        };
        let graph = GraphBuilder::new(&config).build(&data);
        let node = graph.node(&NodeId::from("implementation:0")).unwrap();
        assert_eq!(node.source(), Some("implementation_tasks[0]"));
        assert!(parents_of(&graph, "implementation:0").is_empty());
    }

    #[test]
    fn confidence_defaults_and_overrides() {
        let config = GraphConfig::default().with_default_confidence(0.6);
        let data = SpecData {
            requirements: vec![
                SpecItem::new("r1", "Privacy").derives_from("principle:ethical"),
                SpecItem::new("r2", "Safety")
                    .derives_from("principle:ethical")
                    .with_confidence(0.95),
            ],
            ..SpecData::default()
        };
        let graph = GraphBuilder::new(&config).build(&data);
        let confidences: Vec<f64> = graph.edges().map(|e| e.confidence).collect();
        assert_eq!(confidences, vec![0.6, 0.95]);
    }
}
