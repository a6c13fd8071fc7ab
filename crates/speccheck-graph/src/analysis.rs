//! Orphans, derivation paths and the overall verdict

use crate::graph::DerivationGraph;
use petgraph::graph::{EdgeIndex, NodeIndex};
use speccheck_model::{Contradiction, DerivationPath, NodeId, NodeKind, Severity, VerificationStatus};
use std::collections::VecDeque;

/// Multi-source BFS from every principle; `true` where reachable
fn reachable_from_principles(graph: &DerivationGraph) -> Vec<bool> {
    let adjacency = graph.adjacency();
    let mut seen = vec![false; adjacency.len()];
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();

    for (idx, _) in graph.nodes_of(NodeKind::Principle) {
        seen[idx.index()] = true;
        queue.push_back(idx);
    }
    while let Some(node) = queue.pop_front() {
        for (next, _) in &adjacency[node.index()] {
            if !seen[next.index()] {
                seen[next.index()] = true;
                queue.push_back(*next);
            }
        }
    }
    seen
}

/// Nodes lacking a justified derivation
///
/// A non-principle with no incoming edge, or an implementation no principle
/// reaches. Principles are never orphans. Insertion order, no duplicates.
#[must_use]
pub fn find_orphans(graph: &DerivationGraph) -> Vec<NodeId> {
    let reachable = reachable_from_principles(graph);

    graph
        .nodes()
        .filter(|(idx, node)| match node.kind {
            NodeKind::Principle => false,
            NodeKind::Implementation => graph.in_degree(*idx) == 0 || !reachable[idx.index()],
            NodeKind::Requirement | NodeKind::Design => graph.in_degree(*idx) == 0,
        })
        .map(|(_, node)| node.id.clone())
        .collect()
}

/// One BFS per principle; a path (or its absence) for every implementation
#[must_use]
pub fn derivation_paths(graph: &DerivationGraph) -> Vec<DerivationPath> {
    let adjacency = graph.adjacency();
    let implementations: Vec<NodeIndex> = graph
        .nodes_of(NodeKind::Implementation)
        .map(|(idx, _)| idx)
        .collect();
    let mut paths = Vec::new();

    for (principle, principle_node) in graph.nodes_of(NodeKind::Principle) {
        let mut predecessor: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; adjacency.len()];
        let mut seen = vec![false; adjacency.len()];
        let mut queue = VecDeque::from([principle]);
        seen[principle.index()] = true;

        while let Some(node) = queue.pop_front() {
            for &(next, edge) in &adjacency[node.index()] {
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    predecessor[next.index()] = Some((node, edge));
                    queue.push_back(next);
                }
            }
        }

        for &target in &implementations {
            let Some(target_node) = graph.node_at(target) else {
                continue;
            };
            if !seen[target.index()] {
                paths.push(DerivationPath::not_found(
                    principle_node.id.clone(),
                    target_node.id.clone(),
                ));
                continue;
            }

            let mut nodes = vec![target];
            let mut edges = Vec::new();
            let mut cursor = target;
            while let Some((prev, edge)) = predecessor[cursor.index()] {
                nodes.push(prev);
                edges.push(edge);
                cursor = prev;
            }
            nodes.reverse();
            edges.reverse();

            paths.push(DerivationPath::found(
                principle_node.id.clone(),
                target_node.id.clone(),
                nodes
                    .iter()
                    .filter_map(|idx| graph.node_at(*idx).map(|n| n.id.clone()))
                    .collect(),
                edges
                    .iter()
                    .filter_map(|idx| graph.edge_at(*idx).cloned())
                    .collect(),
            ));
        }
    }

    paths
}

/// Overall verdict
///
/// Any critical contradiction fails the graph. Otherwise more than half of
/// the paths incomplete, any orphan or any contradiction asks for review.
#[must_use]
pub fn determine_status(
    contradictions: &[Contradiction],
    orphans: &[NodeId],
    paths: &[DerivationPath],
) -> VerificationStatus {
    if contradictions.iter().any(|c| c.severity == Severity::Critical) {
        return VerificationStatus::Failure;
    }

    let incomplete = paths.iter().filter(|p| !p.is_complete).count();
    let mostly_incomplete = !paths.is_empty() && incomplete * 2 > paths.len();

    if mostly_incomplete || !orphans.is_empty() || !contradictions.is_empty() {
        VerificationStatus::NeedsReview
    } else {
        VerificationStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speccheck_model::{ContradictionKind, DerivationKind, GraphEdge, GraphNode};

    fn chain() -> DerivationGraph {
        let mut g = DerivationGraph::new();
        g.add_node(GraphNode::new("p", NodeKind::Principle, "P")).unwrap();
        g.add_node(GraphNode::new("r", NodeKind::Requirement, "R")).unwrap();
        g.add_node(GraphNode::new("d", NodeKind::Design, "D")).unwrap();
        g.add_node(GraphNode::new("t", NodeKind::Implementation, "T")).unwrap();
        g.add_edge(GraphEdge::new("p", "r", DerivationKind::DerivesFrom, 1.0)).unwrap();
        g.add_edge(GraphEdge::new("r", "d", DerivationKind::Implements, 1.0)).unwrap();
        g.add_edge(GraphEdge::new("d", "t", DerivationKind::Implements, 1.0)).unwrap();
        g
    }

    #[test]
    fn full_chain_is_complete() {
        let g = chain();
        assert!(find_orphans(&g).is_empty());

        let paths = derivation_paths(&g);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].is_complete);
        assert_eq!(paths[0].path_nodes.len(), 4);
        assert_eq!(paths[0].path_edges.len(), 3);
        assert_eq!(
            determine_status(&[], &[], &paths),
            VerificationStatus::Success
        );
    }

    #[test]
    fn implementation_hanging_off_a_cycle_is_orphaned() {
        let mut g = chain();
        g.add_node(GraphNode::new("x", NodeKind::Design, "X")).unwrap();
        g.add_node(GraphNode::new("y", NodeKind::Design, "Y")).unwrap();
        g.add_node(GraphNode::new("t2", NodeKind::Implementation, "T2")).unwrap();
        g.add_edge(GraphEdge::new("x", "y", DerivationKind::Refines, 1.0)).unwrap();
        g.add_edge(GraphEdge::new("y", "x", DerivationKind::Refines, 1.0)).unwrap();
        g.add_edge(GraphEdge::new("y", "t2", DerivationKind::Implements, 1.0)).unwrap();

        // x and y have parents, t2 has a parent, but no principle reaches t2
        assert_eq!(find_orphans(&g), vec![NodeId::from("t2")]);
    }

    #[test]
    fn empty_path_list_is_not_mostly_incomplete() {
        assert_eq!(determine_status(&[], &[], &[]), VerificationStatus::Success);
    }

    #[test]
    fn critical_contradiction_fails() {
        let critical = Contradiction::new(
            ContradictionKind::SemanticNegation,
            Severity::Critical,
            vec![NodeId::from("r")],
            "hard conflict",
        );
        assert_eq!(
            determine_status(&[critical], &[], &[]),
            VerificationStatus::Failure
        );
    }

    #[test]
    fn half_incomplete_is_tolerated() {
        let complete = DerivationPath::found(
            NodeId::from("p"),
            NodeId::from("t"),
            vec!["p".into(), "r".into(), "t".into()],
            vec![],
        );
        let missing = DerivationPath::not_found(NodeId::from("q"), NodeId::from("t"));
        assert_eq!(
            determine_status(&[], &[], &[complete.clone(), missing.clone()]),
            VerificationStatus::Success
        );
        assert_eq!(
            determine_status(&[], &[], &[complete, missing.clone(), missing]),
            VerificationStatus::NeedsReview
        );
    }
}
