use proptest::prelude::*;
use speccheck_graph::{CircularDependencyDetector, ContradictionDetector, DerivationGraph};
use speccheck_model::{ContradictionKind, DerivationKind, GraphEdge, GraphNode, NodeId, NodeKind};
use std::collections::HashSet;

fn node_id(i: usize) -> String {
    format!("n{i}")
}

fn graph_with(node_count: usize, edges: &[(usize, usize)]) -> DerivationGraph {
    let mut g = DerivationGraph::new();
    for i in 0..node_count {
        g.add_node(GraphNode::new(node_id(i), NodeKind::Design, node_id(i)))
            .unwrap();
    }
    for (a, b) in edges {
        g.add_edge(GraphEdge::new(node_id(*a), node_id(*b), DerivationKind::Refines, 1.0))
            .unwrap();
    }
    g
}

/// Edges that only ever point from a lower to a higher index
fn forward_edges(node_count: usize, raw: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    raw.into_iter()
        .map(|(a, b)| (a % node_count, b % node_count))
        .filter(|(a, b)| a < b)
        .collect()
}

fn rotations_equal(found: &[NodeId], planted: &[String]) -> bool {
    if found.len() != planted.len() {
        return false;
    }
    (0..planted.len()).any(|shift| {
        found
            .iter()
            .enumerate()
            .all(|(i, id)| id.as_str() == planted[(i + shift) % planted.len()])
    })
}

proptest! {
    #[test]
    fn prop_dags_report_no_cycles(
        node_count in 1..25usize,
        raw in proptest::collection::vec((0..25usize, 0..25usize), 0..80)
    ) {
        let edges = forward_edges(node_count, raw);
        let g = graph_with(node_count, &edges);
        prop_assert!(CircularDependencyDetector.detect(&g).is_empty());
    }

    #[test]
    fn prop_planted_cycle_reported_exactly(
        noise_count in 0..15usize,
        cycle_len in 1..6usize,
        raw in proptest::collection::vec((0..20usize, 0..20usize), 0..40),
        bridges in proptest::collection::vec((0..6usize, 0..15usize), 0..5)
    ) {
        // Noise nodes come first and stay acyclic; cycle nodes follow.
        let total = noise_count + cycle_len;
        let mut edges = if noise_count > 0 { forward_edges(noise_count, raw) } else { Vec::new() };

        let cycle: Vec<usize> = (noise_count..total).collect();
        for (i, from) in cycle.iter().enumerate() {
            edges.push((*from, cycle[(i + 1) % cycle_len]));
        }
        // Noise may feed into the cycle, never out of it back into itself.
        if noise_count > 0 {
            for (c, n) in bridges {
                edges.push((n % noise_count, cycle[c % cycle_len]));
            }
        }

        let g = graph_with(total, &edges);
        let found = CircularDependencyDetector.detect(&g);
        prop_assert_eq!(found.len(), 1);
        prop_assert_eq!(found[0].kind, ContradictionKind::CircularDependency);

        let planted: Vec<String> = cycle.iter().map(|i| node_id(*i)).collect();
        prop_assert!(rotations_equal(&found[0].node_ids, &planted));
    }

    #[test]
    fn prop_overlapping_cycles_all_reported(
        planted in proptest::collection::vec(
            proptest::sample::subsequence((0..7usize).collect::<Vec<_>>(), 1..=7).prop_shuffle(),
            1..4
        )
    ) {
        let mut edges = Vec::new();
        for cycle in &planted {
            for (i, from) in cycle.iter().enumerate() {
                edges.push((*from, cycle[(i + 1) % cycle.len()]));
            }
        }
        let g = graph_with(7, &edges);
        let found = CircularDependencyDetector.detect(&g);

        for cycle in &planted {
            let ids: Vec<String> = cycle.iter().map(|i| node_id(*i)).collect();
            prop_assert!(
                found.iter().any(|c| rotations_equal(&c.node_ids, &ids)),
                "cycle {:?} missing",
                ids
            );
        }

        // Every report is a real elementary cycle, and none repeats.
        for (k, c) in found.iter().enumerate() {
            let idx: Vec<usize> = c
                .node_ids
                .iter()
                .map(|id| id.as_str()[1..].parse().unwrap())
                .collect();
            let distinct: HashSet<&usize> = idx.iter().collect();
            prop_assert_eq!(distinct.len(), idx.len());
            for (i, from) in idx.iter().enumerate() {
                prop_assert!(edges.contains(&(*from, idx[(i + 1) % idx.len()])));
            }
            let names: Vec<String> = c.node_ids.iter().map(ToString::to_string).collect();
            prop_assert!(!found[..k].iter().any(|other| rotations_equal(&other.node_ids, &names)));
        }
    }
}
