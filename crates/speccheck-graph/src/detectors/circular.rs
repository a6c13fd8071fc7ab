use super::{ids, ContradictionDetector};
use crate::graph::DerivationGraph;
use crate::resolution::strategies_for;
use petgraph::graph::NodeIndex;
use speccheck_model::{Contradiction, ContradictionKind, Severity};
use std::collections::HashSet;

/// Enumeration stops after this many cycles
const MAX_CYCLES: usize = 4_096;

/// Cycles in the derivation relation
///
/// Nodes are first grouped into strongly connected components. Inside each
/// component every elementary cycle is enumerated from its smallest node with
/// an explicit stack, visiting only larger nodes of the same component, so
/// cycles that share nodes are each reported once.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularDependencyDetector;

impl CircularDependencyDetector {
    /// Elementary node cycles, each rotated to start at its smallest index
    #[must_use]
    pub fn find_cycles(graph: &DerivationGraph) -> Vec<Vec<NodeIndex>> {
        let adjacency = graph.adjacency();
        let mut component = vec![usize::MAX; adjacency.len()];
        let mut components = graph.strongly_connected_components();
        for (c, members) in components.iter_mut().enumerate() {
            members.sort_unstable();
            for n in members.iter() {
                component[n.index()] = c;
            }
        }
        components.sort_by_key(|members| members.first().copied());

        let mut on_path = vec![false; adjacency.len()];
        let mut seen: HashSet<Vec<NodeIndex>> = HashSet::new();
        let mut cycles = Vec::new();

        for members in &components {
            for &start in members {
                let c = component[start.index()];

                // (node, next successor position)
                let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];
                on_path[start.index()] = true;

                while let Some(top) = stack.last_mut() {
                    let node = top.0;
                    let Some(&(next, _)) = adjacency[node.index()].get(top.1) else {
                        on_path[node.index()] = false;
                        stack.pop();
                        continue;
                    };
                    top.1 += 1;

                    if next == start {
                        let cycle = canonical(stack.iter().map(|(n, _)| *n).collect());
                        if seen.insert(cycle.clone()) {
                            cycles.push(cycle);
                            if cycles.len() >= MAX_CYCLES {
                                tracing::warn!("cycle enumeration stopped at {} cycles", MAX_CYCLES);
                                return cycles;
                            }
                        }
                    } else if next > start
                        && component[next.index()] == c
                        && !on_path[next.index()]
                    {
                        on_path[next.index()] = true;
                        stack.push((next, 0));
                    }
                }
            }
        }

        cycles
    }
}

fn canonical(mut cycle: Vec<NodeIndex>) -> Vec<NodeIndex> {
    if let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, n)| **n)
        .map(|(i, _)| i)
    {
        cycle.rotate_left(min_pos);
    }
    cycle
}

impl ContradictionDetector for CircularDependencyDetector {
    fn name(&self) -> &str {
        "circular_dependency"
    }

    fn detect(&self, graph: &DerivationGraph) -> Vec<Contradiction> {
        Self::find_cycles(graph)
            .into_iter()
            .map(|cycle| {
                let node_ids = ids(graph, &cycle);
                let mut chain: Vec<&str> = node_ids.iter().map(|id| id.as_str()).collect();
                if let Some(first) = chain.first().copied() {
                    chain.push(first);
                }
                Contradiction::new(
                    ContradictionKind::CircularDependency,
                    Severity::High,
                    node_ids.clone(),
                    format!("circular derivation: {}", chain.join(" -> ")),
                )
                .with_strategies(strategies_for(ContradictionKind::CircularDependency).iter().copied())
            })
            .collect()
    }
}
