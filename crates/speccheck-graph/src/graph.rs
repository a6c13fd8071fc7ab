//! Arena-style derivation graph
//!
//! Nodes live in a [`petgraph`] `DiGraph` and are addressed by `NodeIndex`;
//! string ids resolve through a side map. The graph is append-only: once
//! handed to detectors it is only ever read.

use crate::error::GraphError;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use sha2::{Digest, Sha256};
use speccheck_model::{GraphEdge, GraphNode, NodeId, NodeKind};
use std::collections::HashMap;

/// Directed derivation graph, edges parent → child
#[derive(Debug, Clone, Default)]
pub struct DerivationGraph {
    inner: DiGraph<GraphNode, GraphEdge>,
    index: HashMap<NodeId, NodeIndex>,
}

impl DerivationGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node
    ///
    /// # Errors
    /// `GraphError::DuplicateNode` if the id is taken.
    pub fn add_node(&mut self, node: GraphNode) -> Result<NodeIndex, GraphError> {
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id.to_string()));
        }
        let id = node.id.clone();
        let idx = self.inner.add_node(node);
        self.index.insert(id, idx);
        Ok(idx)
    }

    /// Add an edge between existing nodes
    ///
    /// # Errors
    /// `GraphError::UnknownNode` if either endpoint is missing.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<EdgeIndex, GraphError> {
        let from = self.require(&edge.source_id)?;
        let to = self.require(&edge.target_id)?;
        Ok(self.inner.add_edge(from, to, edge))
    }

    fn require(&self, id: &NodeId) -> Result<NodeIndex, GraphError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    /// Whether a node with this id exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Index for a node id
    #[inline]
    #[must_use]
    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Node by id
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.index_of(id).and_then(|idx| self.inner.node_weight(idx))
    }

    /// Node by index
    #[inline]
    #[must_use]
    pub fn node_at(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.inner.node_weight(idx)
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode)> + '_ {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx).map(|n| (idx, n)))
    }

    /// Nodes of one kind, in insertion order
    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = (NodeIndex, &GraphNode)> + '_ {
        self.nodes().filter(move |(_, n)| n.kind == kind)
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.inner.edge_references().map(|e| e.weight())
    }

    /// Successor lists built in edge insertion order
    ///
    /// petgraph hands out neighbors most-recent first; traversals that must be
    /// reproducible use this instead.
    #[must_use]
    pub fn adjacency(&self) -> Vec<Vec<(NodeIndex, EdgeIndex)>> {
        let mut adj = vec![Vec::new(); self.inner.node_count()];
        for edge in self.inner.edge_references() {
            adj[edge.source().index()].push((edge.target(), edge.id()));
        }
        adj
    }

    /// Strongly connected components (Tarjan)
    #[must_use]
    pub fn strongly_connected_components(&self) -> Vec<Vec<NodeIndex>> {
        petgraph::algo::tarjan_scc(&self.inner)
    }

    /// Edge weight by index
    #[inline]
    #[must_use]
    pub fn edge_at(&self, idx: EdgeIndex) -> Option<&GraphEdge> {
        self.inner.edge_weight(idx)
    }

    /// Number of incoming edges
    #[must_use]
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.inner.edges_directed(idx, Direction::Incoming).count()
    }

    /// SHA-256 over sorted nodes and edges, hex encoded
    ///
    /// Independent of insertion order: identical content yields identical ids.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();

        let mut nodes: Vec<&GraphNode> = self.inner.node_weights().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        for node in nodes {
            hasher.update(node.id.as_str().as_bytes());
            hasher.update([0]);
            hasher.update(node.kind.as_str().as_bytes());
            hasher.update([0]);
            hasher.update(node.name.as_bytes());
            hasher.update([0]);
            hasher.update(node.description.as_bytes());
            hasher.update([0]);
        }

        let mut edges: Vec<(&str, &str, String, u64)> = self
            .edges()
            .map(|e| {
                (
                    e.source_id.as_str(),
                    e.target_id.as_str(),
                    format!("{:?}", e.derivation_kind),
                    e.confidence.to_bits(),
                )
            })
            .collect();
        edges.sort();
        for (from, to, kind, confidence) in edges {
            hasher.update(from.as_bytes());
            hasher.update([0]);
            hasher.update(to.as_bytes());
            hasher.update([0]);
            hasher.update(kind.as_bytes());
            hasher.update(confidence.to_le_bytes());
        }

        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speccheck_model::DerivationKind;

    fn node(id: &str, kind: NodeKind) -> GraphNode {
        GraphNode::new(id, kind, id)
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut g = DerivationGraph::new();
        g.add_node(node("a", NodeKind::Principle)).unwrap();
        let err = g.add_node(node("a", NodeKind::Requirement)).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNode("a".to_string()));
    }

    #[test]
    fn edge_to_missing_node_rejected() {
        let mut g = DerivationGraph::new();
        g.add_node(node("a", NodeKind::Principle)).unwrap();
        let err = g
            .add_edge(GraphEdge::new("a", "ghost", DerivationKind::DerivesFrom, 1.0))
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownNode("ghost".to_string()));
    }

    #[test]
    fn adjacency_follows_insertion_order() {
        let mut g = DerivationGraph::new();
        for id in ["p", "a", "b", "c"] {
            g.add_node(node(id, NodeKind::Requirement)).unwrap();
        }
        for target in ["b", "a", "c"] {
            g.add_edge(GraphEdge::new("p", target, DerivationKind::Refines, 1.0))
                .unwrap();
        }

        let p = g.index_of(&NodeId::from("p")).unwrap();
        let order: Vec<&str> = g.adjacency()[p.index()]
            .iter()
            .map(|(n, _)| g.node_at(*n).unwrap().id.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(g.in_degree(g.index_of(&NodeId::from("a")).unwrap()), 1);
    }

    #[test]
    fn content_hash_ignores_insertion_order() {
        let mut first = DerivationGraph::new();
        first.add_node(node("a", NodeKind::Principle)).unwrap();
        first.add_node(node("b", NodeKind::Requirement)).unwrap();
        first
            .add_edge(GraphEdge::new("a", "b", DerivationKind::DerivesFrom, 0.8))
            .unwrap();

        let mut second = DerivationGraph::new();
        second.add_node(node("b", NodeKind::Requirement)).unwrap();
        second.add_node(node("a", NodeKind::Principle)).unwrap();
        second
            .add_edge(GraphEdge::new("a", "b", DerivationKind::DerivesFrom, 0.8))
            .unwrap();

        assert_eq!(first.content_hash(), second.content_hash());
        assert_eq!(first.content_hash().len(), 64);

        second.add_node(node("c", NodeKind::Design)).unwrap();
        assert_ne!(first.content_hash(), second.content_hash());
    }
}
