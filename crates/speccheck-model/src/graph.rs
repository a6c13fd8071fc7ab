//! Derivation graph records
//!
//! Nodes, edges, contradictions and the aggregate
//! [`VerificationGraphResult`] produced by the graph engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key pointing back at the originating document section
pub const SOURCE_KEY: &str = "source";

/// Graph node identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create from any string-like value
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Layer of the derivation hierarchy a node belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Axiomatic root
    Principle,
    /// Requirement derived from principles
    Requirement,
    /// Design element realizing requirements
    Design,
    /// Implementation task realizing design
    Implementation,
}

impl NodeKind {
    /// Stable lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Principle => "principle",
            Self::Requirement => "requirement",
            Self::Design => "design",
            Self::Implementation => "implementation",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a child node follows from its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationKind {
    /// Principle → requirement
    DerivesFrom,
    /// Requirement → design, design → implementation
    Implements,
    /// Same-layer refinement
    Refines,
}

/// A node of the derivation graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Identity
    pub id: NodeId,
    /// Hierarchy layer
    pub kind: NodeKind,
    /// Short name
    pub name: String,
    /// Free text scanned by the detectors
    #[serde(default)]
    pub description: String,
    /// Adapter-supplied annotations (`source`, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl GraphNode {
    /// Create a node without description or metadata
    #[must_use]
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            description: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Set description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add one metadata entry
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Originating document section, if recorded
    #[inline]
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }

    /// Name and description joined, as scanned by text detectors
    #[must_use]
    pub fn text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}

/// A directed derivation edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Parent node
    pub source_id: NodeId,
    /// Child node
    pub target_id: NodeId,
    /// Edge semantics
    pub derivation_kind: DerivationKind,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

impl GraphEdge {
    /// Create an edge; confidence is clamped into `[0, 1]` (NaN becomes 0)
    #[must_use]
    pub fn new(
        source_id: impl Into<NodeId>,
        target_id: impl Into<NodeId>,
        derivation_kind: DerivationKind,
        confidence: f64,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            derivation_kind,
            confidence,
        }
    }
}

/// Severity of a detected contradiction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory
    Low,
    /// Should be reviewed
    Medium,
    /// Structural defect
    High,
    /// Blocks the derivation
    Critical,
}

/// Category of a contradiction, one per detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionKind {
    /// Directed cycle among derivations
    CircularDependency,
    /// Antonym pair used across nodes
    MutuallyExclusiveTerms,
    /// Several nodes competing for shared resources
    ResourceConflict,
    /// Modal verb used with both polarities
    SemanticNegation,
    /// Node derived from too many parents
    OverSpecification,
}

impl ContradictionKind {
    /// Stable snake_case name, used as a resolution category
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CircularDependency => "circular_dependency",
            Self::MutuallyExclusiveTerms => "mutually_exclusive_terms",
            Self::ResourceConflict => "resource_conflict",
            Self::SemanticNegation => "semantic_negation",
            Self::OverSpecification => "over_specification",
        }
    }
}

impl fmt::Display for ContradictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural or semantic defect found in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    /// Detector category
    pub kind: ContradictionKind,
    /// Involved nodes, all present in the analyzed graph
    pub node_ids: Vec<NodeId>,
    /// Human-readable description
    pub description: String,
    /// Suggested fixes
    #[serde(default)]
    pub resolution_strategies: Vec<String>,
    /// Severity
    pub severity: Severity,
}

impl Contradiction {
    /// Create a contradiction without strategies
    #[must_use]
    pub fn new(
        kind: ContradictionKind,
        severity: Severity,
        node_ids: Vec<NodeId>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            node_ids,
            description: description.into(),
            resolution_strategies: Vec::new(),
            severity,
        }
    }

    /// Attach resolution strategies
    #[must_use]
    pub fn with_strategies<I, S>(mut self, strategies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolution_strategies = strategies.into_iter().map(Into::into).collect();
        self
    }
}

/// Result of one principle → implementation path search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationPath {
    /// Start of the search
    pub principle_id: NodeId,
    /// Goal of the search
    pub implementation_id: NodeId,
    /// Nodes along the path, empty when no path exists
    pub path_nodes: Vec<NodeId>,
    /// Edges along the path
    pub path_edges: Vec<GraphEdge>,
    /// `path_nodes.len() > 2`
    pub is_complete: bool,
}

impl DerivationPath {
    /// Record a path found by the search
    #[must_use]
    pub fn found(
        principle_id: NodeId,
        implementation_id: NodeId,
        path_nodes: Vec<NodeId>,
        path_edges: Vec<GraphEdge>,
    ) -> Self {
        let is_complete = path_nodes.len() > 2;
        Self {
            principle_id,
            implementation_id,
            path_nodes,
            path_edges,
            is_complete,
        }
    }

    /// Record a failed search
    #[must_use]
    pub fn not_found(principle_id: NodeId, implementation_id: NodeId) -> Self {
        Self {
            principle_id,
            implementation_id,
            path_nodes: Vec::new(),
            path_edges: Vec::new(),
            is_complete: false,
        }
    }

    /// Whether the search reached the implementation at all
    #[inline]
    #[must_use]
    pub fn exists(&self) -> bool {
        !self.path_nodes.is_empty()
    }
}

/// Overall verdict for a derivation graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// No findings
    Success,
    /// Findings that need a human look
    NeedsReview,
    /// Critical findings
    Failure,
}

/// Everything the graph engine reports about one graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationGraphResult {
    /// Content hash of nodes and edges
    pub graph_id: String,
    /// Verdict
    pub status: VerificationStatus,
    /// All nodes, insertion order
    pub nodes: Vec<GraphNode>,
    /// All edges, insertion order
    pub edges: Vec<GraphEdge>,
    /// Detector findings
    pub contradictions: Vec<Contradiction>,
    /// Nodes without a justified derivation
    pub orphaned_nodes: Vec<NodeId>,
    /// One entry per (principle, implementation) pair
    pub derivation_paths: Vec<DerivationPath>,
    /// Category → advice
    #[serde(default)]
    pub resolution_strategies: BTreeMap<String, Vec<String>>,
}

impl VerificationGraphResult {
    /// Look up a node by id
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Number of derivation paths that are not complete
    #[must_use]
    pub fn incomplete_path_count(&self) -> usize {
        self.derivation_paths
            .iter()
            .filter(|p| !p.is_complete)
            .count()
    }

    /// Contradictions of one kind
    pub fn contradictions_of(
        &self,
        kind: ContradictionKind,
    ) -> impl Iterator<Item = &Contradiction> + '_ {
        self.contradictions.iter().filter(move |c| c.kind == kind)
    }
}
