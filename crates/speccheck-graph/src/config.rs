//! Graph engine configuration
//!
//! Seeded principles, detector vocabularies and thresholds. Defaults match
//! the seven agent-design principles and the stock term lists.

use serde::{Deserialize, Serialize};
use speccheck_model::{GraphNode, NodeKind, SOURCE_KEY};

/// One seeded axiomatic principle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipleSeed {
    /// Node id
    pub id: String,
    /// Display name
    pub name: String,
    /// Description (kept free of detector vocabulary)
    pub description: String,
    /// Tokens that link a requirement to this principle
    pub keywords: Vec<String>,
}

impl PrincipleSeed {
    /// Create a seed; the id is derived from the name
    #[must_use]
    pub fn new(name: &str, description: &str, keywords: &[&str]) -> Self {
        Self {
            id: format!("principle:{}", name.to_lowercase()),
            name: name.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// Graph node for this seed
    #[must_use]
    pub fn to_node(&self) -> GraphNode {
        GraphNode::new(self.id.as_str(), NodeKind::Principle, self.name.as_str())
            .with_description(self.description.as_str())
            .with_metadata(SOURCE_KEY, "principles:seed")
    }
}

/// Graph engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Principles seeded into every graph
    pub principles: Vec<PrincipleSeed>,
    /// Confidence for edges when the adapter supplies none
    pub default_confidence: f64,
    /// Antonym pairs for the mutually-exclusive-terms detector
    pub antonym_pairs: Vec<(String, String)>,
    /// Shared-resource vocabulary
    pub resource_keywords: Vec<String>,
    /// Resource mentions tolerated before an advisory is raised
    pub resource_node_threshold: usize,
    /// (affirmative, negated) modal phrase pairs
    pub negation_pairs: Vec<(String, String)>,
    /// Over-specification kicks in above `edges > ratio * nodes`
    pub over_specification_ratio: f64,
    /// In-degree above which a node is over-derived
    pub max_in_degree: usize,
}

impl GraphConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the seeded principles
    #[inline]
    #[must_use]
    pub fn with_principles(mut self, principles: Vec<PrincipleSeed>) -> Self {
        self.principles = principles;
        self
    }

    /// With default edge confidence
    #[inline]
    #[must_use]
    pub fn with_default_confidence(mut self, confidence: f64) -> Self {
        self.default_confidence = confidence;
        self
    }

    /// With over-specification thresholds
    #[inline]
    #[must_use]
    pub fn with_over_specification(mut self, ratio: f64, max_in_degree: usize) -> Self {
        self.over_specification_ratio = ratio;
        self.max_in_degree = max_in_degree;
        self
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            principles: default_principles(),
            default_confidence: 0.8,
            antonym_pairs: pairs(&[
                ("synchronous", "asynchronous"),
                ("mutable", "immutable"),
                ("centralized", "distributed"),
                ("stateful", "stateless"),
                ("blocking", "non-blocking"),
                ("strict", "lenient"),
            ]),
            resource_keywords: [
                "memory", "cpu", "storage", "bandwidth", "disk", "network", "gpu", "threads",
            ]
            .iter()
            .map(|k| (*k).to_string())
            .collect(),
            resource_node_threshold: 2,
            negation_pairs: pairs(&[
                ("must", "must not"),
                ("shall", "shall not"),
                ("should", "should not"),
                ("required", "optional"),
                ("always", "never"),
            ]),
            over_specification_ratio: 2.0,
            max_in_degree: 3,
        }
    }
}

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter()
        .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
        .collect()
}

/// The seven agent-design principles
#[must_use]
pub fn default_principles() -> Vec<PrincipleSeed> {
    vec![
        PrincipleSeed::new(
            "Tasteful",
            "Each agent serves a clear, justified purpose",
            &["tasteful", "taste", "purpose", "quality", "clarity"],
        ),
        PrincipleSeed::new(
            "Curated",
            "Intentional selection over exhaustive cataloging",
            &["curated", "curation", "selection", "selective", "minimal"],
        ),
        PrincipleSeed::new(
            "Ethical",
            "Agents augment human capability and respect privacy",
            &["ethical", "ethics", "privacy", "consent", "transparency", "safety", "trust"],
        ),
        PrincipleSeed::new(
            "Joy-Inducing",
            "Delight in interaction; personality encouraged",
            &["joy", "joy-inducing", "delight", "personality", "playful", "warmth"],
        ),
        PrincipleSeed::new(
            "Composable",
            "Agents are morphisms in a category; composition is primary",
            &[
                "composable", "compose", "composes", "composition", "morphism", "morphisms",
                "category", "pipeline",
            ],
        ),
        PrincipleSeed::new(
            "Heterarchical",
            "Agents exist in flux rather than fixed hierarchy",
            &["heterarchical", "heterarchy", "autonomy", "autonomous", "flux", "peer"],
        ),
        PrincipleSeed::new(
            "Generative",
            "Spec is compression; design generates implementation",
            &[
                "generative", "generate", "generates", "generation", "spec", "specification",
                "compression",
            ],
        ),
    ]
}
