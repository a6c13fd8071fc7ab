//! Input adapter contract
//!
//! Parsing markdown or other documents is an adapter's job; the graph engine
//! only ever sees already-separated [`SpecData`].

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// One parsed section item (requirement, design element, task, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecItem {
    /// Identifier; generated from kind and position when empty
    #[serde(default)]
    pub id: String,
    /// Short name
    pub name: String,
    /// Free text
    #[serde(default)]
    pub description: String,
    /// Originating document section
    #[serde(default)]
    pub section: Option<String>,
    /// Explicit parent ids
    #[serde(default)]
    pub derives_from: Vec<String>,
    /// Adapter-supplied edge confidence
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl SpecItem {
    /// Create an item with id and name
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set originating section
    #[inline]
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Add an explicit parent
    #[inline]
    #[must_use]
    pub fn derives_from(mut self, parent: impl Into<String>) -> Self {
        self.derives_from.push(parent.into());
        self
    }

    /// Set edge confidence
    #[inline]
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Parsed specification, one list per derivation layer
///
/// Absent lists default to empty. A list given as `null` is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecData {
    /// Principles beyond the seeded set
    #[serde(default)]
    pub principles: Vec<SpecItem>,
    /// Requirements
    #[serde(default)]
    pub requirements: Vec<SpecItem>,
    /// Design elements
    #[serde(default)]
    pub design_elements: Vec<SpecItem>,
    /// Implementation tasks
    #[serde(default)]
    pub implementation_tasks: Vec<SpecItem>,
}

impl SpecData {
    /// Empty input
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a JSON document
    ///
    /// # Errors
    /// `ModelError::InvalidSpecData` if the document violates the contract.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(|e| ModelError::InvalidSpecData(e.to_string()))
    }

    /// Total number of items across all layers
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.principles.len()
            + self.requirements.len()
            + self.design_elements.len()
            + self.implementation_tasks.len()
    }

    /// No items at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}
