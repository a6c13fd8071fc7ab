//! Sheaf gluing: local sections that agree on overlaps glue to one global section

use super::{LawContext, LawOutcome, Violation};
use crate::equivalence::EquivalencePolicy;
use crate::error::LawError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use speccheck_model::{CounterExample, Law, TestInput};
use std::collections::BTreeMap;

/// A local section: key → value
pub type Section = BTreeMap<String, Value>;

/// Two sections that must agree on `keys`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlap {
    /// First section name
    pub left: String,
    /// Second section name
    pub right: String,
    /// Keys both sections must define identically
    pub keys: Vec<String>,
}

impl Overlap {
    /// Create an overlap
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>, keys: &[&str]) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            keys: keys.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

/// Two sections disagreeing on a key while gluing
#[derive(Debug, Clone, PartialEq)]
pub struct GluingConflict {
    /// Key in dispute
    pub key: String,
    /// Section that defined it first
    pub left_section: String,
    /// Section that disagreed
    pub right_section: String,
    /// First value
    pub left_value: Value,
    /// Disagreeing value
    pub right_value: Value,
}

/// Named local sections plus the overlaps they must agree on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSheafData")]
pub struct SheafData {
    sections: BTreeMap<String, Section>,
    overlaps: Vec<Overlap>,
}

#[derive(Deserialize)]
struct RawSheafData {
    #[serde(default)]
    sections: BTreeMap<String, Section>,
    #[serde(default)]
    overlaps: Vec<Overlap>,
}

impl TryFrom<RawSheafData> for SheafData {
    type Error = LawError;

    fn try_from(raw: RawSheafData) -> Result<Self, Self::Error> {
        raw.overlaps
            .into_iter()
            .try_fold(Self::new(raw.sections), Self::with_overlap)
    }
}

impl SheafData {
    /// Sections without overlaps
    #[must_use]
    pub fn new(sections: BTreeMap<String, Section>) -> Self {
        Self {
            sections,
            overlaps: Vec::new(),
        }
    }

    /// Add a section
    #[must_use]
    pub fn with_section(mut self, name: impl Into<String>, section: Section) -> Self {
        self.sections.insert(name.into(), section);
        self
    }

    /// Declare an overlap between existing sections
    ///
    /// # Errors
    /// `LawError::UnknownSection` if either side is missing.
    pub fn with_overlap(mut self, overlap: Overlap) -> Result<Self, LawError> {
        for name in [&overlap.left, &overlap.right] {
            if !self.sections.contains_key(name) {
                return Err(LawError::UnknownSection(name.clone()));
            }
        }
        self.overlaps.push(overlap);
        Ok(self)
    }

    /// Sections by name
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &BTreeMap<String, Section> {
        &self.sections
    }

    /// Declared overlaps
    #[inline]
    #[must_use]
    pub fn overlaps(&self) -> &[Overlap] {
        &self.overlaps
    }

    /// Merge every section into one global section
    ///
    /// Sections are visited in name order; the first definition of a key
    /// wins unless a later one disagrees, which is a conflict.
    ///
    /// # Errors
    /// The first conflicting key.
    pub fn glue(&self, policy: &EquivalencePolicy) -> Result<Section, GluingConflict> {
        let mut global: BTreeMap<String, (String, Value)> = BTreeMap::new();
        for (name, section) in &self.sections {
            for (key, value) in section {
                match global.get(key) {
                    Some((owner, existing)) if !policy.equivalent(existing, value) => {
                        return Err(GluingConflict {
                            key: key.clone(),
                            left_section: owner.clone(),
                            right_section: name.clone(),
                            left_value: existing.clone(),
                            right_value: value.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        global.insert(key.clone(), (name.clone(), value.clone()));
                    }
                }
            }
        }
        Ok(global.into_iter().map(|(k, (_, v))| (k, v)).collect())
    }
}

fn probe(key: &str, left: &str, right: &str) -> TestInput {
    TestInput::new(json!({ "key": key, "sections": [left, right] }))
}

/// Check pairwise agreement on overlaps, then gluing
#[must_use]
pub fn check(ctx: &LawContext<'_>, data: &SheafData) -> LawOutcome {
    let mut outcome = LawOutcome::new(Law::SheafGluing);

    for overlap in &data.overlaps {
        for key in &overlap.keys {
            let input = probe(key, &overlap.left, &overlap.right);
            outcome.tested.push(input.clone());

            let left = data.sections.get(&overlap.left).and_then(|s| s.get(key));
            let right = data.sections.get(&overlap.right).and_then(|s| s.get(key));
            let agree = matches!((left, right), (Some(l), Some(r)) if ctx.policy.equivalent(l, r));
            if !agree {
                let detail = match (left, right) {
                    (Some(_), Some(_)) => format!(
                        "sections '{}' and '{}' disagree on '{key}'",
                        overlap.left, overlap.right
                    ),
                    _ => format!(
                        "key '{key}' is missing from the overlap of '{}' and '{}'",
                        overlap.left, overlap.right
                    ),
                };
                tracing::debug!("sheaf_gluing violated: {}", detail);
                outcome.violation = Some(Violation {
                    counter_example: CounterExample::new(
                        input,
                        left.cloned().unwrap_or(Value::Null),
                        right.cloned().unwrap_or(Value::Null),
                        Vec::new(),
                    ),
                    detail,
                    execution_error: false,
                });
                return outcome;
            }
        }
    }

    if let Err(conflict) = data.glue(&ctx.policy) {
        let input = probe(&conflict.key, &conflict.left_section, &conflict.right_section);
        outcome.tested.push(input.clone());
        outcome.violation = Some(Violation {
            detail: format!(
                "sections '{}' and '{}' cannot glue: conflicting '{}'",
                conflict.left_section, conflict.right_section, conflict.key
            ),
            counter_example: CounterExample::new(
                input,
                conflict.left_value,
                conflict.right_value,
                Vec::new(),
            ),
            execution_error: false,
        });
    } else if outcome.tested.is_empty() {
        tracing::warn!("sheaf_gluing holds vacuously: no overlaps declared");
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::Executor;
    use crate::registry::TransformRegistry;
    use pretty_assertions::assert_eq;

    fn section(pairs: &[(&str, Value)]) -> Section {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn run(data: &SheafData) -> LawOutcome {
        let registry = TransformRegistry::new();
        let ctx = LawContext::new(Executor::new(&registry, 1), EquivalencePolicy::Strict);
        check(&ctx, data)
    }

    #[test]
    fn agreeing_sections_glue() {
        let data = SheafData::default()
            .with_section("a", section(&[("x", json!(1)), ("y", json!(2))]))
            .with_section("b", section(&[("y", json!(2)), ("z", json!(3))]))
            .with_overlap(Overlap::new("a", "b", &["y"]))
            .unwrap();

        assert!(run(&data).holds());
        let global = data.glue(&EquivalencePolicy::Strict).unwrap();
        assert_eq!(global.keys().map(String::as_str).collect::<Vec<_>>(), vec!["x", "y", "z"]);
    }

    #[test]
    fn overlap_disagreement_fails() {
        let data = SheafData::default()
            .with_section("a", section(&[("y", json!(2))]))
            .with_section("b", section(&[("y", json!(5))]))
            .with_overlap(Overlap::new("a", "b", &["y"]))
            .unwrap();

        let outcome = run(&data);
        let ce = outcome.violation.unwrap().counter_example;
        assert_eq!(ce.expected_result, json!(2));
        assert_eq!(ce.actual_result, json!(5));
        assert!(ce.morphisms.is_empty());
        assert_eq!(ce.test_input.value["key"], json!("y"));
    }

    #[test]
    fn missing_key_is_a_disagreement() {
        let data = SheafData::default()
            .with_section("a", section(&[("y", json!(2))]))
            .with_section("b", section(&[]))
            .with_overlap(Overlap::new("a", "b", &["y"]))
            .unwrap();
        let violation = run(&data).violation.unwrap();
        assert!(violation.detail.contains("missing"));
        assert_eq!(violation.counter_example.actual_result, Value::Null);
    }

    #[test]
    fn undeclared_conflict_fails_gluing() {
        let data = SheafData::default()
            .with_section("a", section(&[("k", json!("one"))]))
            .with_section("b", section(&[("k", json!("two"))]));
        let outcome = run(&data);
        assert!(outcome.violation.unwrap().detail.contains("cannot glue"));
    }

    #[test]
    fn overlap_on_unknown_section_rejected() {
        let err = SheafData::default()
            .with_section("a", section(&[]))
            .with_overlap(Overlap::new("a", "ghost", &["k"]))
            .unwrap_err();
        assert_eq!(err, LawError::UnknownSection("ghost".to_string()));
    }
}
