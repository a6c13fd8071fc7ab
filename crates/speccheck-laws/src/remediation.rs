//! Remediation advice from counter-examples
//!
//! Counter-examples are bucketed into patterns (input type, morphism kind,
//! execution errors, type mismatches, divergent outputs). The dominant
//! pattern's advice comes first, law-specific advice follows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use speccheck_model::{CounterExample, Law, ValueType};
use std::collections::BTreeMap;

/// Pattern counts and ordered strategies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationReport {
    /// Advice, most relevant first, without duplicates
    pub strategies: Vec<String>,
    /// How often each pattern occurred
    pub patterns: BTreeMap<String, usize>,
}

impl RemediationReport {
    /// The leading strategy
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.strategies.first().map(String::as_str)
    }
}

const EXECUTION_ERROR: &str = "execution_error";
const TYPE_MISMATCH: &str = "type_mismatch";
const DIVERGENT_OUTPUTS: &str = "divergent_outputs";

fn is_outcome(pattern: &str) -> bool {
    matches!(pattern, EXECUTION_ERROR | TYPE_MISMATCH | DIVERGENT_OUTPUTS)
}

fn is_error_document(v: &Value) -> bool {
    v.as_object().is_some_and(|m| m.contains_key("error"))
}

fn patterns_of(example: &CounterExample) -> Vec<String> {
    let mut found = vec![format!("input_type:{}", example.test_input.value_type)];
    for m in &example.morphisms {
        let kind = format!("morphism_kind:{}", m.implementation.kind_label());
        if !found.contains(&kind) {
            found.push(kind);
        }
    }

    let (expected, actual) = (&example.expected_result, &example.actual_result);
    if is_error_document(expected) || is_error_document(actual) {
        found.push(EXECUTION_ERROR.to_string());
    } else if ValueType::of(expected) != ValueType::of(actual) {
        found.push(TYPE_MISMATCH.to_string());
    } else {
        found.push(DIVERGENT_OUTPUTS.to_string());
    }
    found
}

fn pattern_advice(pattern: &str) -> Option<String> {
    let advice = match pattern {
        DIVERGENT_OUTPUTS => {
            "ensure morphisms are pure functions: identical inputs must give identical outputs"
                .to_string()
        }
        EXECUTION_ERROR => {
            "make every morphism total over its declared source type or narrow the source type"
                .to_string()
        }
        TYPE_MISMATCH => {
            "align declared source and target types so compositions never coerce values"
                .to_string()
        }
        p => {
            if let Some(ty) = p.strip_prefix("input_type:") {
                format!("add explicit handling for {ty} inputs in every composed morphism")
            } else if let Some(kind) = p.strip_prefix("morphism_kind:") {
                format!("review {kind} morphisms for hidden state or partiality")
            } else {
                return None;
            }
        }
    };
    Some(advice)
}

fn law_advice(law: Law) -> &'static [&'static str] {
    match law {
        Law::CompositionAssociativity => &[
            "remove dependence on evaluation order or call count",
            "keep composition free of shared mutable state",
        ],
        Law::IdentityLaws => &[
            "make the identity morphism return its input unchanged",
            "check that f neither inspects nor alters values it should pass through",
        ],
        Law::FunctorLaws => &[
            "make the functor's structural map preserve identity and composition",
            "apply inner morphisms structurally without inspecting container shape",
        ],
        Law::OperadCoherence => &[
            "make n-ary composition independent of bracketing",
            "verify the unit operation is neutral on both sides",
        ],
        Law::SheafGluing => &[
            "reconcile conflicting values on overlapping keys",
            "derive overlapping sections from a single source of truth",
        ],
    }
}

/// Rank remediation strategies for `law` from observed counter-examples
#[must_use]
pub fn suggest_remediation_strategies(examples: &[CounterExample], law: Law) -> RemediationReport {
    let mut patterns: BTreeMap<String, usize> = BTreeMap::new();
    // first-seen order breaks ties
    let mut order: Vec<String> = Vec::new();
    for example in examples {
        for pattern in patterns_of(example) {
            let count = patterns.entry(pattern.clone()).or_insert(0);
            if *count == 0 {
                order.push(pattern);
            }
            *count += 1;
        }
    }

    // outcome patterns win ties against input types and morphism kinds
    order.sort_by_key(|p| !is_outcome(p));

    let mut strategies: Vec<String> = Vec::new();
    let mut push = |s: String| {
        if !strategies.contains(&s) {
            strategies.push(s);
        }
    };

    let dominant = order
        .iter()
        .fold(None::<(&String, usize)>, |best, p| {
            let count = patterns.get(p).copied().unwrap_or(0);
            match best {
                Some((_, c)) if c >= count => best,
                _ => Some((p, count)),
            }
        })
        .map(|(p, _)| p.clone());

    if let Some(advice) = dominant.as_deref().and_then(pattern_advice) {
        push(advice);
    }
    // outcome categories before per-type/kind hints
    for pattern in [DIVERGENT_OUTPUTS, EXECUTION_ERROR, TYPE_MISMATCH] {
        if patterns.contains_key(pattern) {
            if let Some(advice) = pattern_advice(pattern) {
                push(advice);
            }
        }
    }
    for advice in law_advice(law) {
        push((*advice).to_string());
    }

    RemediationReport {
        strategies,
        patterns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use speccheck_model::{Morphism, TestInput};

    fn example(expected: Value, actual: Value) -> CounterExample {
        let m = Morphism::transform("tick", "tick", ValueType::String, ValueType::String);
        CounterExample::new(TestInput::new(json!("hello")), expected, actual, vec![m])
    }

    #[test]
    fn divergent_outputs_lead_for_stateful_morphisms() {
        let examples = vec![example(json!("HELLO#0"), json!("HELLO#1"))];
        let report = suggest_remediation_strategies(&examples, Law::CompositionAssociativity);
        assert_eq!(
            report.primary(),
            Some("ensure morphisms are pure functions: identical inputs must give identical outputs")
        );
        assert_eq!(report.patterns.get(DIVERGENT_OUTPUTS), Some(&1));
        assert_eq!(report.patterns.get("morphism_kind:transform"), Some(&1));
    }

    #[test]
    fn classifies_errors_and_mismatches() {
        let examples = vec![
            example(json!(1), json!({"error": "boom"})),
            example(json!(1), json!("1")),
            example(json!({"error": "x"}), json!(2)),
        ];
        let report = suggest_remediation_strategies(&examples, Law::IdentityLaws);
        assert_eq!(report.patterns.get(EXECUTION_ERROR), Some(&2));
        assert_eq!(report.patterns.get(TYPE_MISMATCH), Some(&1));
        assert_eq!(report.patterns.get(DIVERGENT_OUTPUTS), None);
        assert!(report
            .strategies
            .contains(&"make the identity morphism return its input unchanged".to_string()));
    }

    #[test]
    fn strategies_are_unique() {
        let examples: Vec<_> = (0..5).map(|i| example(json!(i), json!(i + 1))).collect();
        let report = suggest_remediation_strategies(&examples, Law::FunctorLaws);
        let mut deduped = report.strategies.clone();
        deduped.dedup();
        assert_eq!(report.strategies, deduped);
        assert_eq!(report.patterns.get(DIVERGENT_OUTPUTS), Some(&5));
    }

    #[test]
    fn no_examples_still_gives_law_advice() {
        let report = suggest_remediation_strategies(&[], Law::SheafGluing);
        assert!(report.patterns.is_empty());
        assert_eq!(
            report.primary(),
            Some("reconcile conflicting values on overlapping keys")
        );
    }
}
