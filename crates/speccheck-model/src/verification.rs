//! Law verification records
//!
//! [`VerificationResult`] can only be built through [`VerificationResult::passed`]
//! or [`VerificationResult::failed`], and deserialization re-checks the same
//! rule: a failing result always carries a [`CounterExample`], a passing one
//! never does.

use crate::error::ModelError;
use crate::morphism::{Morphism, ValueType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Algebraic law under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Law {
    /// `(f∘g)∘h == f∘(g∘h)`
    CompositionAssociativity,
    /// `f∘id == f == id∘f`
    IdentityLaws,
    /// `F(id) = id`, `F(g∘f) = F(g)∘F(f)`
    FunctorLaws,
    /// n-ary associativity, unit and equivariance
    OperadCoherence,
    /// Local sections glue to one global section
    SheafGluing,
}

impl Law {
    /// Every law, in a fixed order
    pub const ALL: [Law; 5] = [
        Law::CompositionAssociativity,
        Law::IdentityLaws,
        Law::FunctorLaws,
        Law::OperadCoherence,
        Law::SheafGluing,
    ];

    /// Stable snake_case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompositionAssociativity => "composition_associativity",
            Self::IdentityLaws => "identity_laws",
            Self::FunctorLaws => "functor_laws",
            Self::OperadCoherence => "operad_coherence",
            Self::SheafGluing => "sheaf_gluing",
        }
    }
}

impl fmt::Display for Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Law {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|law| law.as_str() == s)
            .ok_or_else(|| ModelError::UnknownLaw(s.to_string()))
    }
}

impl From<Law> for String {
    fn from(law: Law) -> Self {
        law.as_str().to_string()
    }
}

/// One concrete input fed through a law check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestInput {
    /// The value handed to the morphisms
    pub value: Value,
    /// Declared type of `value`
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

impl TestInput {
    /// Input whose type is inferred from the value
    #[must_use]
    pub fn new(value: Value) -> Self {
        let value_type = ValueType::of(&value);
        Self { value, value_type }
    }

    /// Input with an explicit declared type
    #[must_use]
    pub fn typed(value: Value, value_type: ValueType) -> Self {
        Self { value, value_type }
    }
}

/// Concrete evidence of a law violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterExample {
    /// Input that exposed the violation
    pub test_input: TestInput,
    /// Output of the reference side
    pub expected_result: Value,
    /// Output of the compared side
    pub actual_result: Value,
    /// Morphisms involved, in law argument order
    #[serde(default)]
    pub morphisms: Vec<Morphism>,
}

impl CounterExample {
    /// Create a counter-example
    #[must_use]
    pub fn new(
        test_input: TestInput,
        expected_result: Value,
        actual_result: Value,
        morphisms: Vec<Morphism>,
    ) -> Self {
        Self {
            test_input,
            expected_result,
            actual_result,
            morphisms,
        }
    }
}

/// Outcome of verifying one law
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVerificationResult")]
pub struct VerificationResult {
    law_name: String,
    success: bool,
    counter_example: Option<CounterExample>,
    analysis: Option<String>,
    suggested_fix: Option<String>,
    test_results: Vec<TestInput>,
}

impl VerificationResult {
    /// Every exercised input agreed
    #[must_use]
    pub fn passed(law_name: impl Into<String>, test_results: Vec<TestInput>) -> Self {
        Self {
            law_name: law_name.into(),
            success: true,
            counter_example: None,
            analysis: None,
            suggested_fix: None,
            test_results,
        }
    }

    /// A violation was observed
    #[must_use]
    pub fn failed(
        law_name: impl Into<String>,
        counter_example: CounterExample,
        test_results: Vec<TestInput>,
    ) -> Self {
        Self {
            law_name: law_name.into(),
            success: false,
            counter_example: Some(counter_example),
            analysis: None,
            suggested_fix: None,
            test_results,
        }
    }

    /// Attach explanatory text
    #[inline]
    #[must_use]
    pub fn with_analysis(mut self, analysis: impl Into<String>) -> Self {
        self.analysis = Some(analysis.into());
        self
    }

    /// Attach a remediation hint
    #[inline]
    #[must_use]
    pub fn with_suggested_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    /// Law name
    #[inline]
    #[must_use]
    pub fn law_name(&self) -> &str {
        &self.law_name
    }

    /// Verdict
    #[inline]
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    /// Evidence, present iff the law failed
    #[inline]
    #[must_use]
    pub fn counter_example(&self) -> Option<&CounterExample> {
        self.counter_example.as_ref()
    }

    /// Explanatory text
    #[inline]
    #[must_use]
    pub fn analysis(&self) -> Option<&str> {
        self.analysis.as_deref()
    }

    /// Remediation hint
    #[inline]
    #[must_use]
    pub fn suggested_fix(&self) -> Option<&str> {
        self.suggested_fix.as_deref()
    }

    /// Inputs that were exercised
    #[inline]
    #[must_use]
    pub fn test_results(&self) -> &[TestInput] {
        &self.test_results
    }

    /// Passed without exercising a single input
    #[inline]
    #[must_use]
    pub fn is_vacuous(&self) -> bool {
        self.success && self.test_results.is_empty()
    }
}

#[derive(Deserialize)]
struct RawVerificationResult {
    law_name: String,
    success: bool,
    #[serde(default)]
    counter_example: Option<CounterExample>,
    #[serde(default)]
    analysis: Option<String>,
    #[serde(default)]
    suggested_fix: Option<String>,
    #[serde(default)]
    test_results: Vec<TestInput>,
}

impl TryFrom<RawVerificationResult> for VerificationResult {
    type Error = ModelError;

    fn try_from(raw: RawVerificationResult) -> Result<Self, Self::Error> {
        if raw.success == raw.counter_example.is_some() {
            return Err(ModelError::InconsistentResult {
                law_name: raw.law_name,
                success: raw.success,
            });
        }

        Ok(Self {
            law_name: raw.law_name,
            success: raw.success,
            counter_example: raw.counter_example,
            analysis: raw.analysis,
            suggested_fix: raw.suggested_fix,
            test_results: raw.test_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_counter_example() -> CounterExample {
        CounterExample::new(
            TestInput::new(json!("hello")),
            json!("HELLO"),
            json!("OLLEH"),
            vec![],
        )
    }

    #[test]
    fn passed_has_no_counter_example() {
        let r = VerificationResult::passed(Law::IdentityLaws, vec![TestInput::new(json!(1))]);
        assert!(r.success());
        assert!(r.counter_example().is_none());
        assert!(!r.is_vacuous());
        assert_eq!(r.law_name(), "identity_laws");
    }

    #[test]
    fn vacuous_pass_detected() {
        let r = VerificationResult::passed(Law::CompositionAssociativity, vec![]);
        assert!(r.is_vacuous());
    }

    #[test]
    fn failed_roundtrips_through_json() {
        let r = VerificationResult::failed(
            Law::CompositionAssociativity,
            sample_counter_example(),
            vec![TestInput::new(json!("hello"))],
        )
        .with_analysis("divergent outputs");

        let doc = serde_json::to_value(&r).unwrap();
        assert_eq!(doc["success"], json!(false));
        assert_eq!(doc["test_results"][0], json!({"value": "hello", "type": "string"}));

        let back: VerificationResult = serde_json::from_value(doc).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn inconsistent_documents_rejected() {
        let failing_without_evidence = json!({
            "law_name": "identity_laws",
            "success": false,
            "test_results": []
        });
        assert!(serde_json::from_value::<VerificationResult>(failing_without_evidence).is_err());

        let passing_with_evidence = json!({
            "law_name": "identity_laws",
            "success": true,
            "counter_example": serde_json::to_value(sample_counter_example()).unwrap(),
        });
        assert!(serde_json::from_value::<VerificationResult>(passing_with_evidence).is_err());
    }

    #[test]
    fn law_names_parse_back() {
        for law in Law::ALL {
            assert_eq!(law.as_str().parse::<Law>().unwrap(), law);
        }
        assert!("commutativity".parse::<Law>().is_err());
    }
}
