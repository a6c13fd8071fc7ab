//! Built-in demonstration inputs for `speccheck demo`

use crate::session::SessionReport;
use serde_json::json;
use speccheck_laws::{LawCheck, LawError, OperadSpec, Overlap, SheafData};
use speccheck_model::{Morphism, SpecData, SpecItem, ValueType};
use std::collections::BTreeMap;

fn string_op(name: &str) -> Morphism {
    Morphism::transform(name, name, ValueType::String, ValueType::String).with_id(name)
}

/// Position of the sheaf check in [`demo_checks`]; its locale conflict fails
pub const EXPECTED_FAILURE: usize = 4;

/// Every demo check completed and only the sheaf conflict failed
#[must_use]
pub fn went_as_expected(report: &SessionReport) -> bool {
    report.failures.is_empty()
        && report
            .entries
            .iter()
            .all(|e| e.result.success() != (e.index == EXPECTED_FAILURE))
        && report.entries.iter().any(|e| e.index == EXPECTED_FAILURE)
}

/// A small agent-design spec traced through every layer
#[must_use]
pub fn demo_spec() -> SpecData {
    SpecData {
        requirements: vec![
            SpecItem::new("req-compose", "Agents compose into pipelines")
                .with_section("requirements.md#composition"),
            SpecItem::new("req-consent", "Users give consent before data is shared")
                .with_section("requirements.md#privacy"),
        ],
        design_elements: vec![
            SpecItem::new("des-pipeline", "Pipeline router for agents").derives_from("req-compose"),
            SpecItem::new("des-consent", "Consent gate before sharing data")
                .derives_from("req-consent"),
        ],
        implementation_tasks: vec![
            SpecItem::new("task-router", "Implement pipeline router").derives_from("des-pipeline"),
            SpecItem::new("task-gate", "Implement consent gate").derives_from("des-consent"),
        ],
        ..SpecData::default()
    }
}

/// One check per law; the sheaf check is built to fail
///
/// # Errors
/// Never for the fixed inputs here; propagated from the law constructors.
pub fn demo_checks() -> Result<Vec<LawCheck>, LawError> {
    let wrap = Morphism::transform("wrap", "wrap_list", ValueType::Any, ValueType::List);

    let operad = OperadSpec::new(vec![string_op("trim"), string_op("lowercase"), string_op("reverse")])?
        .with_unit(Morphism::identity(ValueType::String))
        .symmetric();

    let profile: BTreeMap<String, serde_json::Value> =
        [("user".to_string(), json!("ada")), ("locale".to_string(), json!("en"))].into();
    let session: BTreeMap<String, serde_json::Value> =
        [("user".to_string(), json!("ada")), ("locale".to_string(), json!("fr"))].into();
    let sheaf = SheafData::new(BTreeMap::new())
        .with_section("profile", profile)
        .with_section("session", session)
        .with_overlap(Overlap::new("profile", "session", &["user", "locale"]))?;

    Ok(vec![
        LawCheck::CompositionAssociativity {
            f: string_op("uppercase"),
            g: string_op("reverse"),
            h: string_op("trim"),
        },
        LawCheck::IdentityLaws {
            f: string_op("trim"),
            id: None,
        },
        LawCheck::FunctorLaws {
            functor: wrap,
            f: string_op("uppercase"),
            g: string_op("reverse"),
        },
        LawCheck::OperadCoherence(operad),
        LawCheck::SheafGluing(sheaf),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use speccheck_laws::CategoricalChecker;
    use speccheck_model::{CounterExample, Law, TestInput, VerificationResult};

    fn passed(index: usize) -> SessionReport {
        SessionReport::single(
            index,
            VerificationResult::passed(Law::IdentityLaws, vec![TestInput::new(json!("x"))]),
        )
    }

    fn failed(index: usize) -> SessionReport {
        let ce = CounterExample::new(TestInput::new(json!("en")), json!("en"), json!("fr"), vec![]);
        SessionReport::single(index, VerificationResult::failed(Law::SheafGluing, ce, vec![]))
    }

    #[test]
    fn only_the_sheaf_check_fails() {
        let checker = CategoricalChecker::default();
        let verdicts: Vec<bool> = demo_checks()
            .unwrap()
            .iter()
            .map(|c| checker.run_check(c).success())
            .collect();
        assert_eq!(verdicts, vec![true, true, true, true, false]);
    }

    #[test]
    fn demo_spec_has_no_orphans() {
        let result = speccheck_graph::GraphEngine::default().build(&demo_spec());
        assert!(result.orphaned_nodes.is_empty());
    }

    #[test]
    fn expectation_requires_exactly_the_sheaf_failure() {
        let designed = (0..EXPECTED_FAILURE)
            .map(passed)
            .fold(failed(EXPECTED_FAILURE), SessionReport::merge);
        assert!(went_as_expected(&designed));

        let all_pass = (0..=EXPECTED_FAILURE)
            .map(passed)
            .fold(SessionReport::empty(), SessionReport::merge);
        assert!(!went_as_expected(&all_pass));

        let extra_failure = designed.clone().merge(failed(0));
        assert!(!went_as_expected(&extra_failure));

        let lost = designed.merge(SessionReport::lost(5, "aborted"));
        assert!(!went_as_expected(&lost));
    }
}
