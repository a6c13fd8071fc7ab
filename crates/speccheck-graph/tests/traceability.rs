use pretty_assertions::assert_eq;
use speccheck_graph::{GraphConfig, GraphEngine, PrincipleSeed};
use speccheck_model::{NodeId, SpecData, SpecItem, VerificationStatus};
use speccheck_test_utils::specs;

#[test]
fn unconnected_implementation_is_orphaned() {
    let config = GraphConfig::default().with_principles(vec![PrincipleSeed::new(
        "Composable",
        "Agents are morphisms in a category",
        &["compose", "morphism"],
    )]);
    let data = SpecData {
        implementation_tasks: vec![SpecItem::new("t1", "Rotate log archives")],
        ..SpecData::default()
    };

    let result = GraphEngine::new(config).build(&data);

    assert_eq!(result.orphaned_nodes, vec![NodeId::from("t1")]);
    assert_eq!(result.status, VerificationStatus::NeedsReview);
    assert_eq!(result.derivation_paths.len(), 1);
    assert!(!result.derivation_paths[0].exists());
    assert!(result.resolution_strategies.contains_key("orphaned_implementation"));
}

#[test]
fn mostly_failed_searches_need_review() {
    let result = GraphEngine::default().build(&specs::single_thread_spec());

    assert!(result.orphaned_nodes.is_empty());
    assert!(result.contradictions.is_empty());
    assert!(result.incomplete_path_count() * 2 > result.derivation_paths.len());
    assert_eq!(result.status, VerificationStatus::NeedsReview);
}

#[test]
fn fully_traced_spec_succeeds() {
    // With only the one principle seeded, every search succeeds.
    let config = GraphConfig::default().with_principles(vec![PrincipleSeed::new(
        "Ethical",
        "Agents respect privacy",
        &["privacy", "consent"],
    )]);
    let result = GraphEngine::new(config).build(&specs::single_thread_spec());

    assert_eq!(result.incomplete_path_count(), 0);
    assert_eq!(result.status, VerificationStatus::Success);
}

#[test]
fn conflicting_spec_reports_each_detector() {
    let result = GraphEngine::default().build(&specs::conflicting_spec());
    let kinds: Vec<&str> = result
        .contradictions
        .iter()
        .map(|c| c.kind.as_str())
        .collect();

    assert!(kinds.contains(&"mutually_exclusive_terms"));
    assert!(kinds.contains(&"resource_conflict"));
    assert!(kinds.contains(&"semantic_negation"));
    assert_eq!(result.status, VerificationStatus::NeedsReview);
}

#[test]
fn graph_result_serializes_with_stable_field_names() {
    let result = GraphEngine::default().build(&specs::single_thread_spec());
    let doc = serde_json::to_value(&result).unwrap();
    for key in [
        "graph_id",
        "status",
        "nodes",
        "edges",
        "contradictions",
        "orphaned_nodes",
        "derivation_paths",
        "resolution_strategies",
    ] {
        assert!(doc.get(key).is_some(), "missing {key}");
    }
}
