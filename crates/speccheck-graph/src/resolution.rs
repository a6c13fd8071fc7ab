//! Canned resolution advice per contradiction kind and orphan category

use speccheck_model::{Contradiction, ContradictionKind, GraphNode, NodeKind};
use std::collections::BTreeMap;

/// Advice attached to contradictions of one kind
#[must_use]
pub fn strategies_for(kind: ContradictionKind) -> &'static [&'static str] {
    match kind {
        ContradictionKind::CircularDependency => &[
            "break the cycle by removing the weakest derivation edge",
            "merge the nodes on the cycle into a single element",
            "introduce an abstraction both sides derive from",
        ],
        ContradictionKind::MutuallyExclusiveTerms => &[
            "pick one of the conflicting properties and reword the other node",
            "scope each property to a distinct component or mode",
        ],
        ContradictionKind::ResourceConflict => &[
            "declare explicit resource budgets per component",
            "introduce a shared resource manager",
        ],
        ContradictionKind::SemanticNegation => &[
            "reconcile the requirement wording so obligations do not conflict",
            "state the condition under which each obligation applies",
        ],
        ContradictionKind::OverSpecification => &[
            "consolidate redundant derivations into fewer parents",
            "split the over-derived node into focused elements",
        ],
    }
}

fn orphan_category(kind: NodeKind) -> (&'static str, &'static [&'static str]) {
    match kind {
        NodeKind::Principle => (
            "orphaned_principle",
            &["check principle seeding; principles are roots and need no parent"],
        ),
        NodeKind::Requirement => (
            "orphaned_requirement",
            &[
                "derive the requirement from at least one principle",
                "remove the requirement if no principle justifies it",
            ],
        ),
        NodeKind::Design => (
            "orphaned_design",
            &[
                "link the design element to the requirement it realizes",
                "drop design elements that serve no requirement",
            ],
        ),
        NodeKind::Implementation => (
            "orphaned_implementation",
            &[
                "establish a derivation path from a design element",
                "remove implementation tasks with no design justification",
            ],
        ),
    }
}

/// Category → advice for everything found in one analysis
///
/// Categories appear only when something of that category was found. Pure
/// and deterministic.
#[must_use]
pub fn generate_resolution_strategies(
    contradictions: &[Contradiction],
    orphans: &[&GraphNode],
) -> BTreeMap<String, Vec<String>> {
    let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for c in contradictions {
        out.entry(c.kind.as_str().to_string()).or_insert_with(|| {
            strategies_for(c.kind)
                .iter()
                .map(|s| (*s).to_string())
                .collect()
        });
    }

    for node in orphans {
        let (category, advice) = orphan_category(node.kind);
        out.entry(category.to_string())
            .or_insert_with(|| advice.iter().map(|s| (*s).to_string()).collect());
    }

    out
}
