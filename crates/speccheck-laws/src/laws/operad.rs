//! Operad coherence for n-ary composition
//!
//! For operations `o1..on` (n ≥ 3): the left fold `((o1∘o2)∘o3)…` must equal
//! the right fold `o1∘(o2∘(o3…))`. A unit `u` must satisfy `u∘oi == oi` and
//! `oi∘u == oi`. Symmetric operads must also be invariant under reordering:
//! every permutation for n ≤ 4, rotations beyond that.

use super::{compare, run_until_violation, LawContext, LawOutcome};
use crate::error::LawError;
use serde::{Deserialize, Serialize};
use speccheck_model::{Law, Morphism, TestInput};

/// Largest arity checked under every permutation
const FULL_PERMUTATION_LIMIT: usize = 4;

/// Operations under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOperadSpec")]
pub struct OperadSpec {
    operations: Vec<Morphism>,
    unit: Option<Morphism>,
    symmetric: bool,
}

#[derive(Deserialize)]
struct RawOperadSpec {
    operations: Vec<Morphism>,
    #[serde(default)]
    unit: Option<Morphism>,
    #[serde(default)]
    symmetric: bool,
}

impl TryFrom<RawOperadSpec> for OperadSpec {
    type Error = LawError;

    fn try_from(raw: RawOperadSpec) -> Result<Self, Self::Error> {
        let spec = Self::new(raw.operations)?;
        Ok(Self {
            unit: raw.unit,
            symmetric: raw.symmetric,
            ..spec
        })
    }
}

impl OperadSpec {
    /// Operations to compose, outermost first
    ///
    /// # Errors
    /// `LawError::TooFewOperations` below three operations.
    pub fn new(operations: Vec<Morphism>) -> Result<Self, LawError> {
        if operations.len() < 3 {
            return Err(LawError::TooFewOperations(operations.len()));
        }
        Ok(Self {
            operations,
            unit: None,
            symmetric: false,
        })
    }

    /// With a unit operation
    #[inline]
    #[must_use]
    pub fn with_unit(mut self, unit: Morphism) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Declare the operad symmetric
    #[inline]
    #[must_use]
    pub fn symmetric(mut self) -> Self {
        self.symmetric = true;
        self
    }

    /// Operations, outermost first
    #[inline]
    #[must_use]
    pub fn operations(&self) -> &[Morphism] {
        &self.operations
    }

    /// Unit operation
    #[inline]
    #[must_use]
    pub fn unit(&self) -> Option<&Morphism> {
        self.unit.as_ref()
    }

    /// Whether reordering must be harmless
    #[inline]
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Morphism applied first to every input
    #[must_use]
    pub fn innermost(&self) -> &Morphism {
        // at least three operations by construction
        &self.operations[self.operations.len() - 1]
    }
}

fn left_fold(ops: &[&Morphism]) -> Option<Morphism> {
    let (first, rest) = ops.split_first()?;
    Some(
        rest.iter()
            .fold((*first).clone(), |acc, op| Morphism::compose(&acc, op)),
    )
}

fn right_fold(ops: &[&Morphism]) -> Option<Morphism> {
    let (last, rest) = ops.split_last()?;
    Some(
        rest.iter()
            .rev()
            .fold((*last).clone(), |acc, op| Morphism::compose(op, &acc)),
    )
}

/// Heap's algorithm, iterative; identity permutation excluded
fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut current: Vec<usize> = (0..n).collect();
    let mut counters = vec![0usize; n];
    let mut out = Vec::new();
    let mut i = 0;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                current.swap(0, i);
            } else {
                current.swap(counters[i], i);
            }
            out.push(current.clone());
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    out
}

fn rotations(n: usize) -> Vec<Vec<usize>> {
    (1..n)
        .map(|shift| (0..n).map(|i| (i + shift) % n).collect())
        .collect()
}

/// Check operad coherence over `inputs`
#[must_use]
pub fn check(ctx: &LawContext<'_>, spec: &OperadSpec, inputs: &[TestInput]) -> LawOutcome {
    let ops: Vec<&Morphism> = spec.operations.iter().collect();
    let (Some(left), Some(right)) = (left_fold(&ops), right_fold(&ops)) else {
        return run_until_violation(Law::OperadCoherence, &[], |_| None);
    };

    let orderings = if !spec.symmetric {
        Vec::new()
    } else if ops.len() <= FULL_PERMUTATION_LIMIT {
        permutations(ops.len())
    } else {
        rotations(ops.len())
    };
    let reordered: Vec<Morphism> = orderings
        .iter()
        .filter_map(|order| {
            let permuted: Vec<&Morphism> = order.iter().map(|i| ops[*i]).collect();
            left_fold(&permuted)
        })
        .collect();

    let exec = &ctx.executor;
    run_until_violation(Law::OperadCoherence, inputs, |input| {
        if let Some(v) = compare(
            ctx,
            "left fold == right fold",
            input,
            exec.run(&left, &input.value),
            exec.run(&right, &input.value),
            &ops,
        ) {
            return Some(v);
        }

        if let Some(unit) = &spec.unit {
            for op in &ops {
                let expected = exec.run(op, &input.value);
                let checks = [
                    ("u∘o == o", Morphism::compose(unit, op)),
                    ("o∘u == o", Morphism::compose(op, unit)),
                ];
                for (statement, composed) in checks {
                    if let Some(v) = compare(
                        ctx,
                        statement,
                        input,
                        expected.clone(),
                        exec.run(&composed, &input.value),
                        &[*op, unit],
                    ) {
                        return Some(v);
                    }
                }
            }
        }

        reordered.iter().find_map(|permuted| {
            compare(
                ctx,
                "composition invariant under reordering",
                input,
                exec.run(&left, &input.value),
                exec.run(permuted, &input.value),
                &ops,
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equivalence::EquivalencePolicy;
    use crate::execution::Executor;
    use crate::registry::TransformRegistry;
    use serde_json::json;
    use speccheck_model::ValueType;

    fn t(name: &str) -> Morphism {
        Morphism::transform(name, name, ValueType::Any, ValueType::Any)
    }

    fn ctx(registry: &TransformRegistry) -> LawContext<'_> {
        LawContext::new(Executor::new(registry, 32), EquivalencePolicy::Strict)
    }

    #[test]
    fn too_few_operations_rejected() {
        assert_eq!(
            OperadSpec::new(vec![t("trim"), t("trim")]).unwrap_err(),
            LawError::TooFewOperations(2)
        );
        let doc = json!({"operations": [serde_json::to_value(t("trim")).unwrap()]});
        assert!(serde_json::from_value::<OperadSpec>(doc).is_err());
    }

    #[test]
    fn permutation_counts() {
        assert_eq!(permutations(3).len(), 5);
        assert_eq!(permutations(4).len(), 23);
        assert_eq!(rotations(5).len(), 4);
    }

    #[test]
    fn bracketing_never_matters_for_pure_ops() {
        let registry = TransformRegistry::with_builtins();
        let spec = OperadSpec::new(vec![t("uppercase"), t("reverse"), t("trim"), t("reverse")])
            .unwrap()
            .with_unit(t("identity"));
        let outcome = check(&ctx(&registry), &spec, &[TestInput::new(json!(" abc"))]);
        assert!(outcome.holds());
    }

    #[test]
    fn symmetric_requires_commuting_ops() {
        let registry = TransformRegistry::with_builtins();
        let commuting = OperadSpec::new(vec![t("uppercase"), t("reverse"), t("trim")])
            .unwrap()
            .symmetric();
        assert!(check(&ctx(&registry), &commuting, &[TestInput::new(json!(" ab "))]).holds());

        let non_commuting = OperadSpec::new(vec![t("increment"), t("double"), t("negate")])
            .unwrap()
            .symmetric();
        let outcome = check(&ctx(&registry), &non_commuting, &[TestInput::new(json!(1))]);
        assert!(outcome
            .violation
            .unwrap()
            .detail
            .starts_with("composition invariant under reordering"));
    }

    #[test]
    fn broken_unit_detected() {
        let registry = TransformRegistry::with_builtins();
        let spec = OperadSpec::new(vec![t("reverse"), t("reverse"), t("reverse")])
            .unwrap()
            .with_unit(t("uppercase"));
        let outcome = check(&ctx(&registry), &spec, &[TestInput::new(json!("ab"))]);
        assert!(outcome.violation.unwrap().detail.starts_with("u∘o == o"));
    }
}
