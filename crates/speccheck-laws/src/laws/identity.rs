//! `f∘id == f` and `id∘f == f`

use super::{compare, run_until_violation, LawContext, LawOutcome};
use speccheck_model::{Law, Morphism, TestInput};

/// Check both identity laws for `f` against the declared identity `id`
#[must_use]
pub fn check(
    ctx: &LawContext<'_>,
    f: &Morphism,
    id: &Morphism,
    inputs: &[TestInput],
) -> LawOutcome {
    let right_unit = Morphism::compose(f, id);
    let left_unit = Morphism::compose(id, f);

    run_until_violation(Law::IdentityLaws, inputs, |input| {
        compare(
            ctx,
            "f∘id == f",
            input,
            ctx.executor.run(f, &input.value),
            ctx.executor.run(&right_unit, &input.value),
            &[f, id],
        )
        .or_else(|| {
            compare(
                ctx,
                "id∘f == f",
                input,
                ctx.executor.run(f, &input.value),
                ctx.executor.run(&left_unit, &input.value),
                &[f, id],
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

    #[test]
    fn true_identity_holds() {
        let registry = TransformRegistry::with_builtins();
        let ctx = LawContext::new(Executor::new(&registry, 16), EquivalencePolicy::Strict);
        let f = Morphism::transform("reverse", "reverse", ValueType::String, ValueType::String);
        let outcome = check(
            &ctx,
            &f,
            &Morphism::identity(ValueType::String),
            &[TestInput::new(json!("abc"))],
        );
        assert!(outcome.holds());
    }

    #[test]
    fn fake_identity_fails_right_unit_first() {
        let registry = TransformRegistry::with_builtins();
        let ctx = LawContext::new(Executor::new(&registry, 16), EquivalencePolicy::Strict);
        let f = Morphism::transform("reverse", "reverse", ValueType::String, ValueType::String);
        let fake = Morphism::transform("id", "trim", ValueType::String, ValueType::String);

        let outcome = check(&ctx, &f, &fake, &[TestInput::new(json!(" ab"))]);
        let violation = outcome.violation.unwrap();
        assert!(violation.detail.starts_with("f∘id == f"));
        assert_eq!(violation.counter_example.expected_result, json!("ba "));
        assert_eq!(violation.counter_example.actual_result, json!("ba"));
    }
}
