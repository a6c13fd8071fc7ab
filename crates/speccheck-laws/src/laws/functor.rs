//! Functor laws for an object map `F` with a structural `fmap`
//!
//! For each input `x`, with `Fx = F(x)`:
//!
//! - `fmap(id)(Fx) == Fx`
//! - `fmap(g∘f)(Fx) == fmap(g)(fmap(f)(Fx))`
//! - `fmap(f)(Fx) == F(f(x))`
//!
//! `fmap` is the executor's structural lift, so the identity law only guards
//! the lift itself and cannot fail for any choice of `F`. The composition law
//! catches hidden state in `f` or `g`. The coherence law is the one that
//! tests `F`.

use super::{compare, run_until_violation, LawContext, LawOutcome};
use speccheck_model::{Law, Morphism, TestInput, ValueType};

/// Check the functor laws for `functor` with morphisms `f` and `g`
#[must_use]
pub fn check(
    ctx: &LawContext<'_>,
    functor: &Morphism,
    f: &Morphism,
    g: &Morphism,
    inputs: &[TestInput],
) -> LawOutcome {
    let id = Morphism::identity(ValueType::Any);
    let g_after_f = Morphism::compose(g, f);
    let exec = &ctx.executor;

    run_until_violation(Law::FunctorLaws, inputs, |input| {
        let mapped = match exec.run(functor, &input.value) {
            Ok(v) => v,
            Err(e) => {
                return compare(ctx, "F(x) is defined", input, Err(e.clone()), Err(e), &[functor]);
            }
        };

        compare(
            ctx,
            "fmap(id) == id",
            input,
            Ok(mapped.clone()),
            exec.run_lifted(&id, &mapped),
            &[functor],
        )
        .or_else(|| {
            compare(
                ctx,
                "fmap(g∘f) == fmap(g)∘fmap(f)",
                input,
                exec.run_lifted(&g_after_f, &mapped),
                exec
                    .run_lifted(f, &mapped)
                    .and_then(|v| exec.run_lifted(g, &v)),
                &[functor, f, g],
            )
        })
        .or_else(|| {
            compare(
                ctx,
                "fmap(f)∘F == F∘f",
                input,
                exec.run_lifted(f, &mapped),
                exec.run(f, &input.value).and_then(|v| exec.run(functor, &v)),
                &[functor, f],
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
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU64, Ordering};

    fn t(name: &str) -> Morphism {
        Morphism::transform(name, name, ValueType::Any, ValueType::Any)
    }

    fn ctx(registry: &TransformRegistry) -> LawContext<'_> {
        LawContext::new(Executor::new(registry, 16), EquivalencePolicy::Strict)
    }

    #[test]
    fn list_functor_holds() {
        let registry = TransformRegistry::with_builtins();
        let inputs = vec![
            TestInput::new(json!("hello")),
            TestInput::new(json!(3)),
        ];
        let outcome = check(
            &ctx(&registry),
            &t("wrap_list"),
            &t("uppercase"),
            &t("reverse"),
            &inputs,
        );
        assert!(outcome.holds(), "{:?}", outcome.violation);
    }

    #[test]
    fn non_natural_object_map_fails_coherence() {
        let registry = TransformRegistry::with_builtins();
        // F = uppercase does not commute with f = lowercase
        let outcome = check(
            &ctx(&registry),
            &t("uppercase"),
            &t("lowercase"),
            &t("identity"),
            &[TestInput::new(json!("Hi"))],
        );
        let violation = outcome.violation.unwrap();
        assert!(violation.detail.starts_with("fmap(f)∘F == F∘f"));
        assert_eq!(violation.counter_example.expected_result, json!("hi"));
        assert_eq!(violation.counter_example.actual_result, json!("HI"));
    }

    #[test]
    fn hidden_state_breaks_composition() {
        let calls = AtomicU64::new(0);
        let registry = TransformRegistry::with_builtins().with("tick", move |v: &Value| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!(format!("{}#{n}", v.as_str().unwrap_or_default())))
        });
        let outcome = check(
            &ctx(&registry),
            &t("wrap_list"),
            &t("tick"),
            &t("identity"),
            &[TestInput::new(json!("a"))],
        );
        let violation = outcome.violation.unwrap();
        assert!(violation.detail.starts_with("fmap(g∘f) == fmap(g)∘fmap(f)"));
        assert_eq!(violation.counter_example.expected_result, json!(["a#0"]));
        assert_eq!(violation.counter_example.actual_result, json!(["a#1"]));
    }

    #[test]
    fn failing_object_map_is_an_execution_error() {
        let registry = TransformRegistry::with_builtins();
        let outcome = check(
            &ctx(&registry),
            &t("increment"),
            &t("identity"),
            &t("identity"),
            &[TestInput::new(json!(i64::MAX))],
        );
        assert!(outcome.violation.unwrap().execution_error);
    }
}
