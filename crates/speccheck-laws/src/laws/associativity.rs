//! `(f∘g)∘h == f∘(g∘h)`

use super::{compare, run_until_violation, LawContext, LawOutcome};
use speccheck_model::{Law, Morphism, TestInput};

/// Check associativity of `f`, `g`, `h` over `inputs`
#[must_use]
pub fn check(
    ctx: &LawContext<'_>,
    f: &Morphism,
    g: &Morphism,
    h: &Morphism,
    inputs: &[TestInput],
) -> LawOutcome {
    let left = Morphism::compose(&Morphism::compose(f, g), h);
    let right = Morphism::compose(f, &Morphism::compose(g, h));

    run_until_violation(Law::CompositionAssociativity, inputs, |input| {
        let expected = ctx.executor.run(&left, &input.value);
        let actual = ctx.executor.run(&right, &input.value);
        compare(ctx, "(f∘g)∘h == f∘(g∘h)", input, expected, actual, &[f, g, h])
    })
}
