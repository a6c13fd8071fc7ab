//! Pure law checks
//!
//! Every check is synchronous and side-effect free apart from whatever the
//! transforms themselves do. Each runs its inputs in order and stops at the
//! first violation.
//!
//! | Law | Statement |
//! |-----|-----------|
//! | associativity | `(f∘g)∘h == f∘(g∘h)` |
//! | identity | `f∘id == f == id∘f` |
//! | functor | `fmap(id) == id`, `fmap(g∘f) == fmap(g)∘fmap(f)`, `fmap(f)∘F == F∘f` |
//! | operad | left fold == right fold, units, equivariance when symmetric |
//! | sheaf | sections agree on overlaps and glue uniquely |

pub mod associativity;
pub mod functor;
pub mod identity;
pub mod operad;
pub mod sheaf;

pub use operad::OperadSpec;
pub use sheaf::{GluingConflict, Overlap, Section, SheafData};

use crate::equivalence::EquivalencePolicy;
use crate::error::ExecutionError;
use crate::execution::Executor;
use serde_json::{json, Value};
use speccheck_model::{CounterExample, Law, Morphism, TestInput, VerificationResult};

/// Prefix for analyses of results that failed because something errored
pub const EXECUTION_ERROR_PREFIX: &str = "execution error:";

/// What a law check needs besides its morphisms and inputs
#[derive(Debug, Clone, Copy)]
pub struct LawContext<'a> {
    /// Runs morphisms
    pub executor: Executor<'a>,
    /// Compares outputs
    pub policy: EquivalencePolicy,
}

impl<'a> LawContext<'a> {
    /// Create a context
    #[must_use]
    pub fn new(executor: Executor<'a>, policy: EquivalencePolicy) -> Self {
        Self { executor, policy }
    }
}

/// A concrete violation
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Evidence
    pub counter_example: CounterExample,
    /// One-line description of what disagreed
    pub detail: String,
    /// Whether a side errored rather than disagreed
    pub execution_error: bool,
}

/// Result of one pure law check
#[derive(Debug, Clone, PartialEq)]
pub struct LawOutcome {
    /// Law checked
    pub law: Law,
    /// Inputs exercised, up to and including a failing one
    pub tested: Vec<TestInput>,
    /// First violation found
    pub violation: Option<Violation>,
}

impl LawOutcome {
    fn new(law: Law) -> Self {
        Self {
            law,
            tested: Vec::new(),
            violation: None,
        }
    }

    /// No violation found
    #[inline]
    #[must_use]
    pub fn holds(&self) -> bool {
        self.violation.is_none()
    }

    /// Convert into the persisted record
    ///
    /// Failing results carry the violation detail as their analysis.
    #[must_use]
    pub fn into_result(self) -> VerificationResult {
        match self.violation {
            None => VerificationResult::passed(self.law, self.tested),
            Some(v) => VerificationResult::failed(self.law, v.counter_example, self.tested)
                .with_analysis(v.detail),
        }
    }
}

fn error_value(e: &ExecutionError) -> Value {
    json!({ "error": e.to_string() })
}

/// Compare the reference side against the other side on one input
fn compare(
    ctx: &LawContext<'_>,
    statement: &str,
    input: &TestInput,
    expected: Result<Value, ExecutionError>,
    actual: Result<Value, ExecutionError>,
    morphisms: &[&Morphism],
) -> Option<Violation> {
    let involved = || morphisms.iter().map(|m| (*m).clone()).collect::<Vec<_>>();

    match (expected, actual) {
        (Ok(e), Ok(a)) if ctx.policy.equivalent(&e, &a) => None,
        (Ok(e), Ok(a)) => Some(Violation {
            detail: format!("{statement} violated on input {}: {e} != {a}", input.value),
            counter_example: CounterExample::new(input.clone(), e, a, involved()),
            execution_error: false,
        }),
        (expected, actual) => {
            let reason = match (&expected, &actual) {
                (Err(e), _) | (_, Err(e)) => e.to_string(),
                _ => String::new(),
            };
            let render = |side: Result<Value, ExecutionError>| match side {
                Ok(v) => v,
                Err(e) => error_value(&e),
            };
            Some(Violation {
                detail: format!(
                    "{EXECUTION_ERROR_PREFIX} {reason} while checking {statement} on input {}",
                    input.value
                ),
                counter_example: CounterExample::new(
                    input.clone(),
                    render(expected),
                    render(actual),
                    involved(),
                ),
                execution_error: true,
            })
        }
    }
}

/// Run `inputs` through `check` until it reports a violation
fn run_until_violation<F>(law: Law, inputs: &[TestInput], mut check: F) -> LawOutcome
where
    F: FnMut(&TestInput) -> Option<Violation>,
{
    let mut outcome = LawOutcome::new(law);
    for input in inputs {
        outcome.tested.push(input.clone());
        if let Some(v) = check(input) {
            tracing::debug!("{} violated: {}", law, v.detail);
            outcome.violation = Some(v);
            break;
        }
    }
    if outcome.tested.is_empty() {
        tracing::warn!("{} holds vacuously: no compatible test input", law);
    }
    outcome
}
