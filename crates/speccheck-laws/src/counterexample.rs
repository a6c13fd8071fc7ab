//! Scenario-driven counter-example search
//!
//! Generate-then-verify: each scenario proposes probe inputs (and, for
//! resource exhaustion, deeper compositions), every probe runs through the
//! same pure law check, and only probes that actually fail are kept.

use crate::laws::{associativity, functor, identity, operad, LawContext, LawOutcome, OperadSpec};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use speccheck_model::{CounterExample, Law, Morphism, OperationSpec, TestInput, ValueType};

/// Left-nesting depth used by the resource-exhaustion scenario
const NESTING_DEPTH: usize = 4;

/// A way a law might break in practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationScenario {
    /// Hidden state makes repeated identical calls diverge
    SideEffectSensitivity,
    /// Large inputs and deep compositions
    ResourceExhaustion,
    /// Inputs that make some morphisms fail
    ExceptionDivergence,
    /// Lookalike values of different types
    TypeCoercion,
}

impl ViolationScenario {
    /// Every scenario, in search order
    pub const ALL: [ViolationScenario; 4] = [
        ViolationScenario::SideEffectSensitivity,
        ViolationScenario::ResourceExhaustion,
        ViolationScenario::ExceptionDivergence,
        ViolationScenario::TypeCoercion,
    ];

    /// Stable snake_case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SideEffectSensitivity => "side_effect_sensitivity",
            Self::ResourceExhaustion => "resource_exhaustion",
            Self::ExceptionDivergence => "exception_divergence",
            Self::TypeCoercion => "type_coercion",
        }
    }

    fn probes(self) -> Vec<Value> {
        match self {
            Self::SideEffectSensitivity => {
                let base = [json!("hello"), json!(1), json!([1, 2])];
                base.iter()
                    .flat_map(|v| std::iter::repeat(v.clone()).take(3))
                    .collect()
            }
            Self::ResourceExhaustion => vec![
                Value::String("x".repeat(10_000)),
                Value::Array((0..5_000).map(Value::from).collect()),
                json!({ "value": "y".repeat(4_096) }),
            ],
            Self::ExceptionDivergence => vec![
                Value::Null,
                json!(i64::MAX),
                json!(i64::MIN),
                json!(f64::MAX),
                json!(-f64::MAX),
                json!([null]),
                json!({}),
                json!(""),
            ],
            Self::TypeCoercion => vec![
                json!("42"),
                json!(42),
                json!(42.0),
                json!(true),
                json!("true"),
                json!("0"),
                json!(0),
                json!(false),
            ],
        }
    }
}

/// Limits and extra probes for counter-example search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationHints {
    /// Scenarios to try
    pub scenarios: Vec<ViolationScenario>,
    /// Counter-examples kept per scenario
    pub max_per_scenario: usize,
    /// Additional probe inputs tried under every scenario
    pub extra_inputs: Vec<Value>,
}

impl GenerationHints {
    /// Create default hints
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to some scenarios
    #[inline]
    #[must_use]
    pub fn with_scenarios(mut self, scenarios: Vec<ViolationScenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// With per-scenario cap
    #[inline]
    #[must_use]
    pub fn with_max_per_scenario(mut self, max: usize) -> Self {
        self.max_per_scenario = max;
        self
    }

    /// With additional probe inputs
    #[inline]
    #[must_use]
    pub fn with_extra_inputs(mut self, inputs: Vec<Value>) -> Self {
        self.extra_inputs = inputs;
        self
    }
}

impl Default for GenerationHints {
    fn default() -> Self {
        Self {
            scenarios: ViolationScenario::ALL.to_vec(),
            max_per_scenario: 3,
            extra_inputs: Vec::new(),
        }
    }
}

/// The morphisms a law needs, pulled from a caller-supplied list
#[derive(Debug, Clone)]
enum LawArguments {
    Associativity(Morphism, Morphism, Morphism),
    Identity(Morphism, Morphism),
    Functor(Morphism, Morphism, Morphism),
    Operad(OperadSpec),
}

impl LawArguments {
    fn select(law: Law, morphisms: &[Morphism]) -> Option<Self> {
        match (law, morphisms) {
            (Law::CompositionAssociativity, [f, g, h, ..]) => {
                Some(Self::Associativity(f.clone(), g.clone(), h.clone()))
            }
            (Law::IdentityLaws, [f, rest @ ..]) => {
                let id = rest
                    .iter()
                    .find(|m| matches!(m.implementation, OperationSpec::Identity))
                    .cloned()
                    .unwrap_or_else(|| Morphism::identity(f.source_type));
                Some(Self::Identity(f.clone(), id))
            }
            (Law::FunctorLaws, [functor, f, g, ..]) => {
                Some(Self::Functor(functor.clone(), f.clone(), g.clone()))
            }
            (Law::OperadCoherence, ops) => OperadSpec::new(ops.to_vec()).ok().map(Self::Operad),
            _ => None,
        }
    }

    /// Same law, each morphism nested `depth` times to the left
    fn deepened(&self, depth: usize) -> Self {
        let nest = |m: &Morphism| {
            (1..depth).fold(m.clone(), |acc, _| Morphism::compose(&acc, m))
        };
        match self {
            Self::Associativity(f, g, h) => Self::Associativity(nest(f), nest(g), nest(h)),
            Self::Identity(f, id) => Self::Identity(nest(f), id.clone()),
            Self::Functor(functor, f, g) => Self::Functor(functor.clone(), nest(f), nest(g)),
            Self::Operad(spec) => {
                let ops = spec.operations().iter().map(nest).collect();
                OperadSpec::new(ops).map_or_else(|_| self.clone(), Self::Operad)
            }
        }
    }

    fn check(&self, ctx: &LawContext<'_>, inputs: &[TestInput]) -> LawOutcome {
        match self {
            Self::Associativity(f, g, h) => associativity::check(ctx, f, g, h, inputs),
            Self::Identity(f, id) => identity::check(ctx, f, id, inputs),
            Self::Functor(functor, f, g) => functor::check(ctx, functor, f, g, inputs),
            Self::Operad(spec) => operad::check(ctx, spec, inputs),
        }
    }
}

/// Search for concrete violations of `law`
///
/// Morphisms by law: associativity `[f, g, h]`, identity `[f, id?]` (an
/// identity is synthesized when none is given), functor `[F, f, g]`, operad
/// all of them. Sheaf gluing and too few morphisms yield nothing.
#[must_use]
pub fn generate_counter_examples(
    ctx: &LawContext<'_>,
    law: Law,
    morphisms: &[Morphism],
    hints: &GenerationHints,
) -> Vec<CounterExample> {
    let Some(arguments) = LawArguments::select(law, morphisms) else {
        tracing::debug!("{}: no counter-example search for {} morphisms", law, morphisms.len());
        return Vec::new();
    };

    let mut found = Vec::new();
    for scenario in &hints.scenarios {
        let mut probes = scenario.probes();
        probes.extend(hints.extra_inputs.iter().cloned());

        let mut variants = vec![arguments.clone()];
        if *scenario == ViolationScenario::ResourceExhaustion {
            variants.push(arguments.deepened(NESTING_DEPTH));
        }

        let mut kept = 0;
        'probes: for variant in &variants {
            for value in &probes {
                if kept >= hints.max_per_scenario {
                    break 'probes;
                }
                let input = TestInput::typed(value.clone(), ValueType::of(value));
                if let Some(violation) = variant.check(ctx, &[input]).violation {
                    found.push(violation.counter_example);
                    kept += 1;
                }
            }
        }
        tracing::debug!("{} / {}: {} counter-examples", law, scenario.as_str(), kept);
    }
    found
}
