//! The categorical checker
//!
//! [`CategoricalChecker`] ties the pieces together: it generates inputs for
//! the relevant source type, runs the pure law check, attaches a
//! deterministic remediation hint to failures, and finally asks the injected
//! [`TextAnalyzer`] for prose. The verdict is settled before the analyzer is
//! consulted.

use crate::config::CheckerConfig;
use crate::counterexample::{self, GenerationHints};
use crate::execution::Executor;
use crate::inputs::TestInputGenerator;
use crate::laws::{associativity, functor, identity, operad, sheaf, LawContext, LawOutcome};
use crate::laws::{OperadSpec, SheafData};
use crate::registry::TransformRegistry;
use crate::remediation::{self, RemediationReport};
use serde::{Deserialize, Serialize};
use speccheck_model::{CounterExample, Law, Morphism, VerificationResult};
use speccheck_ports::{analyze_or_default, NoopAnalyzer, TextAnalyzer};
use std::sync::Arc;

/// Note attached to passes that exercised nothing
pub const VACUOUS_PASS_NOTE: &str =
    "no generated input matched the source type; the law holds vacuously";

/// One law check with its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "law", rename_all = "snake_case")]
pub enum LawCheck {
    /// `(f∘g)∘h == f∘(g∘h)`
    CompositionAssociativity {
        /// Outermost
        f: Morphism,
        /// Middle
        g: Morphism,
        /// Applied first
        h: Morphism,
    },
    /// `f∘id == f == id∘f`
    IdentityLaws {
        /// Morphism under test
        f: Morphism,
        /// Declared identity; synthesized on `f`'s source type when absent
        #[serde(default)]
        id: Option<Morphism>,
    },
    /// Functor laws for `functor` with `f` and `g`
    FunctorLaws {
        /// Object map
        functor: Morphism,
        /// Applied first
        f: Morphism,
        /// Applied second
        g: Morphism,
    },
    /// Operad coherence
    OperadCoherence(OperadSpec),
    /// Sheaf gluing
    SheafGluing(SheafData),
}

impl LawCheck {
    /// The law this check verifies
    #[must_use]
    pub fn law(&self) -> Law {
        match self {
            Self::CompositionAssociativity { .. } => Law::CompositionAssociativity,
            Self::IdentityLaws { .. } => Law::IdentityLaws,
            Self::FunctorLaws { .. } => Law::FunctorLaws,
            Self::OperadCoherence(_) => Law::OperadCoherence,
            Self::SheafGluing(_) => Law::SheafGluing,
        }
    }
}

/// Verifies categorical laws by executing morphisms
#[derive(Clone)]
pub struct CategoricalChecker {
    registry: Arc<TransformRegistry>,
    config: CheckerConfig,
    analyzer: Arc<dyn TextAnalyzer>,
    inputs: TestInputGenerator,
}

impl CategoricalChecker {
    /// Create a checker with no text analysis
    #[must_use]
    pub fn new(registry: TransformRegistry, config: CheckerConfig) -> Self {
        let inputs = TestInputGenerator::from_config(&config);
        Self {
            registry: Arc::new(registry),
            config,
            analyzer: Arc::new(NoopAnalyzer),
            inputs,
        }
    }

    /// With a text analyzer for annotations
    #[inline]
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn TextAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Transforms available to morphisms
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    fn context(&self) -> LawContext<'_> {
        LawContext::new(
            Executor::new(&self.registry, self.config.max_composition_depth),
            self.config.equivalence,
        )
    }

    /// Run one check to a verdict, without text analysis
    ///
    /// Synchronous and deterministic for a fixed registry and seed.
    #[must_use]
    pub fn run_check(&self, check: &LawCheck) -> VerificationResult {
        let law = check.law();
        let _span = tracing::debug_span!("law_check", law = law.as_str()).entered();
        let ctx = self.context();

        let outcome = match check {
            LawCheck::CompositionAssociativity { f, g, h } => {
                associativity::check(&ctx, f, g, h, &self.inputs.generate(h.source_type))
            }
            LawCheck::IdentityLaws { f, id } => {
                let id = id
                    .clone()
                    .unwrap_or_else(|| Morphism::identity(f.source_type));
                identity::check(&ctx, f, &id, &self.inputs.generate(f.source_type))
            }
            LawCheck::FunctorLaws { functor: fun, f, g } => {
                functor::check(&ctx, fun, f, g, &self.inputs.generate(fun.source_type))
            }
            LawCheck::OperadCoherence(spec) => operad::check(
                &ctx,
                spec,
                &self.inputs.generate(spec.innermost().source_type),
            ),
            LawCheck::SheafGluing(data) => sheaf::check(&ctx, data),
        };

        metrics::counter!("speccheck_law_checks_total", "law" => law.as_str()).increment(1);
        self.settle(outcome)
    }

    fn settle(&self, outcome: LawOutcome) -> VerificationResult {
        let law = outcome.law;
        let examples: Vec<CounterExample> = outcome
            .violation
            .iter()
            .map(|v| v.counter_example.clone())
            .collect();
        let result = outcome.into_result();

        if !result.success() {
            metrics::counter!("speccheck_law_failures_total", "law" => law.as_str()).increment(1);
            tracing::info!("{} failed after {} inputs", law, result.test_results().len());
            let report = remediation::suggest_remediation_strategies(&examples, law);
            return match report.primary() {
                Some(fix) => result.with_suggested_fix(fix),
                None => result,
            };
        }
        if result.is_vacuous() {
            return result.with_analysis(VACUOUS_PASS_NOTE);
        }
        tracing::debug!("{} holds over {} inputs", law, result.test_results().len());
        result
    }

    /// Add analyzer prose to a settled result
    ///
    /// Passing results are left alone unless `annotate_successes` is set.
    /// Existing analysis stays first so its prefix is preserved.
    pub async fn annotate(&self, result: VerificationResult) -> VerificationResult {
        if result.success() && !self.config.annotate_successes {
            return result;
        }
        let prompt = annotation_prompt(&result);
        let prose = analyze_or_default(
            self.analyzer.as_ref(),
            &prompt,
            self.config.analysis_timeout(),
        )
        .await;

        let analysis = match result.analysis() {
            Some(detail) => format!("{detail}\n{prose}"),
            None => prose,
        };
        result.with_analysis(analysis)
    }

    /// Run one check on the blocking pool and annotate it
    ///
    /// # Panics
    /// Re-raises a panic from the check itself; panics inside transforms
    /// are already turned into failing results.
    pub async fn check(&self, check: &LawCheck) -> VerificationResult {
        let checker = self.clone();
        let owned = check.clone();
        let result = match tokio::task::spawn_blocking(move || checker.run_check(&owned)).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::warn!(
                    "{} check cancelled on the blocking pool, running inline: {}",
                    check.law(),
                    e
                );
                self.run_check(check)
            }
        };
        self.annotate(result).await
    }

    /// Verify `(f∘g)∘h == f∘(g∘h)` on inputs for `h`'s source type
    pub async fn verify_composition_associativity(
        &self,
        f: &Morphism,
        g: &Morphism,
        h: &Morphism,
    ) -> VerificationResult {
        self.check(&LawCheck::CompositionAssociativity {
            f: f.clone(),
            g: g.clone(),
            h: h.clone(),
        })
        .await
    }

    /// Verify `f∘id == f == id∘f`
    pub async fn verify_identity_laws(&self, f: &Morphism, id: &Morphism) -> VerificationResult {
        self.check(&LawCheck::IdentityLaws {
            f: f.clone(),
            id: Some(id.clone()),
        })
        .await
    }

    /// Verify the functor laws for `functor` with `f` and `g`
    pub async fn verify_functor_laws(
        &self,
        functor: &Morphism,
        f: &Morphism,
        g: &Morphism,
    ) -> VerificationResult {
        self.check(&LawCheck::FunctorLaws {
            functor: functor.clone(),
            f: f.clone(),
            g: g.clone(),
        })
        .await
    }

    /// Verify operad coherence
    pub async fn verify_operad_coherence(&self, spec: &OperadSpec) -> VerificationResult {
        self.check(&LawCheck::OperadCoherence(spec.clone())).await
    }

    /// Verify that sections agree on overlaps and glue
    pub async fn verify_sheaf_gluing(&self, data: &SheafData) -> VerificationResult {
        self.check(&LawCheck::SheafGluing(data.clone())).await
    }

    /// Search for concrete violations of `law`
    ///
    /// Runs on the blocking pool. Morphisms by law: associativity
    /// `[f, g, h]`, identity `[f, id?]`, functor `[F, f, g]`, operad all.
    pub async fn generate_counter_examples(
        &self,
        law: Law,
        morphisms: &[Morphism],
        hints: &GenerationHints,
    ) -> Vec<CounterExample> {
        let checker = self.clone();
        let morphisms = morphisms.to_vec();
        let hints = hints.clone();
        let search = tokio::task::spawn_blocking(move || {
            counterexample::generate_counter_examples(&checker.context(), law, &morphisms, &hints)
        });
        match search.await {
            Ok(found) => {
                tracing::info!("{}: {} counter-examples generated", law, found.len());
                found
            }
            Err(e) => {
                tracing::error!("counter-example search for {} aborted: {}", law, e);
                Vec::new()
            }
        }
    }

    /// Rank remediation strategies for `law`
    #[must_use]
    pub fn suggest_remediation_strategies(
        &self,
        counter_examples: &[CounterExample],
        law: Law,
    ) -> RemediationReport {
        remediation::suggest_remediation_strategies(counter_examples, law)
    }
}

impl Default for CategoricalChecker {
    fn default() -> Self {
        Self::new(TransformRegistry::with_builtins(), CheckerConfig::default())
    }
}

impl std::fmt::Debug for CategoricalChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoricalChecker")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn annotation_prompt(result: &VerificationResult) -> String {
    let mut prompt = format!(
        "Explain the outcome of checking the {} law (success: {}).",
        result.law_name(),
        result.success()
    );
    if let Some(ce) = result.counter_example() {
        prompt.push_str(&format!(
            " Input {} produced {} on one side and {} on the other.",
            ce.test_input.value, ce.expected_result, ce.actual_result
        ));
    }
    if let Some(detail) = result.analysis() {
        prompt.push_str(&format!(" Detail: {detail}"));
    }
    prompt
}
