//! SpecCheck Categorical Laws
//!
//! Verifies that morphisms obey the laws of composition by running them on
//! concrete inputs and comparing outputs.
//!
//! # Core Concepts
//!
//! - [`CategoricalChecker`]: async facade; one method per law plus [`LawCheck`] dispatch
//! - [`TransformRegistry`]: transform names to implementations, closures accepted
//! - [`Executor`]: iterative composition execution with a depth budget
//! - [`TestInputGenerator`]: seeded, type-filtered inputs
//! - [`laws`]: the pure checks themselves
//! - [`generate_counter_examples`] / [`suggest_remediation_strategies`]: evidence and advice
//!
//! # Example
//!
//! ```rust
//! use speccheck_laws::CategoricalChecker;
//! use speccheck_model::{Morphism, ValueType};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let checker = CategoricalChecker::default();
//! let up = Morphism::transform("up", "uppercase", ValueType::String, ValueType::String);
//! let rev = Morphism::transform("rev", "reverse", ValueType::String, ValueType::String);
//! let trim = Morphism::transform("trim", "trim", ValueType::String, ValueType::String);
//!
//! let result = checker.verify_composition_associativity(&up, &rev, &trim).await;
//! assert!(result.success());
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod checker;
mod config;
mod counterexample;
mod equivalence;
mod error;
mod execution;
mod inputs;
pub mod laws;
mod registry;
mod remediation;

pub use checker::{CategoricalChecker, LawCheck, VACUOUS_PASS_NOTE};
pub use config::CheckerConfig;
pub use counterexample::{generate_counter_examples, GenerationHints, ViolationScenario};
pub use equivalence::EquivalencePolicy;
pub use error::{ExecutionError, LawError};
pub use execution::Executor;
pub use inputs::TestInputGenerator;
pub use laws::{
    GluingConflict, LawContext, LawOutcome, OperadSpec, Overlap, Section, SheafData, Violation,
    EXECUTION_ERROR_PREFIX,
};
pub use registry::{Transform, TransformRegistry};
pub use remediation::{suggest_remediation_strategies, RemediationReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
