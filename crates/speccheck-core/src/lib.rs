//! SpecCheck Core
//!
//! Wires the graph engine and the categorical checker into runnable
//! sessions, loads configuration, and sets up telemetry for the binary.
//!
//! # Core Concepts
//!
//! - [`SpecVerifier`]: facade over graph analysis, law sessions and an optional store
//! - [`VerificationSession`]: bounded concurrent law checks, index-ordered [`SessionReport`]
//! - [`SpecCheckConfig`]: TOML configuration with environment overrides
//! - [`telemetry::init`]: `tracing-subscriber` setup
//!
//! # Example
//!
//! ```rust,no_run
//! use speccheck_core::{demo, SpecCheckConfig, SpecVerifier};
//! use speccheck_laws::TransformRegistry;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let verifier = SpecVerifier::new(&SpecCheckConfig::default(), TransformRegistry::with_builtins());
//! let graph = verifier.verify_graph(&demo::demo_spec());
//! let report = verifier.verify_laws(demo::demo_checks()?).await;
//! println!("{:?}: {} passed", graph.status, report.passed());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
pub mod demo;
mod error;
mod session;
pub mod telemetry;
mod verifier;

pub use config::{SessionConfig, SpecCheckConfig, LOG_ENV, WORKERS_ENV};
pub use error::{ConfigError, SpecCheckError};
pub use session::{SessionEntry, SessionFailure, SessionReport, VerificationSession};
pub use verifier::{load_checks, load_spec, SpecVerifier};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
