//! SpecCheck Ports
//!
//! The two seams between the verification core and the outside world:
//!
//! - [`TextAnalyzer`]: explanatory prose for violations (never affects a verdict)
//! - [`ResultStore`]: sink for graph and law results
//!
//! Enable the `http` feature for [`HttpTextAnalyzer`].

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod analyzer;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod store;

pub use analyzer::{
    analyze_or_default, CannedAnalyzer, NoopAnalyzer, TextAnalyzer, ANALYSIS_UNAVAILABLE,
};
pub use error::{AnalysisError, StoreError};
#[cfg(feature = "http")]
pub use http::HttpTextAnalyzer;
pub use store::{InMemoryStore, JsonDirStore, ResultStore, StoredPayload, StoredRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
