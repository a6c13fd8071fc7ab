//! Error types for the model crate
//!
//! Only contract violations at the API boundary are errors here. Law
//! violations and graph defects are reported as data.

/// Model-level contract violations
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A verification document breaks `success == counter_example.is_none()`
    #[error("inconsistent verification result for {law_name}: success={success}")]
    InconsistentResult {
        /// Law named in the document
        law_name: String,
        /// Claimed verdict
        success: bool,
    },

    /// Input adapter data does not match the contract
    #[error("invalid spec data: {0}")]
    InvalidSpecData(String),

    /// Law name not recognized
    #[error("unknown law: {0}")]
    UnknownLaw(String),
}
