//! The top-level facade
//!
//! [`SpecVerifier`] owns a graph engine and a verification session and
//! optionally writes everything it produces to a [`ResultStore`]. Store
//! failures are logged and never change what is returned.

use crate::config::SpecCheckConfig;
use crate::error::SpecCheckError;
use crate::session::{SessionReport, VerificationSession};
use speccheck_graph::GraphEngine;
use speccheck_laws::{CategoricalChecker, LawCheck, TransformRegistry};
use speccheck_model::{SpecData, VerificationGraphResult};
use speccheck_ports::{ResultStore, TextAnalyzer};
use std::path::Path;
use std::sync::Arc;

/// Graph analysis and law verification behind one handle
pub struct SpecVerifier {
    engine: GraphEngine,
    session: VerificationSession,
    store: Option<Arc<dyn ResultStore>>,
}

impl SpecVerifier {
    /// Create from configuration and a transform registry
    #[must_use]
    pub fn new(config: &SpecCheckConfig, registry: TransformRegistry) -> Self {
        let checker = CategoricalChecker::new(registry, config.checker.clone());
        Self {
            engine: GraphEngine::new(config.graph.clone()),
            session: VerificationSession::new(checker, config.session.worker_count()),
            store: None,
        }
    }

    /// With a result store
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// With a text analyzer for law annotations
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn TextAnalyzer>) -> Self {
        let checker = self.session.checker().clone().with_analyzer(analyzer);
        self.session = VerificationSession::new(checker, self.session.workers());
        self
    }

    /// Graph engine in use
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &GraphEngine {
        &self.engine
    }

    /// Build and analyze the derivation graph for `data`
    #[must_use]
    pub fn verify_graph(&self, data: &SpecData) -> VerificationGraphResult {
        let result = self.engine.build(data);
        tracing::info!(
            "graph {}: {:?}, {} contradictions, {} orphans",
            result.graph_id,
            result.status,
            result.contradictions.len(),
            result.orphaned_nodes.len()
        );
        if let Some(store) = &self.store {
            if let Err(e) = store.store_graph_result(&result) {
                tracing::warn!("failed to store graph result: {}", e);
            }
        }
        result
    }

    /// Run law checks concurrently
    pub async fn verify_laws(&self, checks: Vec<LawCheck>) -> SessionReport {
        let report = self.session.run(checks).await;
        if let Some(store) = &self.store {
            for result in report.results() {
                if let Err(e) = store.store_verification(result) {
                    tracing::warn!("failed to store {} result: {}", result.law_name(), e);
                }
                if let Some(ce) = result.counter_example() {
                    if let Err(e) = store.store_counter_example(ce) {
                        tracing::warn!("failed to store counter-example: {}", e);
                    }
                }
            }
        }
        report
    }
}

impl std::fmt::Debug for SpecVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecVerifier")
            .field("engine", &self.engine)
            .field("session", &self.session)
            .field("store", &self.store.is_some())
            .finish()
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// Read spec input; `.yaml`/`.yml` as YAML, anything else as JSON
///
/// # Errors
/// Read failures and schema mismatches.
pub fn load_spec(path: impl AsRef<Path>) -> Result<SpecData, SpecCheckError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| SpecCheckError::input(path, e))?;
    let data = if is_yaml(path) {
        serde_yaml::from_str(&raw)?
    } else {
        SpecData::from_json_str(&raw)?
    };
    Ok(data)
}

/// Read a list of law checks; `.yaml`/`.yml` as YAML, anything else as JSON
///
/// # Errors
/// Read failures and schema mismatches, including invalid operad or sheaf
/// definitions.
pub fn load_checks(path: impl AsRef<Path>) -> Result<Vec<LawCheck>, SpecCheckError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| SpecCheckError::input(path, e))?;
    let checks = if is_yaml(path) {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };
    Ok(checks)
}
