//! SpecCheck configuration
//!
//! One TOML document with three tables:
//!
//! ```toml
//! [graph]
//! default_confidence = 0.8
//!
//! [checker]
//! seed = 42
//! random_samples = 8
//!
//! [session]
//! workers = 4
//! log_filter = "info"
//! json_logs = false
//! ```
//!
//! `SPECCHECK_LOG` overrides `session.log_filter`, `SPECCHECK_WORKERS`
//! overrides `session.workers`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use speccheck_graph::GraphConfig;
use speccheck_laws::CheckerConfig;
use std::num::NonZeroUsize;
use std::path::Path;

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "SPECCHECK_LOG";
/// Environment variable overriding the worker count
pub const WORKERS_ENV: &str = "SPECCHECK_WORKERS";

/// Session and process settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Concurrent law checks; `None` uses available parallelism
    pub workers: Option<usize>,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Text-analysis endpoint (requires the `http` feature)
    pub analyzer_url: Option<String>,
}

impl SessionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With fixed worker count
    #[inline]
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Effective worker count, never zero
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers
            .filter(|w| *w > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
            })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            workers: None,
            log_filter: "info".to_string(),
            json_logs: false,
            analyzer_url: None,
        }
    }
}

/// Complete SpecCheck configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecCheckConfig {
    /// Graph engine settings
    pub graph: GraphConfig,
    /// Law checker settings
    pub checker: CheckerConfig,
    /// Session settings
    pub session: SessionConfig,
}

impl SpecCheckConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing tables and keys take defaults
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed TOML or mistyped values.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from a file, then apply environment overrides
    ///
    /// # Errors
    /// Read and parse failures, or an unusable override.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded config from {}", path.display());
        Self::from_toml_str(&raw)?.with_env_overrides()
    }

    /// Apply `SPECCHECK_LOG` / `SPECCHECK_WORKERS` from the process environment
    ///
    /// # Errors
    /// `ConfigError::InvalidEnv` if `SPECCHECK_WORKERS` is not a number.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// # Errors
    /// `ConfigError::InvalidEnv` if the worker override is not a number.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(filter) = lookup(LOG_ENV) {
            self.session.log_filter = filter;
        }
        if let Some(raw) = lookup(WORKERS_ENV) {
            let workers = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: WORKERS_ENV,
                    value: raw.clone(),
                })?;
            self.session.workers = Some(workers);
        }
        Ok(self)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Never for configurations built by this crate; propagated from `toml`.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use speccheck_laws::EquivalencePolicy;
    use std::collections::HashMap;

    #[test]
    fn partial_documents_take_defaults() {
        let config = SpecCheckConfig::from_toml_str(
            r#"
            [checker]
            seed = 7

            [checker.equivalence]
            mode = "numeric_tolerance"
            epsilon = 0.001

            [session]
            workers = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.checker.seed, 7);
        assert_eq!(
            config.checker.equivalence,
            EquivalencePolicy::NumericTolerance { epsilon: 0.001 }
        );
        assert_eq!(config.checker.random_samples, CheckerConfig::default().random_samples);
        assert_eq!(config.session.worker_count(), 3);
        assert_eq!(config.graph, GraphConfig::default());
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = SpecCheckConfig::default();
        config.session = SessionConfig::new().with_workers(2).with_log_filter("debug");
        let text = config.to_toml_string().unwrap();
        assert_eq!(SpecCheckConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [(LOG_ENV, "speccheck=trace"), (WORKERS_ENV, " 5 ")].into();
        let config = SpecCheckConfig::default()
            .with_overrides_from(|var| env.get(var).map(|v| (*v).to_string()))
            .unwrap();
        assert_eq!(config.session.log_filter, "speccheck=trace");
        assert_eq!(config.session.workers, Some(5));

        let err = SpecCheckConfig::default()
            .with_overrides_from(|var| (var == WORKERS_ENV).then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: WORKERS_ENV, .. }));
    }

    #[test]
    fn zero_workers_falls_back() {
        assert!(SessionConfig::new().with_workers(0).worker_count() >= 1);
    }
}
