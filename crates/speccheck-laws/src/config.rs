//! Checker configuration

use crate::equivalence::EquivalencePolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Categorical checker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Seed for random test inputs
    pub seed: u64,
    /// Number of random inputs added per generation
    pub random_samples: usize,
    /// Inputs always tried first
    pub seed_inputs: Vec<Value>,
    /// Deepest composition the executor will run
    pub max_composition_depth: usize,
    /// How outputs are compared
    pub equivalence: EquivalencePolicy,
    /// Budget for one text-analysis call, in milliseconds
    pub analysis_timeout_ms: u64,
    /// Ask for prose on passing results too
    pub annotate_successes: bool,
}

impl CheckerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With random seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// With number of random samples
    #[inline]
    #[must_use]
    pub fn with_random_samples(mut self, samples: usize) -> Self {
        self.random_samples = samples;
        self
    }

    /// With inputs tried before any generated ones
    #[inline]
    #[must_use]
    pub fn with_seed_inputs(mut self, inputs: Vec<Value>) -> Self {
        self.seed_inputs = inputs;
        self
    }

    /// With composition depth budget
    #[inline]
    #[must_use]
    pub fn with_max_composition_depth(mut self, depth: usize) -> Self {
        self.max_composition_depth = depth;
        self
    }

    /// With equivalence policy
    #[inline]
    #[must_use]
    pub fn with_equivalence(mut self, policy: EquivalencePolicy) -> Self {
        self.equivalence = policy;
        self
    }

    /// With text-analysis timeout
    #[inline]
    #[must_use]
    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Annotate passing results as well
    #[inline]
    #[must_use]
    pub fn with_success_annotation(mut self, enabled: bool) -> Self {
        self.annotate_successes = enabled;
        self
    }

    /// Text-analysis timeout
    #[inline]
    #[must_use]
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_millis(self.analysis_timeout_ms)
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            random_samples: 8,
            seed_inputs: Vec::new(),
            max_composition_depth: 64,
            equivalence: EquivalencePolicy::Strict,
            analysis_timeout_ms: 2_000,
            annotate_successes: false,
        }
    }
}
