//! Concurrent law-check sessions
//!
//! A [`VerificationSession`] fans law checks out over the blocking pool,
//! bounded by a semaphore, and folds the results into a [`SessionReport`]
//! ordered by check index.

use serde::{Deserialize, Serialize};
use speccheck_laws::{CategoricalChecker, LawCheck};
use speccheck_model::VerificationResult;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};

/// Verdict for one submitted check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Position in the submitted list
    pub index: usize,
    /// Result
    pub result: VerificationResult,
}

/// A check that never produced a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFailure {
    /// Position in the submitted list
    pub index: usize,
    /// What went wrong
    pub message: String,
}

/// Results of a session
///
/// [`SessionReport::merge`] is associative with [`SessionReport::empty`] as
/// identity, so partial reports can be combined in any grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Completed checks, by index
    pub entries: Vec<SessionEntry>,
    /// Checks that were lost, by index
    pub failures: Vec<SessionFailure>,
}

impl SessionReport {
    /// Report with nothing in it
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Report holding one result
    #[must_use]
    pub fn single(index: usize, result: VerificationResult) -> Self {
        Self {
            entries: vec![SessionEntry { index, result }],
            failures: Vec::new(),
        }
    }

    /// Report holding one lost check
    #[must_use]
    pub fn lost(index: usize, message: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            failures: vec![SessionFailure {
                index,
                message: message.into(),
            }],
        }
    }

    /// Combine two reports
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.entries.extend(other.entries);
        self.entries.sort_by_key(|e| e.index);
        self.failures.extend(other.failures);
        self.failures.sort_by_key(|f| f.index);
        self
    }

    /// Results in check order
    pub fn results(&self) -> impl Iterator<Item = &VerificationResult> {
        self.entries.iter().map(|e| &e.result)
    }

    /// Number of passing checks
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results().filter(|r| r.success()).count()
    }

    /// Number of failing checks
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results().filter(|r| !r.success()).count()
    }

    /// Every check completed and held
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty() && self.entries.iter().all(|e| e.result.success())
    }
}

/// Runs batches of law checks concurrently
#[derive(Debug, Clone)]
pub struct VerificationSession {
    checker: CategoricalChecker,
    workers: usize,
}

impl VerificationSession {
    /// Session over a checker with at most `workers` checks in flight
    #[must_use]
    pub fn new(checker: CategoricalChecker, workers: usize) -> Self {
        Self {
            checker,
            workers: workers.max(1),
        }
    }

    /// Underlying checker
    #[inline]
    #[must_use]
    pub fn checker(&self) -> &CategoricalChecker {
        &self.checker
    }

    /// Concurrency limit
    #[inline]
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every check, then annotate
    pub async fn run(&self, checks: Vec<LawCheck>) -> SessionReport {
        let total = checks.len();
        tracing::info!("running {} law checks on {} workers", total, self.workers);

        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();
        let mut indices: HashMap<task::Id, usize> = HashMap::with_capacity(total);
        let mut report = SessionReport::empty();

        for (index, check) in checks.into_iter().enumerate() {
            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                tracing::error!("worker semaphore closed at check {}", index);
                report = report.merge(SessionReport::lost(index, "worker pool closed"));
                continue;
            };
            let checker = self.checker.clone();
            let handle = tasks.spawn(async move {
                let _permit = permit;
                let law = check.law();
                let blocking = checker.clone();
                match task::spawn_blocking(move || blocking.run_check(&check)).await {
                    Ok(result) => SessionReport::single(index, checker.annotate(result).await),
                    Err(e) => {
                        tracing::error!("{} check {} aborted: {}", law, index, e);
                        SessionReport::lost(index, format!("{law} check aborted: {e}"))
                    }
                }
            });
            indices.insert(handle.id(), index);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let partial = match joined {
                Ok((_, partial)) => partial,
                Err(e) => {
                    let Some(index) = indices.get(&e.id()).copied() else {
                        tracing::error!("session task {} failed: {}", e.id(), e);
                        continue;
                    };
                    tracing::error!("session task for check {} failed: {}", index, e);
                    SessionReport::lost(index, format!("session task failed: {e}"))
                }
            };
            report = report.merge(partial);
        }

        metrics::counter!("speccheck_session_checks_total").increment(total as u64);
        if !report.failures.is_empty() {
            metrics::counter!("speccheck_session_lost_total")
                .increment(report.failures.len() as u64);
        }
        tracing::info!(
            "session finished: {} passed, {} failed, {} lost",
            report.passed(),
            report.failed(),
            report.failures.len()
        );
        report
    }
}
