//! Text-analysis port
//!
//! Explanatory prose for violations and scenarios comes from an injected
//! [`TextAnalyzer`]. Nothing it returns affects a verdict: failures, panics
//! and timeouts are swallowed by [`analyze_or_default`].

use crate::error::AnalysisError;
use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

/// Placeholder used whenever analysis is unavailable
pub const ANALYSIS_UNAVAILABLE: &str = "analysis unavailable";

/// Produces explanatory prose for a prompt
///
/// Implementations may be slow or unreachable; callers go through
/// [`analyze_or_default`] which bounds the call with a timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    /// Explain the situation described by `prompt`
    async fn analyze(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Analyzer that has nothing to say
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalyzer;

#[async_trait]
impl TextAnalyzer for NoopAnalyzer {
    async fn analyze(&self, _prompt: &str) -> Result<String, AnalysisError> {
        Ok(ANALYSIS_UNAVAILABLE.to_string())
    }
}

/// Analyzer returning a fixed reply and recording every prompt
#[derive(Debug, Default)]
pub struct CannedAnalyzer {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl CannedAnalyzer {
    /// Create with the reply to return
    #[must_use]
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextAnalyzer for CannedAnalyzer {
    async fn analyze(&self, prompt: &str) -> Result<String, AnalysisError> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Ask the analyzer, substituting [`ANALYSIS_UNAVAILABLE`] on error, panic or timeout
pub async fn analyze_or_default(
    analyzer: &dyn TextAnalyzer,
    prompt: &str,
    timeout: Duration,
) -> String {
    let call = AssertUnwindSafe(analyzer.analyze(prompt)).catch_unwind();
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(Ok(text))) => text,
        Ok(Ok(Err(e))) => {
            tracing::warn!("text analysis failed: {}", e);
            ANALYSIS_UNAVAILABLE.to_string()
        }
        Ok(Err(_)) => {
            tracing::warn!("text analysis panicked");
            ANALYSIS_UNAVAILABLE.to_string()
        }
        Err(_) => {
            tracing::warn!("text analysis timed out after {:?}", timeout);
            ANALYSIS_UNAVAILABLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowAnalyzer;

    #[async_trait]
    impl TextAnalyzer for SlowAnalyzer {
        async fn analyze(&self, _prompt: &str) -> Result<String, AnalysisError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".to_string())
        }
    }

    struct PanickingAnalyzer;

    #[async_trait]
    impl TextAnalyzer for PanickingAnalyzer {
        async fn analyze(&self, _prompt: &str) -> Result<String, AnalysisError> {
            panic!("analyzer bug")
        }
    }

    #[tokio::test]
    async fn canned_records_prompts() {
        let analyzer = CannedAnalyzer::new("pure functions compose");
        let text = analyze_or_default(&analyzer, "why?", Duration::from_secs(1)).await;
        assert_eq!(text, "pure functions compose");
        assert_eq!(analyzer.prompts(), vec!["why?".to_string()]);
    }

    #[tokio::test]
    async fn noop_yields_placeholder() {
        let text = analyze_or_default(&NoopAnalyzer, "anything", Duration::from_secs(1)).await;
        assert_eq!(text, ANALYSIS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn backend_failure_is_swallowed() {
        let mut mock = MockTextAnalyzer::new();
        mock.expect_analyze()
            .times(1)
            .returning(|_| Err(AnalysisError::Backend("connection refused".to_string())));

        let text = analyze_or_default(&mock, "explain", Duration::from_secs(1)).await;
        assert_eq!(text, ANALYSIS_UNAVAILABLE);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_swallowed() {
        let text = analyze_or_default(&SlowAnalyzer, "explain", Duration::from_millis(100)).await;
        assert_eq!(text, ANALYSIS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn panic_is_swallowed() {
        let text = analyze_or_default(&PanickingAnalyzer, "explain", Duration::from_secs(1)).await;
        assert_eq!(text, ANALYSIS_UNAVAILABLE);
    }
}
