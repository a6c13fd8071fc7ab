//! HTTP text-analysis backend
//!
//! Posts `{"prompt": ...}` to a configured endpoint and expects
//! `{"text": ...}` back.

use crate::analyzer::TextAnalyzer;
use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    text: String,
}

/// Text analyzer backed by an HTTP service
#[derive(Debug, Clone)]
pub struct HttpTextAnalyzer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTextAnalyzer {
    /// Create for an endpoint URL
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextAnalyzer for HttpTextAnalyzer {
    async fn analyze(&self, prompt: &str) -> Result<String, AnalysisError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AnalyzeRequest { prompt })
            .send()
            .await
            .map_err(|e| AnalysisError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| AnalysisError::Backend(e.to_string()))?;

        let body: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Backend(e.to_string()))?;

        Ok(body.text)
    }
}
