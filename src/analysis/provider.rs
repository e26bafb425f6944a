//! Result providers: where a diagnosis comes from.
//!
//! [`ResultProvider`] is the seam between the submission flow and the outside
//! world. [`HttpProvider`] posts to the analysis endpoint; [`MockProvider`]
//! waits a fixed delay and answers with canned content.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use super::model::{Diagnosis, SymptomRequest};
use crate::error::{AnalysisError, AppError};

/// Default analysis endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/diagnose";

/// Default simulated latency of [`MockProvider`].
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(2000);

/// Default request timeout of [`HttpProvider`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Produces a diagnosis for a symptom description.
#[async_trait]
pub trait ResultProvider: Send + Sync {
    /// Analyze `symptoms`. Any failure is reported as an [`AnalysisError`].
    async fn analyze(&self, symptoms: &str) -> Result<Diagnosis, AnalysisError>;

    /// Short name for logging.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// HttpProvider
// ---------------------------------------------------------------------------

/// Posts `{ "symptoms": ... }` as JSON and decodes the JSON answer.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpProvider {
    /// Build a provider for `endpoint` with the given request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, AppError> {
        let endpoint = Url::parse(endpoint).map_err(|e| AppError::Endpoint {
            url: endpoint.to_owned(),
            message: e.to_string(),
        })?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AppError::HttpClient)?;
        Ok(Self { endpoint, client })
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ResultProvider for HttpProvider {
    async fn analyze(&self, symptoms: &str) -> Result<Diagnosis, AnalysisError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&SymptomRequest::new(symptoms))
            .send()
            .await
            .map_err(AnalysisError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Status(status.as_u16()));
        }

        let diagnosis = response.json::<Diagnosis>().await?;
        Ok(diagnosis)
    }

    fn name(&self) -> &str {
        "http"
    }
}

// ---------------------------------------------------------------------------
// MockProvider
// ---------------------------------------------------------------------------

/// Sleeps for a fixed delay, then always succeeds with [`MockProvider::content`].
#[derive(Debug, Clone)]
pub struct MockProvider {
    delay: Duration,
}

impl MockProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The canned answer.
    pub fn content() -> Diagnosis {
        Diagnosis::new(
            [
                "Tension headache - Most common type, often stress-related",
                "Migraine - Severe headache with light sensitivity",
                "Cluster headache - Intense pain around one eye",
            ],
            [
                "Rest in a dark, quiet room",
                "Apply cold or warm compress to head",
                "Stay hydrated and avoid triggers",
                "Consider over-the-counter pain relief",
                "Consult healthcare provider if symptoms persist",
            ],
        )
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_DELAY)
    }
}

#[async_trait]
impl ResultProvider for MockProvider {
    async fn analyze(&self, _symptoms: &str) -> Result<Diagnosis, AnalysisError> {
        tokio::time::sleep(self.delay).await;
        Ok(Self::content())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ===========================================================================
// Tests
// ===========================================================================
