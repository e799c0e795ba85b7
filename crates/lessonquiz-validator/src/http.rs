//! HTTP answer validator backed by the lesson backend.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use lessonquiz_core::error::ValidatorError;
use lessonquiz_core::traits::{AnswerValidator, ValidationRequest, Verdict};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const VALIDATE_PATH: &str = "/api/quiz/validate";

/// Validator that POSTs submissions to `{base_url}/api/quiz/validate`.
pub struct HttpValidator {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpValidator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ValidatorError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ValidatorError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AnswerValidator for HttpValidator {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(
        skip(self, request),
        fields(question = %request.question_id, stage = ?request.stage_number)
    )]
    async fn validate(&self, request: &ValidationRequest) -> anyhow::Result<Verdict> {
        let response = self
            .client
            .post(format!("{}{VALIDATE_PATH}", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ValidatorError::Timeout(self.timeout.as_millis() as u64)
                } else if e.is_connect() {
                    ValidatorError::Network(format!(
                        "validator not reachable at {}: {e}",
                        self.base_url
                    ))
                } else {
                    ValidatorError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(ValidatorError::Api { status, message }.into());
        }

        let verdict: Verdict = response
            .json()
            .await
            .map_err(|e| ValidatorError::InvalidResponse(e.to_string()))?;

        tracing::debug!(correct = verdict.correct, "validator responded");
        Ok(verdict)
    }
}
