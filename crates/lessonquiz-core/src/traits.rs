//! The answer validator contract.
//!
//! The engine never judges answers itself. Every submission is sent to an
//! [`AnswerValidator`], implemented over HTTP by `lessonquiz-validator`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::QuestionId;

/// Explanation reported when the validator could not be reached.
pub const VALIDATION_ERROR_EXPLANATION: &str = "Error validating answer";

/// Remote judge for submitted answers.
#[async_trait]
pub trait AnswerValidator: Send + Sync {
    /// Human-readable validator name (e.g. "http").
    fn name(&self) -> &str;

    /// Judge one submission.
    ///
    /// Errors are never surfaced to the learner; the engine maps them to an
    /// incorrect verdict.
    async fn validate(&self, request: &ValidationRequest) -> anyhow::Result<Verdict>;
}

/// Body of a validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub quiz_id: String,
    pub question_id: QuestionId,
    /// 1-indexed stage, only for step-by-step questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_number: Option<u32>,
    pub user_answer: String,
}

/// The validator's judgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub correct: bool,
    #[serde(default)]
    pub explanation: String,
}

impl Verdict {
    pub fn correct(explanation: impl Into<String>) -> Self {
        Self {
            correct: true,
            explanation: explanation.into(),
        }
    }

    pub fn incorrect(explanation: impl Into<String>) -> Self {
        Self {
            correct: false,
            explanation: explanation.into(),
        }
    }

    /// Verdict used whenever the validator fails. Never awards credit.
    pub fn validation_failed() -> Self {
        Self::incorrect(VALIDATION_ERROR_EXPLANATION)
    }
}
