//! Error types for the quiz engine and the validator contract.
//!
//! `ValidatorError` lives in `lessonquiz-core` so the engine can downcast
//! and classify validator failures for logging without string matching.

use thiserror::Error;

use crate::engine::Phase;

/// Errors that can occur when calling the answer validator.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The validator answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("invalid validator response: {0}")]
    InvalidResponse(String),

    /// The request did not complete in time.
    #[error("validation timed out after {0}ms")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

/// Contract violations reported by [`crate::engine::QuizEngine`].
///
/// None of these change session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The operation is not permitted in the current phase.
    #[error("cannot {operation} while {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },

    /// A validation is already outstanding.
    #[error("a validation is already in flight")]
    Busy,

    /// `resolve` was called with no validation outstanding.
    #[error("no validation is in flight")]
    NotBusy,

    /// The submitted answer was empty or whitespace.
    #[error("answer must not be empty")]
    EmptyAnswer,

    /// The quiz has no question at the current index.
    #[error("no question at index {0}")]
    NoCurrentQuestion(usize),

    /// The current step-by-step question has no stage at the current index.
    #[error("question {question} has no stage {stage}")]
    NoCurrentStage { question: String, stage: usize },

    /// A multiple-choice option index outside the option list.
    #[error("option {index} does not exist ({available} available)")]
    InvalidOption { index: usize, available: usize },

    /// The quiz has no id, so the validator cannot be addressed.
    #[error("quiz has no quiz_id")]
    MissingQuizId,

    /// Two questions share an id; session state is keyed by it.
    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(String),

    /// Results were requested before the session completed.
    #[error("results are only available once the quiz is complete")]
    NotComplete,
}
