//! lessonquiz-core — Quiz progression engine, scoring, and validator contract.
//!
//! This crate defines the quiz data model, the answer validator trait, and
//! the state machine that drives a learner through a quiz.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod results;
pub mod scoring;
pub mod snapshot;
pub mod tracker;
pub mod traits;

pub use engine::{EngineConfig, Phase, QuizEngine};
pub use error::{EngineError, ValidatorError};
pub use model::{Question, QuestionBody, QuestionId, QuestionKind, Quiz, Stage};
pub use snapshot::QuizSnapshot;
pub use traits::{AnswerValidator, ValidationRequest, Verdict};
