//! lessonquiz-validator — answer validator integrations.
//!
//! Implements the `AnswerValidator` trait over HTTP against the lesson
//! backend, plus a scriptable mock for tests and offline play.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{create_validator, load_config_from, LessonQuizConfig, ValidatorConfig};
pub use http::HttpValidator;
pub use mock::{MockReply, MockValidator};
