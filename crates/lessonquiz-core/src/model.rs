//! Core data model types for lessonquiz.
//!
//! A quiz is an ordered, immutable list of questions plus the opaque id the
//! validator uses to look it up. Questions are a closed sum type over the
//! three supported kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a question, unique within a quiz.
///
/// The generation backend emits either numbers or strings; the value is
/// echoed back to the validator exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{n}"),
            QuestionId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for QuestionId {
    fn from(n: u64) -> Self {
        QuestionId::Number(n)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId::Text(s.to_string())
    }
}

/// A complete quiz as delivered by the generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// Session identifier the validator uses to find the answer key.
    #[serde(default)]
    pub quiz_id: Option<String>,
    /// Questions in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(quiz_id: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            quiz_id: Some(quiz_id.into()),
            questions,
        }
    }

    /// Number of questions; each is worth at most one point.
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Total judged answers needed to finish the quiz.
    pub fn total_units(&self) -> usize {
        self.questions.iter().map(Question::submission_units).sum()
    }
}

/// A single quiz question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// Prompt shown to the learner.
    #[serde(rename = "question_text")]
    pub prompt: String,
    #[serde(flatten)]
    pub body: QuestionBody,
}

/// Kind-specific part of a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionBody {
    MultipleChoice {
        /// Options in display order (A, B, C, ...).
        options: Vec<String>,
    },
    FillInBlank,
    StepByStep {
        #[serde(default)]
        stages: Vec<Stage>,
    },
}

/// One sub-step of a step-by-step question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Type tag of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    FillInBlank,
    StepByStep,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "Multiple Choice"),
            QuestionKind::FillInBlank => write!(f, "Fill in the Blank"),
            QuestionKind::StepByStep => write!(f, "Step-by-Step"),
        }
    }
}

impl Question {
    pub fn multiple_choice(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            body: QuestionBody::MultipleChoice { options },
        }
    }

    pub fn fill_in_blank(id: impl Into<QuestionId>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            body: QuestionBody::FillInBlank,
        }
    }

    pub fn step_by_step(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        stages: Vec<Stage>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            body: QuestionBody::StepByStep { stages },
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self.body {
            QuestionBody::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            QuestionBody::FillInBlank => QuestionKind::FillInBlank,
            QuestionBody::StepByStep { .. } => QuestionKind::StepByStep,
        }
    }

    /// How many judged answers this question needs.
    ///
    /// Drives progress granularity and completion checks.
    pub fn submission_units(&self) -> usize {
        match &self.body {
            QuestionBody::MultipleChoice { .. } | QuestionBody::FillInBlank => 1,
            QuestionBody::StepByStep { stages } => stages.len(),
        }
    }

    /// Stages of a step-by-step question; empty for the other kinds.
    pub fn stages(&self) -> &[Stage] {
        match &self.body {
            QuestionBody::StepByStep { stages } => stages,
            QuestionBody::MultipleChoice { .. } | QuestionBody::FillInBlank => &[],
        }
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages().get(index)
    }

    /// Multiple-choice options; empty for the other kinds.
    pub fn options(&self) -> &[String] {
        match &self.body {
            QuestionBody::MultipleChoice { options } => options,
            QuestionBody::FillInBlank | QuestionBody::StepByStep { .. } => &[],
        }
    }
}

impl Stage {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Letter label for a multiple-choice option (`0` → `'A'`).
///
/// Returns `None` past `'Z'`.
pub fn option_letter(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i))
}

/// Inverse of [`option_letter`], case-insensitive.
pub fn option_index(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    upper
        .is_ascii_uppercase()
        .then(|| (upper as u8 - b'A') as usize)
}
