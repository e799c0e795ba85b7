//! Presentation-facing view of a quiz session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::Phase;
use crate::traits::Verdict;

/// Read-only snapshot handed to presentation adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSnapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub current_question_index: usize,
    pub current_stage_index: usize,
    pub score: usize,
    pub total_questions: usize,
    /// Present only while showing feedback.
    pub pending_feedback: Option<Verdict>,
    pub completed_stages_for_current_question: Vec<usize>,
    /// A validation is outstanding; submission must stay disabled.
    pub busy: bool,
    /// Fraction of questions finished, in `[0, 1]`.
    pub progress: f64,
    /// Judged-correct submission units (questions or stages).
    pub units_completed: usize,
    pub total_units: usize,
}

impl QuizSnapshot {
    /// `"Question 2 of 5"`, 1-based.
    pub fn progress_label(&self) -> String {
        format!(
            "Question {} of {}",
            (self.current_question_index + 1).min(self.total_questions.max(1)),
            self.total_questions
        )
    }

    /// `"Score: 1/5"`.
    pub fn score_label(&self) -> String {
        format!("Score: {}/{}", self.score, self.total_questions)
    }

    /// Progress as a whole percentage.
    pub fn progress_percent(&self) -> u32 {
        (self.progress * 100.0).round() as u32
    }
}

/// Fraction of questions strictly before the current one.
///
/// The current question never counts, even mid-stage; the bar only jumps
/// once the learner moves past it.
pub fn progress_fraction(phase: Phase, question_index: usize, total_questions: usize) -> f64 {
    if total_questions == 0 {
        return 0.0;
    }
    match phase {
        Phase::NotStarted => 0.0,
        Phase::InProgress | Phase::ShowingFeedback => {
            question_index.min(total_questions) as f64 / total_questions as f64
        }
        Phase::Complete => 1.0,
    }
}
