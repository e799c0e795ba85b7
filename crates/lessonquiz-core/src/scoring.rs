//! Stage-aware scoring rules.
//!
//! Every question is worth exactly one point. A step-by-step question only
//! earns it on the final stage; earlier stages are necessary but not
//! sufficient.

use crate::model::QuestionKind;

/// Inputs to a scoring decision for one resolved submission.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput {
    pub kind: QuestionKind,
    pub is_correct: bool,
    /// Zero-based stage being judged; 0 for single-unit questions.
    pub stage_index: usize,
    /// Stage count of the question; ignored for single-unit questions.
    pub total_stages: usize,
    /// Whether this question already contributed to the score this session.
    pub already_scored: bool,
}

/// Returns `true` if the submission earns the question's point.
pub fn awards_point(input: ScoringInput) -> bool {
    if !input.is_correct || input.already_scored {
        return false;
    }
    match input.kind {
        QuestionKind::MultipleChoice | QuestionKind::FillInBlank => true,
        QuestionKind::StepByStep => {
            input.total_stages > 0 && input.stage_index == input.total_stages - 1
        }
    }
}

/// Rounded percentage of `score` out of `total`; 0 for an empty quiz.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as u32
}
