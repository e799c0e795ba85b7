//! End-of-quiz results summary.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuestionId;
use crate::scoring::percentage;

/// Summary shown once the learner completes the quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub session_id: Uuid,
    pub score: usize,
    pub total_questions: usize,
    /// Rounded score percentage.
    pub percentage: u32,
    pub standing: Standing,
    pub outcomes: Vec<QuestionOutcome>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Whether a question earned its point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub index: usize,
    pub question_id: QuestionId,
    pub prompt: String,
    pub correct: bool,
}

/// Encouragement tier derived from the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Excellent,
    Good,
    KeepPracticing,
    TryAgain,
}

impl Standing {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => Standing::Excellent,
            60..=79 => Standing::Good,
            40..=59 => Standing::KeepPracticing,
            _ => Standing::TryAgain,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Standing::Excellent => "Excellent work!",
            Standing::Good => "Good job!",
            Standing::KeepPracticing => "Keep practicing!",
            Standing::TryAgain => "Try again!",
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl QuizSummary {
    pub fn new(
        session_id: Uuid,
        score: usize,
        total_questions: usize,
        outcomes: Vec<QuestionOutcome>,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        let percentage = percentage(score, total_questions);
        Self {
            session_id,
            score,
            total_questions,
            percentage,
            standing: Standing::from_percentage(percentage),
            outcomes,
            started_at,
            completed_at,
        }
    }

    /// Wall-clock time from start to completion, if both are known.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        Some(self.completed_at? - self.started_at?)
    }

    /// `"3 out of 4 correct"`.
    pub fn headline(&self) -> String {
        format!("{} out of {} correct", self.score, self.total_questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_thresholds() {
        assert_eq!(Standing::from_percentage(100), Standing::Excellent);
        assert_eq!(Standing::from_percentage(80), Standing::Excellent);
        assert_eq!(Standing::from_percentage(79), Standing::Good);
        assert_eq!(Standing::from_percentage(60), Standing::Good);
        assert_eq!(Standing::from_percentage(59), Standing::KeepPracticing);
        assert_eq!(Standing::from_percentage(40), Standing::KeepPracticing);
        assert_eq!(Standing::from_percentage(39), Standing::TryAgain);
        assert_eq!(Standing::from_percentage(0), Standing::TryAgain);
    }

    #[test]
    fn summary_computes_percentage_and_standing() {
        let now = Utc::now();
        let summary = QuizSummary::new(
            Uuid::nil(),
            2,
            3,
            vec![],
            Some(now - chrono::Duration::seconds(90)),
            Some(now),
        );
        assert_eq!(summary.percentage, 67);
        assert_eq!(summary.standing, Standing::Good);
        assert_eq!(summary.headline(), "2 out of 3 correct");
        assert_eq!(summary.elapsed(), Some(chrono::Duration::seconds(90)));
        assert_eq!(summary.standing.to_string(), "Good job!");
    }

    #[test]
    fn empty_quiz_reports_zero() {
        let summary = QuizSummary::new(Uuid::nil(), 0, 0, vec![], None, None);
        assert_eq!(summary.percentage, 0);
        assert_eq!(summary.standing, Standing::TryAgain);
        assert!(summary.elapsed().is_none());
    }
}
