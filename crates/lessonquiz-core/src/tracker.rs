//! Per-session record of accepted answers and completed stages.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::QuestionId;

/// Key under which an accepted answer is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerKey {
    Question(QuestionId),
    Stage(QuestionId, usize),
}

/// How a stage should be rendered relative to the learner's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Current,
    Locked,
}

/// Tracks completed stages and accepted answers for one session.
///
/// Entries are only ever added; a fresh tracker is created on retake.
#[derive(Debug, Clone, Default)]
pub struct StageTracker {
    completed: HashMap<QuestionId, BTreeSet<usize>>,
    answers: HashMap<AnswerKey, String>,
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a correct answer for stage `stage` of `question`.
    ///
    /// Resubmitting an already completed stage overwrites the stored answer
    /// but does not duplicate the stage entry.
    pub fn complete_stage(&mut self, question: &QuestionId, stage: usize, answer: &str) {
        self.completed
            .entry(question.clone())
            .or_default()
            .insert(stage);
        self.answers.insert(
            AnswerKey::Stage(question.clone(), stage),
            answer.to_string(),
        );
    }

    /// Record a correct answer for a single-unit question.
    pub fn record_answer(&mut self, question: &QuestionId, answer: &str) {
        self.answers
            .insert(AnswerKey::Question(question.clone()), answer.to_string());
    }

    pub fn is_completed(&self, question: &QuestionId, stage: usize) -> bool {
        self.completed
            .get(question)
            .is_some_and(|stages| stages.contains(&stage))
    }

    /// Completed stage indices of `question`, ascending.
    pub fn completed(&self, question: &QuestionId) -> Vec<usize> {
        self.completed
            .get(question)
            .map(|stages| stages.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn answer(&self, key: &AnswerKey) -> Option<&str> {
        self.answers.get(key).map(String::as_str)
    }

    /// Render status of stage `stage` when the learner is on `current`.
    pub fn stage_status(&self, question: &QuestionId, stage: usize, current: usize) -> StageStatus {
        if self.is_completed(question, stage) {
            StageStatus::Completed
        } else if stage == current {
            StageStatus::Current
        } else {
            StageStatus::Locked
        }
    }

    /// Total completed stages across all questions.
    pub fn completed_stage_count(&self) -> usize {
        self.completed.values().map(BTreeSet::len).sum()
    }
}
