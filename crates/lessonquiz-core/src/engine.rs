//! Quiz progression state machine.
//!
//! Drives a learner through the questions of a [`Quiz`], sends every
//! submission to an [`AnswerValidator`], applies the scoring rules, and
//! decides between retrying and advancing.
//!
//! ```text
//! NotStarted --start--> InProgress --submit--> ShowingFeedback
//!                          ^                        |
//!                          +---------next-----------+--next (last unit, correct)--> Complete
//!                                                                                      |
//!                          InProgress <----------------retake--------------------------+
//! ```
//!
//! Submission is split in two so the single-flight rule is explicit:
//! [`QuizEngine::begin_submit`] marks the engine busy and yields the request,
//! [`QuizEngine::resolve`] applies the verdict and clears the busy flag.
//! [`QuizEngine::submit`] runs both around the validator call.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, ValidatorError};
use crate::model::{Question, QuestionBody, QuestionId, QuestionKind, Quiz, Stage};
use crate::results::{QuestionOutcome, QuizSummary};
use crate::scoring::{awards_point, ScoringInput};
use crate::snapshot::{progress_fraction, QuizSnapshot};
use crate::tracker::{AnswerKey, StageStatus, StageTracker};
use crate::traits::{AnswerValidator, ValidationRequest, Verdict};

/// Configuration for the quiz engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on a single validator call. Expiry counts as an
    /// incorrect answer.
    pub validation_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validation_timeout: Duration::from_secs(30),
        }
    }
}

/// Session phase. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    InProgress,
    ShowingFeedback,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NotStarted => write!(f, "not started"),
            Phase::InProgress => write!(f, "in progress"),
            Phase::ShowingFeedback => write!(f, "showing feedback"),
            Phase::Complete => write!(f, "complete"),
        }
    }
}

/// State of one run-through of the quiz.
#[derive(Debug)]
struct Session {
    id: Uuid,
    phase: Phase,
    question_index: usize,
    stage_index: usize,
    tracker: StageTracker,
    scored: HashSet<QuestionId>,
    pending: Option<Verdict>,
    /// Trimmed answer of the outstanding validation, if any.
    in_flight: Option<String>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::NotStarted,
            question_index: 0,
            stage_index: 0,
            tracker: StageTracker::new(),
            scored: HashSet::new(),
            pending: None,
            in_flight: None,
            started_at: None,
            completed_at: None,
        }
    }

    fn begin() -> Self {
        Self {
            phase: Phase::InProgress,
            started_at: Some(Utc::now()),
            ..Self::new()
        }
    }

    fn score(&self) -> usize {
        self.scored.len()
    }
}

/// The quiz progression engine.
pub struct QuizEngine {
    quiz: Quiz,
    quiz_id: String,
    validator: Arc<dyn AnswerValidator>,
    config: EngineConfig,
    session: Session,
}

impl QuizEngine {
    /// Create an engine for `quiz`.
    ///
    /// The quiz must carry a `quiz_id` and its question ids must be unique.
    pub fn new(
        quiz: Quiz,
        validator: Arc<dyn AnswerValidator>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let quiz_id = quiz
            .quiz_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(EngineError::MissingQuizId)?;

        let mut seen = HashSet::new();
        if let Some(dup) = quiz.questions.iter().find(|q| !seen.insert(&q.id)) {
            return Err(EngineError::DuplicateQuestionId(dup.id.to_string()));
        }
        Ok(Self {
            quiz,
            quiz_id,
            validator,
            config,
            session: Session::new(),
        })
    }

    /// The quiz being played.
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Current session phase.
    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Points earned this session, at most one per question.
    pub fn score(&self) -> usize {
        self.session.score()
    }

    /// Id of the current session; a retake gets a fresh one.
    pub fn session_id(&self) -> Uuid {
        self.session.id
    }

    /// `true` while a validation is outstanding; submission must stay
    /// disabled until it clears.
    pub fn is_busy(&self) -> bool {
        self.session.in_flight.is_some()
    }

    /// Verdict of the last submission, present only while showing feedback.
    pub fn pending_feedback(&self) -> Option<&Verdict> {
        self.session.pending.as_ref()
    }

    /// Begin the first session.
    pub fn start(&mut self) -> Result<(), EngineError> {
        self.expect_phase("start", Phase::NotStarted)?;
        self.reset();
        Ok(())
    }

    /// Start over with a clean session after completing the quiz.
    pub fn retake(&mut self) -> Result<(), EngineError> {
        self.expect_phase("retake", Phase::Complete)?;
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.session = Session::begin();
        tracing::info!(
            session = %self.session.id,
            quiz = %self.quiz_id,
            questions = self.quiz.total_questions(),
            "quiz session started"
        );
    }

    fn expect_phase(&self, operation: &'static str, expected: Phase) -> Result<(), EngineError> {
        if self.session.phase == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidPhase {
                operation,
                phase: self.session.phase,
            })
        }
    }

    /// The question being answered, while a session is running.
    pub fn current_question(&self) -> Option<&Question> {
        match self.session.phase {
            Phase::InProgress | Phase::ShowingFeedback => {
                self.quiz.questions.get(self.session.question_index)
            }
            Phase::NotStarted | Phase::Complete => None,
        }
    }

    /// The active stage of the current step-by-step question.
    pub fn current_stage(&self) -> Option<&Stage> {
        self.current_question()
            .and_then(|q| q.stage(self.session.stage_index))
    }

    /// Render status of `stage` within the current question.
    pub fn stage_status(&self, stage: usize) -> Option<StageStatus> {
        let question = self.current_question()?;
        (stage < question.stages().len()).then(|| {
            self.session
                .tracker
                .stage_status(&question.id, stage, self.session.stage_index)
        })
    }

    /// Last correct answer stored under `key` in this session.
    pub fn recorded_answer(&self, key: &AnswerKey) -> Option<&str> {
        self.session.tracker.answer(key)
    }

    /// Check submission preconditions and mark the engine busy.
    ///
    /// Blank answers are rejected here without any state change. The
    /// returned request must be sent to the validator and its outcome fed
    /// to [`QuizEngine::resolve`].
    pub fn begin_submit(&mut self, answer: &str) -> Result<ValidationRequest, EngineError> {
        if self.is_busy() {
            return Err(EngineError::Busy);
        }
        self.expect_phase("submit", Phase::InProgress)?;

        let index = self.session.question_index;
        let question = self
            .quiz
            .questions
            .get(index)
            .ok_or(EngineError::NoCurrentQuestion(index))?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(EngineError::EmptyAnswer);
        }

        let stage_number = match &question.body {
            QuestionBody::MultipleChoice { .. } | QuestionBody::FillInBlank => None,
            QuestionBody::StepByStep { stages } => {
                let stage = self.session.stage_index;
                if stage >= stages.len() {
                    return Err(EngineError::NoCurrentStage {
                        question: question.id.to_string(),
                        stage,
                    });
                }
                Some(stage as u32 + 1)
            }
        };

        let request = ValidationRequest {
            quiz_id: self.quiz_id.clone(),
            question_id: question.id.clone(),
            stage_number,
            user_answer: answer.to_string(),
        };

        tracing::debug!(
            question = %question.id,
            stage = ?stage_number,
            "submitting answer for validation"
        );
        self.session.in_flight = Some(request.user_answer.clone());
        Ok(request)
    }

    /// Apply the outcome of the outstanding validation.
    ///
    /// Any validator error becomes an incorrect verdict. Scoring and stage
    /// tracking happen here, before the learner acknowledges the feedback.
    pub fn resolve(&mut self, outcome: anyhow::Result<Verdict>) -> Result<&Verdict, EngineError> {
        let index = self.session.question_index;
        let question = self
            .quiz
            .questions
            .get(index)
            .ok_or(EngineError::NoCurrentQuestion(index))?;
        let answer = self.session.in_flight.take().ok_or(EngineError::NotBusy)?;

        let verdict = match outcome {
            Ok(verdict) => verdict,
            Err(e) => {
                let timed_out = matches!(
                    e.downcast_ref::<ValidatorError>(),
                    Some(ValidatorError::Timeout(_))
                );
                tracing::warn!(
                    question = %question.id,
                    timed_out,
                    "validation failed, treating answer as incorrect: {e:#}"
                );
                Verdict::validation_failed()
            }
        };

        if verdict.correct {
            let session = &mut self.session;
            let kind = question.kind();
            let awarded = awards_point(ScoringInput {
                kind,
                is_correct: true,
                stage_index: session.stage_index,
                total_stages: question.stages().len(),
                already_scored: session.scored.contains(&question.id),
            });
            if awarded {
                session.scored.insert(question.id.clone());
            }

            match kind {
                QuestionKind::StepByStep => {
                    session
                        .tracker
                        .complete_stage(&question.id, session.stage_index, &answer)
                }
                QuestionKind::MultipleChoice | QuestionKind::FillInBlank => {
                    session.tracker.record_answer(&question.id, &answer)
                }
            }

            tracing::debug!(
                question = %question.id,
                stage = session.stage_index,
                awarded,
                score = session.score(),
                "answer accepted"
            );
        } else {
            tracing::debug!(question = %question.id, "answer rejected");
        }

        self.session.phase = Phase::ShowingFeedback;
        let feedback: &Verdict = self.session.pending.insert(verdict);
        Ok(feedback)
    }

    /// Submit an answer and wait for the validator's verdict.
    ///
    /// The call is bounded by [`EngineConfig::validation_timeout`]. If this
    /// future is dropped before it completes, the engine stays busy; call
    /// [`QuizEngine::resolve`] with an error to fail the attempt closed.
    pub async fn submit(&mut self, answer: &str) -> Result<&Verdict, EngineError> {
        let request = self.begin_submit(answer)?;
        let timeout = self.config.validation_timeout;
        let outcome = match tokio::time::timeout(timeout, self.validator.validate(&request)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(ValidatorError::Timeout(timeout.as_millis() as u64).into()),
        };
        self.resolve(outcome)
    }

    /// Submit the multiple-choice option at `index` (0 = A).
    pub async fn submit_option(&mut self, index: usize) -> Result<&Verdict, EngineError> {
        let options = self.current_question().map(Question::options).unwrap_or(&[]);
        let answer = options
            .get(index)
            .cloned()
            .ok_or(EngineError::InvalidOption {
                index,
                available: options.len(),
            })?;
        self.submit(&answer).await
    }

    /// Acknowledge the current feedback.
    ///
    /// An incorrect verdict returns to the same question or stage. A correct
    /// one advances exactly one step: next stage, next question, or
    /// completion.
    pub fn next(&mut self) -> Result<Phase, EngineError> {
        self.expect_phase("advance", Phase::ShowingFeedback)?;
        let feedback = self
            .session
            .pending
            .take()
            .ok_or(EngineError::InvalidPhase {
                operation: "advance",
                phase: self.session.phase,
            })?;

        let session = &mut self.session;
        if !feedback.correct {
            session.phase = Phase::InProgress;
            tracing::debug!(question = session.question_index, "retrying");
            return Ok(session.phase);
        }

        let stage_count = self
            .quiz
            .questions
            .get(session.question_index)
            .map(|q| q.stages().len())
            .unwrap_or(0);

        if session.stage_index + 1 < stage_count {
            session.stage_index += 1;
            session.phase = Phase::InProgress;
        } else if session.question_index + 1 < self.quiz.total_questions() {
            session.question_index += 1;
            session.stage_index = 0;
            session.phase = Phase::InProgress;
        } else {
            session.phase = Phase::Complete;
            session.completed_at = Some(Utc::now());
            tracing::info!(
                session = %session.id,
                score = session.score(),
                total = self.quiz.total_questions(),
                "quiz complete"
            );
            return Ok(session.phase);
        }

        tracing::debug!(
            question = session.question_index,
            stage = session.stage_index,
            "advanced"
        );
        Ok(session.phase)
    }

    /// Read-only view of the session for presentation.
    pub fn snapshot(&self) -> QuizSnapshot {
        let session = &self.session;
        let total_questions = self.quiz.total_questions();
        let completed_stages = self
            .current_question()
            .map(|q| session.tracker.completed(&q.id))
            .unwrap_or_default();
        let single_units = self
            .quiz
            .questions
            .iter()
            .filter(|q| q.kind() != QuestionKind::StepByStep && session.scored.contains(&q.id))
            .count();

        QuizSnapshot {
            session_id: session.id,
            phase: session.phase,
            current_question_index: session.question_index,
            current_stage_index: session.stage_index,
            score: session.score(),
            total_questions,
            pending_feedback: session.pending.clone(),
            completed_stages_for_current_question: completed_stages,
            busy: self.is_busy(),
            progress: progress_fraction(session.phase, session.question_index, total_questions),
            units_completed: single_units + session.tracker.completed_stage_count(),
            total_units: self.quiz.total_units(),
        }
    }

    /// Results of the finished session.
    pub fn summary(&self) -> Result<QuizSummary, EngineError> {
        self.expect_phase("summarize", Phase::Complete)
            .map_err(|_| EngineError::NotComplete)?;
        let session = &self.session;
        let outcomes = self
            .quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, q)| QuestionOutcome {
                index,
                question_id: q.id.clone(),
                prompt: q.prompt.clone(),
                correct: session.scored.contains(&q.id),
            })
            .collect();

        Ok(QuizSummary::new(
            session.id,
            session.score(),
            self.quiz.total_questions(),
            outcomes,
            session.started_at,
            session.completed_at,
        ))
    }
}
