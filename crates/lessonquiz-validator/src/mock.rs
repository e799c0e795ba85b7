//! Mock validator for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use lessonquiz_core::error::ValidatorError;
use lessonquiz_core::traits::{AnswerValidator, ValidationRequest, Verdict};

/// One scripted validator reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Verdict(Verdict),
    /// Fail as if the transport broke.
    Fail(String),
    /// Never answer; exercises the engine's timeout.
    Hang,
}

/// A mock validator for driving the engine without a backend.
///
/// Replies come from a queue first; once it is drained, answers are judged
/// against the answer key (case-insensitive, trimmed). Anything not in the
/// key is incorrect.
pub struct MockValidator {
    /// Replies consumed in order before the answer key is consulted.
    script: Mutex<VecDeque<MockReply>>,
    /// Map of `(question id, stage number)` → accepted answer.
    answer_key: HashMap<(String, Option<u32>), String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Every request received, in order.
    requests: Mutex<Vec<ValidationRequest>>,
}

impl MockValidator {
    /// Create a mock that judges against `answer_key` only.
    pub fn new(answer_key: HashMap<(String, Option<u32>), String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            answer_key,
            call_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that replays `replies` in order.
    pub fn scripted(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let mock = Self::new(HashMap::new());
        mock.push_replies(replies);
        mock
    }

    /// Shorthand: `true` → correct, `false` → incorrect.
    pub fn with_outcomes(outcomes: &[bool]) -> Self {
        Self::scripted(outcomes.iter().map(|&correct| {
            MockReply::Verdict(if correct {
                Verdict::correct("Correct!")
            } else {
                Verdict::incorrect("Not quite right.")
            })
        }))
    }

    /// Append more scripted replies.
    pub fn push_replies(&self, replies: impl IntoIterator<Item = MockReply>) {
        self.lock_script().extend(replies);
    }

    /// Get the number of calls made to this validator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this validator.
    pub fn last_request(&self) -> Option<ValidationRequest> {
        self.requests().pop()
    }

    /// All requests made to this validator, in order.
    pub fn requests(&self) -> Vec<ValidationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<MockReply>> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn judge(&self, request: &ValidationRequest) -> Verdict {
        let key = (request.question_id.to_string(), request.stage_number);
        match self.answer_key.get(&key) {
            Some(expected) if expected.trim().eq_ignore_ascii_case(request.user_answer.trim()) => {
                Verdict::correct(format!("Yes, the answer is {expected}."))
            }
            Some(_) => Verdict::incorrect("That is not the expected answer."),
            None => Verdict::incorrect("No answer on file for this question."),
        }
    }
}

#[async_trait]
impl AnswerValidator for MockValidator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn validate(&self, request: &ValidationRequest) -> anyhow::Result<Verdict> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let reply = self.lock_script().pop_front();
        match reply {
            Some(MockReply::Verdict(verdict)) => Ok(verdict),
            Some(MockReply::Fail(message)) => Err(ValidatorError::Network(message).into()),
            Some(MockReply::Hang) => loop {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            },
            None => Ok(self.judge(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonquiz_core::model::QuestionId;

    fn request(question: u64, stage: Option<u32>, answer: &str) -> ValidationRequest {
        ValidationRequest {
            quiz_id: "mock".into(),
            question_id: QuestionId::Number(question),
            stage_number: stage,
            user_answer: answer.into(),
        }
    }

    #[tokio::test]
    async fn scripted_replies_then_key() {
        let mut key = HashMap::new();
        key.insert(("1".to_string(), None), "Paris".to_string());
        let mock = MockValidator::new(key);
        mock.push_replies([MockReply::Fail("boom".into())]);

        let err = mock.validate(&request(1, None, "Paris")).await.unwrap_err();
        assert!(err.to_string().contains("boom"));

        let verdict = mock.validate(&request(1, None, " paris ")).await.unwrap();
        assert!(verdict.correct);

        let verdict = mock.validate(&request(1, None, "Lyon")).await.unwrap();
        assert!(!verdict.correct);
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.last_request().unwrap().user_answer, "Lyon");
    }

    #[tokio::test]
    async fn stage_answers_are_keyed_by_stage_number() {
        let mut key = HashMap::new();
        key.insert(("7".to_string(), Some(1)), "2x = 8".to_string());
        key.insert(("7".to_string(), Some(2)), "x = 4".to_string());
        let mock = MockValidator::new(key);

        assert!(mock.validate(&request(7, Some(1), "2x = 8")).await.unwrap().correct);
        assert!(!mock.validate(&request(7, Some(1), "x = 4")).await.unwrap().correct);
        assert!(mock.validate(&request(7, Some(2), "x = 4")).await.unwrap().correct);
    }

    #[tokio::test]
    async fn outcomes_shorthand() {
        let mock = MockValidator::with_outcomes(&[false, true]);
        assert!(!mock.validate(&request(1, None, "a")).await.unwrap().correct);
        assert!(mock.validate(&request(1, None, "a")).await.unwrap().correct);
        assert_eq!(mock.requests().len(), 2);
    }
}
