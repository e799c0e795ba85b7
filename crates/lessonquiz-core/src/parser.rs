//! Quiz payload loader.
//!
//! Loads quizzes from the JSON payload the generation backend produces, and
//! lints them for problems that would make a session unplayable.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::{Question, QuestionBody, Quiz};

/// Parse a single JSON file into a `Quiz`.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a JSON string into a `Quiz` (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    serde_json::from_str(content)
        .with_context(|| format!("failed to parse quiz JSON: {}", source_path.display()))
}

/// Recursively load all `.json` quiz files from a directory.
///
/// Unparseable files are skipped with a warning.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<(PathBuf, Quiz)>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push((path, quiz)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// A warning from quiz linting.
#[derive(Debug, Clone)]
pub struct LintWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl LintWarning {
    fn quiz(message: impl Into<String>) -> Self {
        Self {
            question_id: None,
            message: message.into(),
        }
    }

    fn question(question: &Question, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(question.id.to_string()),
            message: message.into(),
        }
    }
}

/// Lint a quiz for common issues.
pub fn lint_quiz(quiz: &Quiz) -> Vec<LintWarning> {
    let mut warnings = Vec::new();

    let missing_id = quiz
        .quiz_id
        .as_deref()
        .map_or(true, |id| id.trim().is_empty());
    if missing_id {
        warnings.push(LintWarning::quiz(
            "quiz_id is missing; pass --quiz-id when playing",
        ));
    }

    if quiz.questions.is_empty() {
        warnings.push(LintWarning::quiz("quiz has no questions"));
    }

    let mut seen_ids = HashSet::new();
    for question in &quiz.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(LintWarning::question(
                question,
                format!("duplicate question ID: {}", question.id),
            ));
        }
    }

    for question in &quiz.questions {
        if question.prompt.trim().is_empty() {
            warnings.push(LintWarning::question(question, "question text is empty"));
        }

        match &question.body {
            QuestionBody::MultipleChoice { options } => {
                if options.len() < 2 {
                    warnings.push(LintWarning::question(
                        question,
                        format!("multiple choice has {} option(s)", options.len()),
                    ));
                }
                if options.len() > 26 {
                    warnings.push(LintWarning::question(
                        question,
                        "more than 26 options cannot be lettered",
                    ));
                }
                let mut seen = HashSet::new();
                if options.iter().any(|o| !seen.insert(o.trim())) {
                    warnings.push(LintWarning::question(question, "duplicate options"));
                }
            }
            QuestionBody::FillInBlank => {}
            QuestionBody::StepByStep { stages } => {
                if stages.is_empty() {
                    warnings.push(LintWarning::question(
                        question,
                        "step-by-step question has no stages",
                    ));
                }
                for (i, stage) in stages.iter().enumerate() {
                    if stage.prompt.trim().is_empty() {
                        warnings.push(LintWarning::question(
                            question,
                            format!("stage {} prompt is empty", i + 1),
                        ));
                    }
                }
            }
        }
    }

    warnings
}
