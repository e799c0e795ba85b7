//! The `lessonquiz play` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use lessonquiz_core::model::{option_index, Question, QuestionBody};
use lessonquiz_core::parser;
use lessonquiz_core::{EngineConfig, EngineError, Phase, QuizEngine};
use lessonquiz_validator::config::{create_validator, load_config_from};

use crate::render;

pub struct PlayArgs {
    pub quiz_path: PathBuf,
    pub quiz_id: Option<String>,
    pub validator_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub json: bool,
    pub config_path: Option<PathBuf>,
}

pub async fn execute(args: PlayArgs) -> Result<()> {
    let mut config = load_config_from(args.config_path.as_deref())?;
    if let Some(url) = args.validator_url {
        config.validator.base_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        anyhow::ensure!(secs >= 1, "timeout must be at least 1 second");
        config.validator.timeout_secs = secs;
    }

    let mut quiz = parser::parse_quiz(&args.quiz_path)?;
    if let Some(id) = args.quiz_id {
        quiz.quiz_id = Some(id);
    }
    for warning in parser::lint_quiz(&quiz) {
        tracing::warn!("{}", warning.message);
    }

    let validator = Arc::new(create_validator(&config.validator)?);
    let engine_config = EngineConfig {
        validation_timeout: config.validator.timeout(),
    };
    let mut engine = QuizEngine::new(quiz, validator, engine_config)
        .with_context(|| format!("cannot play {}", args.quiz_path.display()))?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(&mut engine, stdin.lock(), stdout.lock(), args.json).await
}

/// Drive one or more sessions from line-oriented input until the learner
/// quits, declines a retake, or input ends.
pub async fn run_session(
    engine: &mut QuizEngine,
    mut input: impl BufRead,
    mut out: impl Write,
    json: bool,
) -> Result<()> {
    anyhow::ensure!(
        engine.quiz().total_questions() > 0,
        "quiz has no questions to play"
    );
    render::intro(engine, &mut out)?;
    engine.start()?;

    loop {
        if json {
            writeln!(out, "{}", serde_json::to_string(&engine.snapshot())?)?;
        }

        match engine.phase() {
            Phase::NotStarted => engine.start()?,
            Phase::InProgress => {
                render::progress(engine, &mut out)?;
                render::question(engine, &mut out)?;
                out.flush()?;

                let Some(line) = read_line(&mut input)? else {
                    return Ok(());
                };
                let line = line.trim();
                match line {
                    "quit" | "exit" => return Ok(()),
                    "hint" => {
                        let hint = engine.current_stage().and_then(|s| s.hint.as_deref());
                        writeln!(out, "Hint: {}", hint.unwrap_or("no hint for this step"))?;
                        continue;
                    }
                    _ => {}
                }

                let Some(question) = engine.current_question() else {
                    writeln!(out, "There is no question to answer.")?;
                    return Ok(());
                };
                let Some(answer) = answer_for(question, line) else {
                    writeln!(out, "Please choose one of the listed letters.")?;
                    continue;
                };

                writeln!(out, "Checking...")?;
                out.flush()?;
                match engine.submit(&answer).await {
                    Ok(_) => {}
                    Err(EngineError::EmptyAnswer) => {
                        writeln!(out, "Please enter an answer.")?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Phase::ShowingFeedback => {
                if let Some(verdict) = engine.pending_feedback() {
                    render::feedback(verdict, &mut out)?;
                }
                out.flush()?;
                if read_line(&mut input)?.is_none() {
                    return Ok(());
                }
                engine.next()?;
            }
            Phase::Complete => {
                render::summary(&engine.summary()?, &mut out)?;
                writeln!(out, "Retake the quiz? [y/N]")?;
                out.flush()?;
                match read_line(&mut input)? {
                    Some(line) if line.trim().eq_ignore_ascii_case("y") => engine.retake()?,
                    _ => return Ok(()),
                }
            }
        }
    }
}

/// Map raw input to the answer sent to the validator.
///
/// Multiple choice accepts a letter or the exact option text and submits the
/// option text; `None` means the input matched no option. Other kinds pass
/// the input through.
fn answer_for(question: &Question, line: &str) -> Option<String> {
    match &question.body {
        QuestionBody::MultipleChoice { options } => {
            if line.is_empty() {
                return Some(String::new());
            }
            let mut chars = line.chars();
            let by_letter = match (chars.next(), chars.next()) {
                (Some(c), None) => option_index(c).and_then(|i| options.get(i)),
                _ => None,
            };
            by_letter
                .or_else(|| options.iter().find(|o| o.trim().eq_ignore_ascii_case(line)))
                .cloned()
        }
        QuestionBody::FillInBlank | QuestionBody::StepByStep { .. } => Some(line.to_string()),
    }
}

fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    Ok((read > 0).then_some(line))
}
