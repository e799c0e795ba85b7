//! Terminal rendering of engine state.

use std::io::{self, Write};

use comfy_table::{Cell, Table};

use lessonquiz_core::model::{option_letter, Question, QuestionBody, QuestionKind};
use lessonquiz_core::results::QuizSummary;
use lessonquiz_core::tracker::{AnswerKey, StageStatus};
use lessonquiz_core::{QuizEngine, Verdict};

const BAR_WIDTH: usize = 20;

/// Start screen shown before the first question.
pub fn intro(engine: &QuizEngine, out: &mut impl Write) -> io::Result<()> {
    let quiz = engine.quiz();
    let mut info = vec![format!("{} questions", quiz.total_questions())];
    if quiz
        .questions
        .iter()
        .any(|q| q.kind() == QuestionKind::StepByStep)
    {
        info.push("Sequential stages".to_string());
    }
    if quiz
        .questions
        .iter()
        .flat_map(Question::stages)
        .any(|stage| stage.hint.is_some())
    {
        info.push("Hints available".to_string());
    }

    writeln!(out, "Test Your Knowledge!")?;
    writeln!(out, "{}", info.join(" | "))?;
    writeln!(out, "Type 'quit' to leave at any time.")
}

/// Header line with position, score, and a progress bar.
pub fn progress(engine: &QuizEngine, out: &mut impl Write) -> io::Result<()> {
    let snapshot = engine.snapshot();
    let filled = (snapshot.progress * BAR_WIDTH as f64).round() as usize;
    writeln!(
        out,
        "\n{} | {} [{}{}] {}%",
        snapshot.progress_label(),
        snapshot.score_label(),
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
        snapshot.progress_percent()
    )
}

/// The current question with its options or stages.
pub fn question(engine: &QuizEngine, out: &mut impl Write) -> io::Result<()> {
    let Some(question) = engine.current_question() else {
        return Ok(());
    };
    writeln!(out, "[{}] {}", question.kind(), question.prompt)?;

    match &question.body {
        QuestionBody::MultipleChoice { options } => {
            for (i, option) in options.iter().enumerate() {
                let letter = option_letter(i).unwrap_or('?');
                writeln!(out, "  {letter}) {option}")?;
            }
            writeln!(out, "Choose a letter:")
        }
        QuestionBody::FillInBlank => {
            writeln!(out, "Type your answer (synonyms may be accepted):")
        }
        QuestionBody::StepByStep { stages } => stages_view(engine, question, stages.len(), out),
    }
}

fn stages_view(
    engine: &QuizEngine,
    question: &Question,
    stage_count: usize,
    out: &mut impl Write,
) -> io::Result<()> {
    let snapshot = engine.snapshot();
    for (i, stage) in question.stages().iter().enumerate() {
        match engine.stage_status(i) {
            Some(StageStatus::Completed) => {
                let answer = engine
                    .recorded_answer(&AnswerKey::Stage(question.id.clone(), i))
                    .unwrap_or_default();
                writeln!(out, "  [x] Step {}: {}", i + 1, stage.prompt)?;
                writeln!(out, "      Your answer: {answer}")?;
            }
            Some(StageStatus::Current) => {
                writeln!(out, "  [>] Step {}: {}", i + 1, stage.prompt)?;
                if stage.hint.is_some() {
                    writeln!(out, "      (type 'hint' for a hint)")?;
                }
            }
            Some(StageStatus::Locked) | None => {
                writeln!(out, "  [ ] Step {}: complete previous steps first", i + 1)?;
            }
        }
    }
    writeln!(
        out,
        "Stage {} of {}. Enter your answer exactly as it appears (e.g. \"x = 4\"):",
        snapshot.current_stage_index + 1,
        stage_count
    )
}

/// Verdict panel shown after a submission.
pub fn feedback(verdict: &Verdict, out: &mut impl Write) -> io::Result<()> {
    let (title, action) = if verdict.correct {
        ("Correct!", "Press Enter for the next step.")
    } else {
        ("Not quite right", "Press Enter to try again.")
    };
    writeln!(out, "{title}")?;
    if !verdict.explanation.is_empty() {
        writeln!(out, "{}", verdict.explanation)?;
    }
    writeln!(out, "{action}")
}

/// Final results with a per-question table.
pub fn summary(summary: &QuizSummary, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\nQuiz Complete!")?;
    writeln!(
        out,
        "{}% - {} - {}",
        summary.percentage,
        summary.headline(),
        summary.standing
    )?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Result"]);
    for outcome in &summary.outcomes {
        table.add_row(vec![
            Cell::new(format!("Q{}", outcome.index + 1)),
            Cell::new(&outcome.prompt),
            Cell::new(if outcome.correct { "correct" } else { "missed" }),
        ]);
    }
    writeln!(out, "{table}")?;

    if let Some(elapsed) = summary.elapsed() {
        writeln!(out, "Time: {}s", elapsed.num_seconds())?;
    }
    Ok(())
}
