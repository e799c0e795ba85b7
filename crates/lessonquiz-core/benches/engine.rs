use std::sync::Arc;

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lessonquiz_core::model::{Question, Quiz, Stage};
use lessonquiz_core::scoring::{awards_point, ScoringInput};
use lessonquiz_core::{AnswerValidator, EngineConfig, QuestionKind, QuizEngine, ValidationRequest, Verdict};

/// Transitions are driven through `begin_submit`/`resolve`, so the
/// validator is never awaited.
struct Unused;

#[async_trait]
impl AnswerValidator for Unused {
    fn name(&self) -> &str {
        "unused"
    }

    async fn validate(&self, _: &ValidationRequest) -> anyhow::Result<Verdict> {
        anyhow::bail!("not called in benchmarks")
    }
}

fn make_quiz(questions: u64) -> Quiz {
    let questions = (0..questions)
        .map(|i| match i % 3 {
            0 => Question::multiple_choice(i, "Pick one", vec!["a".into(), "b".into(), "c".into()]),
            1 => Question::fill_in_blank(i, "Fill the blank"),
            _ => Question::step_by_step(
                i,
                "Solve",
                (0..4).map(|s| Stage::new(format!("stage {s}"))).collect(),
            ),
        })
        .collect();
    Quiz::new("bench", questions)
}

fn run_session(engine: &mut QuizEngine, wrong_first: bool) {
    engine.start().unwrap();
    while engine.phase() != lessonquiz_core::Phase::Complete {
        if wrong_first {
            engine.begin_submit("nope").unwrap();
            engine.resolve(Ok(Verdict::incorrect("no"))).unwrap();
            engine.next().unwrap();
        }
        engine.begin_submit("yes").unwrap();
        engine.resolve(Ok(Verdict::correct("ok"))).unwrap();
        engine.next().unwrap();
    }
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    for size in [10u64, 100, 1000] {
        group.bench_function(format!("all_correct/{size}"), |b| {
            b.iter(|| {
                let mut engine =
                    QuizEngine::new(make_quiz(size), Arc::new(Unused), EngineConfig::default())
                        .unwrap();
                run_session(&mut engine, false);
                black_box(engine.score())
            })
        });
    }

    group.bench_function("retry_each_unit/100", |b| {
        b.iter(|| {
            let mut engine =
                QuizEngine::new(make_quiz(100), Arc::new(Unused), EngineConfig::default()).unwrap();
            run_session(&mut engine, true);
            black_box(engine.snapshot())
        })
    });

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    c.bench_function("awards_point/final_stage", |b| {
        b.iter(|| {
            awards_point(black_box(ScoringInput {
                kind: QuestionKind::StepByStep,
                is_correct: true,
                stage_index: 3,
                total_stages: 4,
                already_scored: false,
            }))
        })
    });
}

criterion_group!(benches, bench_session, bench_scoring);
criterion_main!(benches);
