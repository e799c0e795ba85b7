//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn lessonquiz() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("lessonquiz").unwrap();
    cmd.env_remove("LESSONQUIZ_VALIDATOR_URL");
    cmd
}

#[test]
fn validate_photosynthesis_quiz() {
    lessonquiz()
        .arg("validate")
        .arg("--quiz")
        .arg("../../quizzes/photosynthesis.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions, 3 steps"))
        .stdout(predicate::str::contains("All quizzes valid."));
}

#[test]
fn validate_step_by_step_quiz() {
    lessonquiz()
        .arg("validate")
        .arg("--quiz")
        .arg("../../quizzes/linear-equations.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions, 6 steps"));
}

#[test]
fn validate_directory() {
    lessonquiz()
        .arg("validate")
        .arg("--quiz")
        .arg("../../quizzes")
        .assert()
        .success()
        .stdout(predicate::str::contains("linear-equations.json"))
        .stdout(predicate::str::contains("photosynthesis.json"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let quiz = dir.path().join("broken.json");
    std::fs::write(
        &quiz,
        r#"{"questions": [
            {"id": 1, "type": "multiple-choice", "question_text": "Pick", "options": ["only"]},
            {"id": 1, "type": "fill-in-blank", "question_text": "Again"}
        ]}"#,
    )
    .unwrap();

    lessonquiz()
        .arg("validate")
        .arg("--quiz")
        .arg(&quiz)
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("warning(s) found."));
}

#[test]
fn validate_nonexistent_file() {
    lessonquiz()
        .arg("validate")
        .arg("--quiz")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    lessonquiz()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created lessonquiz.toml"))
        .stdout(predicate::str::contains("Created quizzes/example.json"));

    assert!(dir.path().join("lessonquiz.toml").exists());
    assert!(dir.path().join("quizzes/example.json").exists());

    lessonquiz()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--quiz")
        .arg("quizzes/example.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("All quizzes valid."));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    lessonquiz()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    lessonquiz()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn play_requires_quiz_id() {
    let dir = TempDir::new().unwrap();
    let quiz = dir.path().join("anonymous.json");
    std::fs::write(
        &quiz,
        r#"{"questions": [{"id": 1, "type": "fill-in-blank", "question_text": "2 + 2 = ___"}]}"#,
    )
    .unwrap();

    lessonquiz()
        .current_dir(dir.path())
        .arg("play")
        .arg("--quiz")
        .arg(&quiz)
        .write_stdin("4\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("quiz_id"));
}

#[test]
fn play_refuses_empty_quiz() {
    let dir = TempDir::new().unwrap();
    let quiz = dir.path().join("empty.json");
    std::fs::write(&quiz, r#"{"quiz_id": "empty", "questions": []}"#).unwrap();

    lessonquiz()
        .current_dir(dir.path())
        .arg("play")
        .arg("--quiz")
        .arg(&quiz)
        .write_stdin("a\nb\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Please choose").not())
        .stderr(predicate::str::contains("no questions"));
}

#[test]
fn play_refuses_duplicate_question_ids() {
    let dir = TempDir::new().unwrap();
    let quiz = dir.path().join("dupes.json");
    std::fs::write(
        &quiz,
        r#"{"quiz_id": "dupes", "questions": [
            {"id": 1, "type": "step-by-step", "question_text": "A", "stages": [{"prompt": "a"}]},
            {"id": 1, "type": "step-by-step", "question_text": "B", "stages": [{"prompt": "b"}]}
        ]}"#,
    )
    .unwrap();

    lessonquiz()
        .current_dir(dir.path())
        .arg("play")
        .arg("--quiz")
        .arg(&quiz)
        .write_stdin("x\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate question id: 1"));
}

#[test]
fn play_rejects_zero_timeout() {
    lessonquiz()
        .arg("play")
        .arg("--quiz")
        .arg("../../quizzes/photosynthesis.json")
        .arg("--timeout-secs")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout"));
}

#[tokio::test(flavor = "multi_thread")]
async fn play_against_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/quiz/validate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"correct": true, "explanation": "Well done."})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let url = server.uri();
    let assert = tokio::task::spawn_blocking(move || {
        lessonquiz()
            .arg("play")
            .arg("--quiz")
            .arg("../../quizzes/photosynthesis.json")
            .arg("--validator-url")
            .arg(url)
            .write_stdin("B\n\nOxygen\n\nC\n\nn\n")
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Question 1 of 3"))
        .stdout(predicate::str::contains("Well done."))
        .stdout(predicate::str::contains("Quiz Complete!"))
        .stdout(predicate::str::contains(
            "100% - 3 out of 3 correct - Excellent work!",
        ));

    let requests = server.received_requests().await.unwrap();
    let first: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(first["quiz_id"], "photosynthesis-101");
    assert_eq!(first["question_id"], 1);
    assert_eq!(first["user_answer"], "Chloroplast");
    assert!(first.get("stage_number").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn play_with_unavailable_backend_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/quiz/validate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let url = server.uri();
    let assert = tokio::task::spawn_blocking(move || {
        lessonquiz()
            .arg("play")
            .arg("--quiz")
            .arg("../../quizzes/photosynthesis.json")
            .arg("--validator-url")
            .arg(url)
            .write_stdin("B\n\nquit\n")
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Error validating answer"))
        .stdout(predicate::str::contains("Score: 0/3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn play_json_snapshots() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"correct": false})))
        .mount(&server)
        .await;

    let url = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        lessonquiz()
            .arg("play")
            .arg("--quiz")
            .arg("../../quizzes/linear-equations.json")
            .arg("--validator-url")
            .arg(url)
            .arg("--json")
            .write_stdin("x = 4\nquit\n")
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let snapshots: Vec<serde_json::Value> = stdout
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(snapshots[0]["phase"], "in_progress");
    assert_eq!(snapshots[0]["total_units"], 6);
    assert_eq!(snapshots[1]["phase"], "showing_feedback");
    assert_eq!(snapshots[1]["pending_feedback"]["correct"], false);
    assert_eq!(snapshots[1]["score"], 0);
}

#[test]
fn help_output() {
    lessonquiz()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Interactive lesson quiz player"));
}

#[test]
fn version_output() {
    lessonquiz()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lessonquiz"));
}
