//! The `lessonquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("lessonquiz.toml").exists() {
        println!("lessonquiz.toml already exists, skipping.");
    } else {
        std::fs::write("lessonquiz.toml", SAMPLE_CONFIG)?;
        println!("Created lessonquiz.toml");
    }

    std::fs::create_dir_all("quizzes")?;
    let example_path = std::path::Path::new("quizzes/example.json");
    if example_path.exists() {
        println!("quizzes/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Point lessonquiz.toml at your lesson backend");
    println!("  2. Run: lessonquiz validate --quiz quizzes/example.json");
    println!("  3. Run: lessonquiz play --quiz quizzes/example.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lessonquiz configuration

[validator]
base_url = "http://localhost:5000"
timeout_secs = 30
"#;

const EXAMPLE_QUIZ: &str = r#"{
  "quiz_id": "example",
  "questions": [
    {
      "id": 1,
      "type": "multiple-choice",
      "question_text": "What is the derivative of x^2?",
      "options": ["x", "2x", "x^2", "2"]
    },
    {
      "id": 2,
      "type": "fill-in-blank",
      "question_text": "The slope of a tangent line is given by the ___."
    },
    {
      "id": 3,
      "type": "step-by-step",
      "question_text": "Solve 2x + 3 = 11",
      "stages": [
        { "prompt": "Subtract 3 from both sides", "hint": "11 - 3" },
        { "prompt": "Divide both sides by 2" }
      ]
    }
  ]
}
"#;
