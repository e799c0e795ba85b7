//! lessonquiz CLI — play and check lesson quizzes from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "lessonquiz", version, about = "Interactive lesson quiz player")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz in the terminal
    Play {
        /// Path to a quiz JSON payload
        #[arg(long)]
        quiz: PathBuf,

        /// Quiz id sent to the validator (overrides the payload's quiz_id)
        #[arg(long)]
        quiz_id: Option<String>,

        /// Base URL of the validation backend
        #[arg(long)]
        validator_url: Option<String>,

        /// Seconds before a validation is abandoned and judged incorrect
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Print a JSON snapshot of the session after every step
        #[arg(long)]
        json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check quiz JSON files for problems
    Validate {
        /// Path to a quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Create starter config and example quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lessonquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            quiz,
            quiz_id,
            validator_url,
            timeout_secs,
            json,
            config,
        } => {
            commands::play::execute(commands::play::PlayArgs {
                quiz_path: quiz,
                quiz_id,
                validator_url,
                timeout_secs,
                json,
                config_path: config,
            })
            .await
        }
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
