//! Atelier CLI binary.
//!
//! Runs one generation pass from the command line: classify the input,
//! generate the specification and app code, then any requested educational
//! materials, and write the artifacts to a directory or stdout.

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{run_generation, Cli, Commands};

    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            input,
            backend,
            model,
            api_key,
            lesson_plan,
            handout,
            quiz,
            output,
            show_log,
        } => {
            run_generation(
                &input,
                backend,
                model,
                api_key,
                atelier::MaterialsRequest {
                    lesson_plan,
                    handout,
                    quiz,
                },
                output.as_deref(),
                show_log,
            )
            .await?;
        }
    }

    Ok(())
}
