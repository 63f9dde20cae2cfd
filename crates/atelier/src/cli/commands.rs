//! CLI command definitions.

use atelier::Protocol;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Atelier - Interactive learning app generation from a video link or topic
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(about = "Generate an interactive learning app from a video link or topic", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one generation pass over a video link, a topic, or both
    Run {
        /// Video URL and/or topic text seeding the run
        input: String,

        /// Generation backend to use
        #[arg(short, long, default_value = "gemini")]
        backend: BackendArg,

        /// Model identifier (defaults to the backend's default model)
        #[arg(short, long)]
        model: Option<String>,

        /// API key (or use OPENROUTER_API_KEY / GEMINI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Also generate a classroom lesson plan
        #[arg(long)]
        lesson_plan: bool,

        /// Also generate a one-page student handout
        #[arg(long)]
        handout: bool,

        /// Also generate a short review quiz
        #[arg(long)]
        quiz: bool,

        /// Directory to write artifacts into (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the interaction log after the run
        #[arg(long)]
        show_log: bool,
    },
}

/// Backend selection argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// Multimodal-generation protocol (Gemini-compatible)
    Gemini,
    /// Chat-completion protocol (OpenRouter-compatible)
    Openrouter,
}

impl From<BackendArg> for Protocol {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Gemini => Protocol::Gemini,
            BackendArg::Openrouter => Protocol::OpenRouter,
        }
    }
}
