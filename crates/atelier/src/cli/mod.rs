//! Command-line interface module.

mod commands;
mod run;

pub use commands::{BackendArg, Cli, Commands};
pub use run::run_generation;
