//! Subcommand handlers.

mod hero;
mod project;
mod prompt;
mod scan;

use anyhow::Result;
use folio_core::FolioConfig;

use crate::cli::Command;

/// Dispatch one parsed command.
pub async fn run(command: Command, config: &FolioConfig) -> Result<()> {
    match command {
        Command::Scan(args) => scan::run(args, config).await,
        Command::Prompt(cmd) => prompt::run(cmd, config),
        Command::Project(cmd) => project::run(cmd, config).await,
        Command::Hero(cmd) => hero::run(&cmd, config),
    }
}
