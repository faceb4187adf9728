//! `folio`: command-line front end for the portfolio engine.

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]

mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use folio_core::FolioConfig;
use tracing::error;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = FolioConfig::load(cli.config.as_deref());
    let general = loaded.as_ref().map(|c| c.general.clone()).unwrap_or_default();
    logging::init(&general, cli.verbose);

    let result = match loaded.context("loading configuration") {
        Ok(config) => commands::run(cli.command, &config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
