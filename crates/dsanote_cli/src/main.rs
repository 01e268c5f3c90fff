//! dsanote command-line entry point.
//!
//! # Responsibility
//! - Parse flags, start optional file logging and dispatch one command.
//! - Map failures to `error:`/`warning:` lines and exit codes.

mod cli;
mod commands;
mod config;

use clap::Parser;
use cli::Cli;
use config::AppConfig;
use dsanote_core::{init_logging, OrganizerError};
use log::{error, info};
use std::process::ExitCode;

/// Exit code for input the user can correct (blank name, empty selection).
const EXIT_VALIDATION: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);

    if let Some(log) = &config.log {
        if let Err(err) = init_logging(&log.level, &log.dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }
    info!(
        "event=cli_start module=cli status=start db={}",
        config.db_path.display()
    );

    match commands::run(cli.command, &config) {
        Ok(()) => {
            info!("event=cli_exit module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => report(&err),
    }
}

fn report(err: &anyhow::Error) -> ExitCode {
    if let Some(organizer_err) = err.downcast_ref::<OrganizerError>() {
        if organizer_err.is_validation() {
            eprintln!("warning: {organizer_err}");
            return ExitCode::from(EXIT_VALIDATION);
        }
    }
    let message = describe(err);
    error!("event=cli_exit module=cli status=error error={message}");
    eprintln!("error: {message}");
    ExitCode::FAILURE
}

/// Joins the cause chain, skipping causes already spelled out by their wrapper.
fn describe(err: &anyhow::Error) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in err.chain() {
        let message = cause.to_string();
        if parts.last().map_or(true, |last| !last.ends_with(&message)) {
            parts.push(message);
        }
    }
    parts.join(": ")
}
