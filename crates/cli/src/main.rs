//! splunk-as - Splunk search, jobs, KV Store and admin skills from the command line.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Install logging, Ctrl-C handling and the error-to-exit-code boundary.
//! - Execute Splunk REST API commands via the shared client library.
//!
//! Does NOT handle:
//! - REST API implementation (see `crates/client`).
//! - Profile file and environment parsing (see `crates/config`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` values are visible to the config loader.
//! - Logs and progress go to stderr; stdout carries only command output.

mod args;
mod cancellation;
mod commands;
mod config_context;
mod dispatch;
mod error;
mod formatters;
mod progress;

use args::Cli;
use cancellation::{CancellationToken, is_cancelled_error, print_cancelled_message};
use clap::Parser;
use config_context::{ConfigCommandContext, load_config};
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use splunk_as_config::ConfigLoader;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const VERBOSE_FILTER: &str = "splunk_as_client=debug,splunk_as_config=debug,splunk_as_cli=debug";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {e}");
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_context = if cli.command.needs_connection() {
        match load_config(&cli) {
            Ok(config) => ConfigCommandContext::Real(Box::new(config)),
            Err(e) => {
                eprintln!("Failed to build configuration: {e:#}");
                std::process::exit(ExitCode::GeneralError.as_i32());
            }
        }
    } else {
        ConfigCommandContext::Placeholder
    };

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {e}");
            return;
        }
        cancel_clone.cancel();
    });

    let exit_code = match run_command(cli, config_context, &cancel).await {
        Ok(()) => ExitCode::Success,
        Err(e) if is_cancelled_error(&e) => {
            print_cancelled_message();
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
