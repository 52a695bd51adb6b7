//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the command module for each skill group.
//! - Build the one [`Session`] every connected command shares.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `config_context`).

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::cancellation::CancellationToken;
use crate::commands::{self, Output, Session, search::SearchCommand};
use crate::config_context::ConfigCommandContext;

pub(crate) async fn run_command(
    cli: Cli,
    config: ConfigCommandContext,
    cancel_token: &CancellationToken,
) -> Result<()> {
    let output = Output {
        format: cli.output,
        file: cli.output_file,
    };

    if let Commands::Search {
        command: SearchCommand::Validate { query },
    } = &cli.command
    {
        return commands::search::validate(&output, query);
    }

    let config = config.into_real_config()?;
    let session = Session::connect(&config, output, !cli.quiet, cancel_token.clone())?;

    match cli.command {
        Commands::Search { command } => commands::search::run(&session, command).await,
        Commands::Job { command } => commands::job::run(&session, command).await,
        Commands::Export { command } => commands::export::run(&session, command).await,
        Commands::Kvstore { command } => commands::kvstore::run(&session, command).await,
        Commands::Alert { command } => commands::alert::run(&session, command).await,
        Commands::SavedSearch { command } => commands::saved_search::run(&session, command).await,
        Commands::Metadata { command } => commands::metadata::run(&session, command).await,
        Commands::Metrics { command } => commands::metrics::run(&session, command).await,
        Commands::Tag { command } => commands::tag::run(&session, command).await,
        Commands::App { command } => commands::app::run(&session, command).await,
        Commands::Lookup { command } => commands::lookup::run(&session, command).await,
        Commands::Security { command } => commands::security::run(&session, command).await,
        Commands::Admin { command } => commands::admin::run(&session, command).await,
    }
}
