//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Declare the global connection and output flags shared by every subcommand.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not load configuration (see `main`; env vars are read by the config crate).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::formatters::OutputFormat;

#[derive(Parser)]
#[command(name = "splunk-as")]
#[command(about = "Splunk Assistant Skills - search, jobs, KV Store and admin from the command line", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  splunk-as search oneshot 'index=main | stats count by host'\n  splunk-as job create 'index=web error' --earliest -1h\n  splunk-as job poll 1703779200.12345 --timeout 600\n  splunk-as -p prod export results 1703779200.12345 --output-file errors.csv\n  splunk-as -o json kvstore query asset_inventory --query '{\"env\":\"prod\"}'\n"
)]
pub struct Cli {
    /// Profile name to load from the config file
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Base URL of the Splunk server (e.g., https://localhost:8089)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to the profile file (overrides SPLUNK_AS_CONFIG_PATH and the default location)
    #[arg(long, global = true, value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Write command output to a file instead of stdout
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Log requests, retries and polls to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress progress bars and spinners
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run searches and read job results
    Search {
        #[command(subcommand)]
        command: commands::search::SearchCommand,
    },

    /// Create, inspect and control search jobs
    Job {
        #[command(subcommand)]
        command: commands::job::JobCommand,
    },

    /// Export large result sets with checkpoint and resume
    Export {
        #[command(subcommand)]
        command: commands::export::ExportCommand,
    },

    /// Manage KV Store collections and records
    Kvstore {
        #[command(subcommand)]
        command: commands::kvstore::KvstoreCommand,
    },

    /// List, create and acknowledge alerts
    Alert {
        #[command(subcommand)]
        command: commands::alert::AlertCommand,
    },

    /// Manage saved searches
    #[command(name = "savedsearch")]
    SavedSearch {
        #[command(subcommand)]
        command: commands::saved_search::SavedSearchCommand,
    },

    /// Discover indexes, sourcetypes and sources
    Metadata {
        #[command(subcommand)]
        command: commands::metadata::MetadataCommand,
    },

    /// Metric indexes, metric names and mstats queries
    Metrics {
        #[command(subcommand)]
        command: commands::metrics::MetricsCommand,
    },

    /// Tag field values and search by tag
    Tag {
        #[command(subcommand)]
        command: commands::tag::TagCommand,
    },

    /// Manage installed apps
    App {
        #[command(subcommand)]
        command: commands::app::AppCommand,
    },

    /// Manage lookup table files
    Lookup {
        #[command(subcommand)]
        command: commands::lookup::LookupCommand,
    },

    /// Users, roles, capabilities, tokens and ACLs
    Security {
        #[command(subcommand)]
        command: commands::security::SecurityCommand,
    },

    /// Server info, health and raw REST access
    Admin {
        #[command(subcommand)]
        command: commands::admin::AdminCommand,
    },
}

impl Commands {
    /// Whether the command talks to Splunk and therefore needs a complete configuration.
    pub fn needs_connection(&self) -> bool {
        !matches!(
            self,
            Commands::Search {
                command: commands::search::SearchCommand::Validate { .. },
            }
        )
    }
}
