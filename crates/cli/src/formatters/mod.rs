//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide the three output formats: text, JSON and CSV.
//! - Render lists of records and single records from `serde_json::Value`.
//! - Route formatted output to stdout or an output file.
//!
//! Does NOT handle:
//! - Converting client models into values (each command does that with serde).
//! - Progress or diagnostics (always on stderr, see `progress`).
//!
//! ## Empty-State Handling
//!
//! | Format | Empty State Behavior |
//! |--------|---------------------|
//! | JSON | `[]` |
//! | CSV | Header row when columns are known, otherwise nothing |
//! | Text | `No results found.` |
//!
//! Nested objects and arrays are flattened to dot-notation keys for CSV
//! and text output (`user.name`, `tags.0`).

use anyhow::Result;
use clap::ValueEnum;
use serde_json::Value;

mod common;
mod csv;
mod json;
mod text;


pub use common::{output_result, write_to_file};
pub use self::csv::CsvFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated columns for lists, aligned key/value lines for single records
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// RFC 4180 CSV with flattened keys
    Csv,
}

/// Formatter trait implemented once per output format.
pub trait Formatter {
    /// Format a list of records.
    ///
    /// `columns` selects and orders the fields shown by tabular formats;
    /// an empty slice means every field, sorted by name. JSON output
    /// always carries the full records.
    fn format_rows(&self, rows: &[Value], columns: &[&str]) -> Result<String>;

    /// Format a single record.
    fn format_record(&self, record: &Value) -> Result<String>;
}

/// Get a formatter for the specified format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}
