//! JSON formatter implementation.
//!
//! Always emits the complete records; column selection only applies to
//! the tabular formats.

use anyhow::Result;
use serde_json::Value;

use crate::formatters::Formatter;

/// Pretty-printed JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_rows(&self, rows: &[Value], _columns: &[&str]) -> Result<String> {
        Ok(format!("{}\n", serde_json::to_string_pretty(rows)?))
    }

    fn format_record(&self, record: &Value) -> Result<String> {
        Ok(format!("{}\n", serde_json::to_string_pretty(record)?))
    }
}
