//! CSV formatter implementation.
//!
//! Invariants:
//! - Output follows RFC 4180 (quoting handled by the `csv` crate).
//! - Nested structures are flattened using dot notation.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::formatters::Formatter;
use crate::formatters::common::{project_rows, resolve_columns};

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_rows(&self, rows: &[Value], columns: &[&str]) -> Result<String> {
        let columns = resolve_columns(rows, columns);
        if columns.is_empty() {
            return Ok(String::new());
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&columns)?;
        for row in project_rows(rows, &columns) {
            writer.write_record(&row)?;
        }

        let bytes = writer.into_inner().context("Failed to flush CSV output")?;
        Ok(String::from_utf8(bytes)?)
    }

    fn format_record(&self, record: &Value) -> Result<String> {
        self.format_rows(std::slice::from_ref(record), &[])
    }
}
