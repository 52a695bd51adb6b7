//! Text formatter implementation.
//!
//! Lists are tab-separated with a header row; single records are printed
//! as aligned key and value columns in key order.

use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::formatters::Formatter;
use crate::formatters::common::{flatten_json_object, project_rows, resolve_columns};

/// Human-readable text formatter.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_rows(&self, rows: &[Value], columns: &[&str]) -> Result<String> {
        if rows.is_empty() {
            return Ok("No results found.\n".to_string());
        }

        let columns = resolve_columns(rows, columns);
        let mut output = columns.join("\t");
        output.push('\n');

        for row in project_rows(rows, &columns) {
            output.push_str(&row.join("\t"));
            output.push('\n');
        }
        Ok(output)
    }

    fn format_record(&self, record: &Value) -> Result<String> {
        let mut flat = BTreeMap::new();
        flatten_json_object(record, "", &mut flat);

        let width = flat.keys().map(String::len).max().unwrap_or(0);
        let mut output = String::new();
        for (key, value) in flat {
            output.push_str(&format!("{key:<width$}  {value}\n"));
        }
        Ok(output)
    }
}
