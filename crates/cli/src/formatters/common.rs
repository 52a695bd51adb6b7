//! Common utilities for formatters.
//!
//! Responsibilities:
//! - JSON flattening for CSV and text output.
//! - Column selection shared by the tabular formats.
//! - Atomic file writing.
//!
//! Does NOT handle:
//! - Format-specific layout (lives in the respective formatter modules).

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::formatters::OutputFormat;

/// Flatten a JSON value into a map of dot-notation keys to string values.
///
/// # Flattening Rules
/// - Primitive values (string, number, bool, null): stored with string conversion
/// - Nested objects: keys are prefixed with parent key and dot (e.g., `user.name`)
/// - Arrays: each element gets an indexed key (e.g., `tags.0`, `tags.1`)
pub fn flatten_json_object(value: &Value, prefix: &str, output: &mut BTreeMap<String, String>) {
    match value {
        Value::Array(arr) if !prefix.is_empty() && arr.is_empty() => {
            output.insert(prefix.to_string(), String::new());
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                let new_key = join_key(prefix, &i.to_string());
                flatten_json_object(item, &new_key, output);
            }
        }
        Value::Object(obj) => {
            for (key, val) in obj {
                flatten_json_object(val, &join_key(prefix, key), output);
            }
        }
        scalar => {
            output.insert(prefix.to_string(), format_json_value(scalar));
        }
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Extract all flattened keys from a slice of JSON rows, sorted.
pub fn get_all_flattened_keys(rows: &[Value]) -> Vec<String> {
    let mut all_keys = BTreeSet::new();
    for row in rows {
        let mut flat = BTreeMap::new();
        flatten_json_object(row, "", &mut flat);
        all_keys.extend(flat.into_keys());
    }
    all_keys.into_iter().collect()
}

/// The columns a tabular formatter should print.
pub fn resolve_columns(rows: &[Value], columns: &[&str]) -> Vec<String> {
    if columns.is_empty() {
        get_all_flattened_keys(rows)
    } else {
        columns.iter().map(|c| c.to_string()).collect()
    }
}

/// Flatten every row and pick `columns` out of it, in order.
pub fn project_rows(rows: &[Value], columns: &[String]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            let mut flat = BTreeMap::new();
            flatten_json_object(row, "", &mut flat);
            columns
                .iter()
                .map(|key| {
                    flat.remove(key)
                        .or_else(|| lookup(row, key).map(format_json_value))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

/// The unflattened value at a dotted path, so a list column prints as one cell.
fn lookup<'a>(row: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(row, |value, part| value.get(part))
}

/// Format a JSON value as a display string.
///
/// Strings are returned without quotes, null becomes empty, and arrays or
/// objects are serialized as compact JSON.
pub fn format_json_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(v).unwrap_or_default(),
    }
}

/// Write formatted output to a file or stdout.
///
/// When writing to a file, a confirmation goes to stderr so stdout stays
/// clean for pipelines.
pub fn output_result(output: &str, format: OutputFormat, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        write_to_file(output, path)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        eprintln!(
            "Results written to {} ({:?} format)",
            path.display(),
            format
        );
    } else {
        print!("{output}");
    }
    Ok(())
}

/// Write content to a file atomically.
///
/// Creates parent directories if needed, writes to a temp file in the same
/// directory, then renames it over the target.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    if parent_dir != Path::new(".") {
        fs::create_dir_all(parent_dir)
            .with_context(|| format!("Failed to create directory: {}", parent_dir.display()))?;
    }

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temp file in: {}", parent_dir.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temp file")?;
    temp_file.flush().context("Failed to flush temp file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}
