//! SPL query helpers: building, splitting and rough cost estimation.
//!
//! These work on query text only and never talk to Splunk. Splitting is
//! quote-aware and ignores pipes inside subsearch brackets.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static EARLIEST_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bearliest\s*=").expect("earliest pattern is valid"));

static LATEST_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\blatest\s*=").expect("latest pattern is valid"));

static ALL_INDEXES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bindex\s*=\s*\*").expect("index pattern is valid"));

const COMPLEX_COMMANDS: &[&str] = &[
    "join",
    "transaction",
    "append",
    "appendcols",
    "appendpipe",
    "map",
    "multisearch",
    "union",
];

const MEDIUM_COMMANDS: &[&str] = &[
    "stats",
    "eventstats",
    "streamstats",
    "sort",
    "eval",
    "chart",
    "timechart",
    "dedup",
    "top",
    "rare",
    "rex",
    "lookup",
];

/// One command in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplCommand {
    /// Lowercased command name.
    pub name: String,
    pub args: String,
}

/// Rough cost class of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        })
    }
}

/// Split on pipes that are outside quotes and brackets.
///
/// A query starting with `|` yields an empty first segment.
fn split_pipeline(spl: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (pos, c) in spl.char_indices() {
        if in_quotes {
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                segments.push(&spl[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    segments.push(&spl[start..]);
    segments
}

fn is_generating(spl: &str) -> bool {
    spl.trim_start().starts_with('|')
}

fn has_subsearch(spl: &str) -> bool {
    let mut in_quotes = false;
    let mut escaped = false;
    for c in spl.chars() {
        if in_quotes {
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '[' => return true,
            _ => {}
        }
    }
    false
}

/// Split a query into its pipeline commands.
///
/// A leading bare search (no command word) is reported as `search`.
pub fn parse_spl_commands(spl: &str) -> Vec<SplCommand> {
    let spl = spl.trim();
    if spl.is_empty() {
        return Vec::new();
    }
    let generating = is_generating(spl);

    split_pipeline(spl)
        .into_iter()
        .enumerate()
        .filter_map(|(index, segment)| {
            let segment = segment.trim();
            if segment.is_empty() {
                return None;
            }
            let (word, rest) = segment
                .split_once(char::is_whitespace)
                .map_or((segment, ""), |(w, r)| (w, r.trim()));

            if index == 0 && !generating && !word.eq_ignore_ascii_case("search") {
                return Some(SplCommand {
                    name: "search".to_string(),
                    args: segment.to_string(),
                });
            }
            Some(SplCommand {
                name: word.to_ascii_lowercase(),
                args: rest.to_string(),
            })
        })
        .collect()
}

fn has_command(spl: &str, name: &str) -> bool {
    parse_spl_commands(spl).iter().any(|c| c.name == name)
}

/// Prefix `search ` unless the query already starts with a command.
///
/// Splunk's job endpoints reject bare search terms.
pub fn ensure_search_command(spl: &str) -> String {
    let spl = spl.trim();
    let first_word = spl.split_whitespace().next().unwrap_or_default();
    if is_generating(spl) || first_word.eq_ignore_ascii_case("search") {
        spl.to_string()
    } else {
        format!("search {spl}")
    }
}

/// Add `earliest=`/`latest=` terms to the base search unless already present.
///
/// Generating queries are returned unchanged; their time range comes from
/// the job parameters.
pub fn add_time_bounds(spl: &str, earliest: Option<&str>, latest: Option<&str>) -> String {
    let spl = spl.trim();
    if is_generating(spl) {
        return spl.to_string();
    }

    let mut terms = Vec::new();
    if let Some(earliest) = earliest.filter(|_| !EARLIEST_TERM.is_match(spl)) {
        terms.push(format!("earliest={earliest}"));
    }
    if let Some(latest) = latest.filter(|_| !LATEST_TERM.is_match(spl)) {
        terms.push(format!("latest={latest}"));
    }
    if terms.is_empty() {
        return spl.to_string();
    }

    let segments = split_pipeline(spl);
    let base = segments[0].trim_end();
    let rest = &spl[segments[0].len()..];
    format!("{base} {}{}{rest}", terms.join(" "), if rest.is_empty() { "" } else { " " })
}

/// Append `| fields a, b` unless the query already has a `fields` command.
pub fn add_field_extraction(spl: &str, fields: &[String]) -> String {
    let spl = spl.trim();
    if fields.is_empty() || has_command(spl, "fields") {
        return spl.to_string();
    }
    format!("{spl} | fields {}", fields.join(", "))
}

/// Append `| head N` unless the query already has a `head` command.
pub fn add_head_limit(spl: &str, limit: u64) -> String {
    let spl = spl.trim();
    if has_command(spl, "head") {
        return spl.to_string();
    }
    format!("{spl} | head {limit}")
}

/// Compose a query with optional time bounds, field list and result cap.
pub fn build_search(
    spl: &str,
    earliest: Option<&str>,
    latest: Option<&str>,
    fields: &[String],
    head: Option<u64>,
) -> String {
    let mut query = add_time_bounds(spl, earliest, latest);
    query = add_field_extraction(&query, fields);
    if let Some(limit) = head {
        query = add_head_limit(&query, limit);
    }
    query
}

/// Classify a query by the most expensive command it uses.
pub fn estimate_complexity(spl: &str) -> Complexity {
    let commands = parse_spl_commands(spl);
    let uses = |names: &[&str]| commands.iter().any(|c| names.contains(&c.name.as_str()));

    if uses(COMPLEX_COMMANDS) || has_subsearch(spl) {
        Complexity::Complex
    } else if uses(MEDIUM_COMMANDS) {
        Complexity::Medium
    } else {
        Complexity::Simple
    }
}

/// Suggest cheap improvements for a query.
pub fn optimization_hints(spl: &str) -> Vec<String> {
    let spl = spl.trim();
    let mut hints = Vec::new();

    if !is_generating(spl) && !EARLIEST_TERM.is_match(spl) && !LATEST_TERM.is_match(spl) {
        hints.push("Add time bounds (earliest=/latest=) to limit the scanned range".to_string());
    }
    if ALL_INDEXES.is_match(spl) {
        hints.push("Name specific indexes instead of index=*".to_string());
    }
    let commands = parse_spl_commands(spl);
    let narrows = commands
        .iter()
        .any(|c| matches!(c.name.as_str(), "fields" | "table" | "stats" | "chart" | "timechart" | "tstats"));
    if !narrows {
        hints.push("Use | fields early to limit the fields extracted".to_string());
    }
    if commands.iter().any(|c| c.name == "transaction") {
        hints.push("Consider stats by a shared key instead of transaction".to_string());
    }
    hints
}
