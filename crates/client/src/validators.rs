//! Local input checks run before any request is sent.
//!
//! Every check fails with [`ClientError::Validation`] without an HTTP
//! status, so callers can tell local rejections from server ones.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ClientError, Result};

const MAX_SID_LEN: usize = 256;
const MAX_NAME_LEN: usize = 100;

const TIME_UNIT: &str = r"(?:s|sec|secs|second|seconds|m|min|mins|minute|minutes|h|hr|hrs|hour|hours|d|day|days|w[0-7]?|week|weeks|mon|month|months|q|qtr|qtrs|quarter|quarters|y|yr|yrs|year|years)";

static RELATIVE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^(?:rt)?(?:[+-]\d*{TIME_UNIT})?(?:@{TIME_UNIT}(?:[+-]\d*{TIME_UNIT})?)?$"
    );
    Regex::new(&pattern).expect("relative time pattern is valid")
});

static EPOCH_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("epoch pattern is valid"));

static ABSOLUTE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}(?::\d{1,2}:\d{2}:\d{2})?$")
        .expect("absolute time pattern is valid")
});

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Check a search job identifier.
///
/// Accepts ids such as `1703779200.12345` and
/// `scheduler__admin__search__RMD5abc_at_1703779200_42`.
pub fn validate_sid(sid: &str) -> Result<&str> {
    const OP: &str = "validate sid";
    let sid = sid.trim();
    if sid.is_empty() {
        return Err(ClientError::validation(OP, "search job id cannot be empty"));
    }
    if sid.len() > MAX_SID_LEN {
        return Err(ClientError::validation(
            OP,
            format!("search job id is longer than {MAX_SID_LEN} characters"),
        ));
    }
    if let Some(bad) = sid.chars().find(|c| !is_name_char(*c)) {
        return Err(ClientError::validation(
            OP,
            format!("search job id '{sid}' contains invalid character '{bad}'"),
        ));
    }
    Ok(sid)
}

/// Check SPL for structural problems Splunk would reject.
///
/// Parentheses and brackets must balance outside quoted strings, no pipe
/// segment may be empty, and the query may not end with a pipe. A leading
/// pipe (generating command) is allowed.
pub fn validate_spl(spl: &str) -> Result<&str> {
    const OP: &str = "validate SPL";
    let spl = spl.trim();
    if spl.is_empty() {
        return Err(ClientError::validation(OP, "search query cannot be empty"));
    }

    let mut stack: Vec<char> = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut segment_has_content = false;
    let mut seen_pipe = false;

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
            '"' => {
                in_quotes = true;
                segment_has_content = true;
            }
            '(' | '[' => {
                stack.push(c);
                segment_has_content = true;
            }
            ')' | ']' => {
                let expected = if c == ')' { '(' } else { '[' };
                if stack.pop() != Some(expected) {
                    return Err(ClientError::validation(
                        OP,
                        format!("unbalanced '{c}' at position {pos}"),
                    ));
                }
            }
            '|' if stack.is_empty() || stack.last() == Some(&'[') => {
                // A leading pipe starts a generating command; any other pipe
                // must follow a non-empty segment.
                if !segment_has_content && (seen_pipe || pos != 0) {
                    return Err(ClientError::validation(
                        OP,
                        format!("empty command before '|' at position {pos}"),
                    ));
                }
                seen_pipe = true;
                segment_has_content = false;
            }
            c if !c.is_whitespace() => segment_has_content = true,
            _ => {}
        }
    }

    if in_quotes {
        return Err(ClientError::validation(OP, "unterminated quoted string"));
    }
    if let Some(open) = stack.pop() {
        return Err(ClientError::validation(OP, format!("unclosed '{open}'")));
    }
    if seen_pipe && !segment_has_content {
        return Err(ClientError::validation(OP, "search cannot end with '|'"));
    }
    Ok(spl)
}

/// Check an `earliest`/`latest` time modifier.
///
/// Accepts `now`, epoch seconds, relative modifiers (`-24h`, `-7d@d`,
/// `@w0`, `rt-5m`) and absolute `%m/%d/%Y[:%H:%M:%S]` timestamps.
pub fn validate_time_modifier(value: &str) -> Result<&str> {
    const OP: &str = "validate time modifier";
    let value = value.trim();
    let ok = !value.is_empty()
        && (value.eq_ignore_ascii_case("now")
            || EPOCH_TIME.is_match(value)
            || RELATIVE_TIME.is_match(value)
            || ABSOLUTE_TIME.is_match(value));
    if ok {
        Ok(value)
    } else {
        Err(ClientError::validation(
            OP,
            format!("invalid time modifier '{value}'"),
        ))
    }
}

fn validate_name<'a>(kind: &str, operation: &str, name: &'a str) -> Result<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::validation(
            operation,
            format!("{kind} name cannot be empty"),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ClientError::validation(
            operation,
            format!("{kind} name is longer than {MAX_NAME_LEN} characters"),
        ));
    }
    if let Some(bad) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(ClientError::validation(
            operation,
            format!("{kind} name '{name}' contains invalid character '{bad}'"),
        ));
    }
    Ok(name)
}

/// Check an app namespace name.
pub fn validate_app_name(name: &str) -> Result<&str> {
    validate_name("app", "validate app name", name)
}

/// Check a KV Store collection name.
pub fn validate_collection_name(name: &str) -> Result<&str> {
    validate_name("collection", "validate collection name", name)
}

/// Check an index name placed into generated SPL.
pub fn validate_index_name(name: &str) -> Result<&str> {
    validate_name("index", "validate index name", name)
}

/// Check a field or dimension name placed into generated SPL.
pub fn validate_field_name(name: &str) -> Result<&str> {
    validate_name("field", "validate field name", name)
}

/// Check a tag name.
pub fn validate_tag_name(name: &str) -> Result<&str> {
    validate_name("tag", "validate tag name", name)
}

/// Check a metric name, allowing `*` wildcards (`cpu.*`).
pub fn validate_metric_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let without_wildcards = trimmed.replace('*', "x");
    validate_name("metric", "validate metric name", &without_wildcards)?;
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sids() {
        for sid in [
            "1703779200.12345",
            "scheduler__admin__search__RMD5abc_at_1703779200_42",
            "rt_md_1703779200.7",
            "  1703779200.1  ",
        ] {
            assert!(validate_sid(sid).is_ok(), "{sid}");
        }
        assert_eq!(validate_sid(" 1.2 ").unwrap(), "1.2");
    }

    #[test]
    fn test_invalid_sids() {
        for sid in ["", "   ", "../etc/passwd", "abc def", "a/b", "x?y"] {
            let err = validate_sid(sid).unwrap_err();
            assert!(matches!(err, ClientError::Validation { status: None, .. }), "{sid}");
        }
        assert!(validate_sid(&"a".repeat(257)).is_err());
    }

    #[test]
    fn test_valid_spl() {
        for spl in [
            "index=main error",
            "search index=main | stats count by host",
            "| makeresults count=5",
            "index=main [search index=other | fields host] | head 10",
            r#"index=main message="a | b (c""#,
            r#"index=main msg="escaped \" quote | (""#,
            "| tstats count where index=* by index | sort - count",
        ] {
            assert!(validate_spl(spl).is_ok(), "{spl}");
        }
    }

    #[test]
    fn test_invalid_spl() {
        for spl in [
            "",
            "index=main | ",
            "index=main || stats count",
            "index=main | stats count(",
            "index=main | eval x=(1+2))",
            "index=main [search index=other",
            r#"index=main msg="unterminated"#,
            "index=main | eval x=[1)",
        ] {
            assert!(validate_spl(spl).is_err(), "{spl}");
        }
    }

    #[test]
    fn test_valid_time_modifiers() {
        for t in [
            "now", "0", "1703779200", "1703779200.5", "-24h", "-7d@d", "@d", "-1mon@mon",
            "+1d", "-15m", "@w0", "-1y@y+1d", "rt-5m", "rt", "12/25/2023:00:00:00",
            "1/2/2024",
        ] {
            assert!(validate_time_modifier(t).is_ok(), "{t}");
        }
    }

    #[test]
    fn test_invalid_time_modifiers() {
        for t in ["", "yesterday", "-24x", "24h ago", "2023-12-25", "-7d@", "@"] {
            assert!(validate_time_modifier(t).is_err(), "{t}");
        }
    }

    #[test]
    fn test_names() {
        assert!(validate_app_name("search").is_ok());
        assert!(validate_app_name("Splunk_TA_nix").is_ok());
        assert!(validate_app_name("my app").is_err());
        assert!(validate_collection_name("asset-inventory.v2").is_ok());
        assert!(validate_collection_name("").is_err());
        assert!(validate_collection_name("../x").is_err());
    }

    #[test]
    fn test_spl_bound_names() {
        assert_eq!(validate_index_name(" metrics ").unwrap(), "metrics");
        assert!(validate_index_name("main OR index=*").is_err());
        assert!(validate_field_name("src_ip").is_ok());
        assert!(validate_field_name("host|delete").is_err());
        assert!(validate_tag_name("web-tier").is_ok());
        assert!(validate_tag_name("a,b").is_err());
    }

    #[test]
    fn test_metric_names_allow_wildcards() {
        assert_eq!(validate_metric_name("cpu.*").unwrap(), "cpu.*");
        assert_eq!(validate_metric_name("*").unwrap(), "*");
        assert!(validate_metric_name("cpu percent").is_err());
        assert!(validate_metric_name("").is_err());
    }
}
