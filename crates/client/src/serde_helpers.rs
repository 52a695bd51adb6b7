//! Serde helpers for Splunk's inconsistent JSON typing.
//!
//! Responsibilities:
//! - Accept either JSON numbers or strings for numeric fields.
//! - Accept `true`/`false`, `"1"`/`"0"`, `"true"`/`"false"` and `1`/`0` for flags.
//! - Accept either a single string or a list of strings for multi-valued fields.
//!
//! Explicitly does NOT handle:
//! - Validating higher-level semantics (ranges, required/optional business rules).
//!
//! Invariants / assumptions:
//! - Splunk may return numeric fields as `"123"` strings or as `123` numbers depending on endpoint/version.
//! - A JSON `null` is treated like a missing field.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    U64(u64),
    I64(i64),
    F64(f64),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Number(i64),
    String(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

pub fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    match value {
        None => Ok(0),
        Some(StringOrNumber::U64(v)) => Ok(v),
        Some(StringOrNumber::I64(v)) => u64::try_from(v).map_err(D::Error::custom),
        Some(StringOrNumber::F64(v)) if v >= 0.0 => Ok(v as u64),
        Some(StringOrNumber::F64(v)) => Err(D::Error::custom(format!("negative count {v}"))),
        Some(StringOrNumber::String(s)) if s.trim().is_empty() => Ok(0),
        Some(StringOrNumber::String(s)) => s.trim().parse::<u64>().map_err(D::Error::custom),
    }
}

pub fn opt_u64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(StringOrNumber::U64(v)) => Ok(Some(v)),
        Some(StringOrNumber::I64(v)) => u64::try_from(v).map(Some).map_err(D::Error::custom),
        Some(StringOrNumber::F64(v)) => Ok(Some(v.max(0.0) as u64)),
        Some(StringOrNumber::String(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrNumber::String(s)) => {
            s.trim().parse::<u64>().map(Some).map_err(D::Error::custom)
        }
    }
}

pub fn f64_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64_from_string_or_number(deserializer)?.unwrap_or(0.0))
}

pub fn opt_f64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(StringOrNumber::U64(v)) => Ok(Some(v as f64)),
        Some(StringOrNumber::I64(v)) => Ok(Some(v as f64)),
        Some(StringOrNumber::F64(v)) => Ok(Some(v)),
        Some(StringOrNumber::String(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrNumber::String(s)) => {
            s.trim().parse::<f64>().map(Some).map_err(D::Error::custom)
        }
    }
}

pub fn opt_string_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::U64(v) => v.to_string(),
        StringOrNumber::I64(v) => v.to_string(),
        StringOrNumber::F64(v) => v.to_string(),
    }))
}

pub fn bool_from_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<FlagValue>::deserialize(deserializer)?;
    match value {
        None => Ok(false),
        Some(FlagValue::Bool(b)) => Ok(b),
        Some(FlagValue::Number(n)) => Ok(n != 0),
        Some(FlagValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "t" | "yes" => Ok(true),
            "0" | "false" | "f" | "no" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid flag value '{other}'"))),
        },
    }
}

pub fn strings_from_one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match value {
        None => Vec::new(),
        Some(OneOrMany::One(s)) if s.is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}
