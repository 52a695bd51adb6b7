//! Response envelopes, classified once at the parsing boundary.
//!
//! Splunk answers with one of a few shapes depending on the endpoint:
//! - `{"entry": [...]}` for collection and detail resources
//! - `{"results": [...]}` for oneshot searches and job results
//! - a bare JSON array for KV Store record queries
//! - any other object (e.g. `{"sid": ...}`, `{"_key": ...}`)
//! - an empty body for some deletes
//!
//! Downstream code matches on [`ResponseBody`] or calls one of the typed
//! accessors, which fail with `InvalidResponse` naming the operation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};
use crate::models::common::{Entry, SplunkMessage};

/// `{"entry": [...]}` envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryCollection {
    #[serde(default)]
    pub entry: Vec<Entry>,
    #[serde(default)]
    pub paging: Option<Paging>,
    #[serde(default)]
    pub messages: Vec<SplunkMessage>,
}

/// Paging block of an entry collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paging {
    #[serde(default)]
    pub total: u64,
    #[serde(default, rename = "perPage")]
    pub per_page: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Field descriptor in a results response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResultField {
    Named { name: String },
    Bare(String),
}

impl ResultField {
    pub fn name(&self) -> &str {
        match self {
            Self::Named { name } => name,
            Self::Bare(name) => name,
        }
    }
}

/// `{"results": [...]}` envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub fields: Vec<ResultField>,
    #[serde(default)]
    pub messages: Vec<SplunkMessage>,
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub init_offset: u64,
}

impl ResultsResponse {
    /// Field names in server order, falling back to the keys of the first row.
    pub fn field_names(&self) -> Vec<String> {
        if !self.fields.is_empty() {
            return self.fields.iter().map(|f| f.name().to_string()).collect();
        }
        match self.results.first() {
            Some(Value::Object(row)) => row.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// A parsed response body.
#[derive(Debug, Clone)]
pub enum ResponseBody {
    Entries(EntryCollection),
    Results(ResultsResponse),
    Records(Vec<Value>),
    Document(Map<String, Value>),
    Empty,
}

impl ResponseBody {
    /// Classify raw response bytes.
    pub fn parse(operation: &str, bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::Empty);
        }
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            ClientError::invalid_response(operation, format!("body is not valid JSON: {e}"))
        })?;
        Self::from_value(operation, value)
    }

    /// Classify an already-decoded JSON value.
    pub fn from_value(operation: &str, value: Value) -> Result<Self> {
        match value {
            Value::Array(records) => Ok(Self::Records(records)),
            Value::Object(map) if map.get("entry").is_some_and(Value::is_array) => {
                serde_json::from_value(Value::Object(map))
                    .map(Self::Entries)
                    .map_err(|e| shape_error(operation, "entry collection", e))
            }
            Value::Object(map) if map.get("results").is_some_and(Value::is_array) => {
                serde_json::from_value(Value::Object(map))
                    .map(Self::Results)
                    .map_err(|e| shape_error(operation, "results", e))
            }
            Value::Object(map) => Ok(Self::Document(map)),
            Value::Null => Ok(Self::Empty),
            other => Err(ClientError::invalid_response(
                operation,
                format!("unexpected top-level JSON value: {other}"),
            )),
        }
    }

    /// Short label of the shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Entries(_) => "entry collection",
            Self::Results(_) => "results",
            Self::Records(_) => "record list",
            Self::Document(_) => "document",
            Self::Empty => "empty body",
        }
    }

    pub fn into_entries(self, operation: &str) -> Result<EntryCollection> {
        match self {
            Self::Entries(collection) => Ok(collection),
            other => Err(mismatch(operation, "entry collection", &other)),
        }
    }

    /// Results rows; an empty body is treated as zero rows.
    pub fn into_results(self, operation: &str) -> Result<ResultsResponse> {
        match self {
            Self::Results(results) => Ok(results),
            Self::Empty => Ok(ResultsResponse::default()),
            other => Err(mismatch(operation, "results", &other)),
        }
    }

    pub fn into_records(self, operation: &str) -> Result<Vec<Value>> {
        match self {
            Self::Records(records) => Ok(records),
            other => Err(mismatch(operation, "record list", &other)),
        }
    }

    pub fn into_document(self, operation: &str) -> Result<Map<String, Value>> {
        match self {
            Self::Document(map) => Ok(map),
            other => Err(mismatch(operation, "document", &other)),
        }
    }

    /// First entry of an entry collection.
    pub fn into_first_entry(self, operation: &str) -> Result<Entry> {
        self.into_entries(operation)?
            .entry
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::invalid_response(operation, "response has no entries"))
    }

    /// Re-encode the body as JSON for raw output.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Entries(c) => serde_json::to_value(c).unwrap_or(Value::Null),
            Self::Results(r) => serde_json::to_value(r).unwrap_or(Value::Null),
            Self::Records(r) => Value::Array(r.clone()),
            Self::Document(m) => Value::Object(m.clone()),
            Self::Empty => Value::Null,
        }
    }
}

fn shape_error(operation: &str, shape: &str, err: serde_json::Error) -> ClientError {
    ClientError::invalid_response(operation, format!("malformed {shape} envelope: {err}"))
}

fn mismatch(operation: &str, expected: &str, got: &ResponseBody) -> ClientError {
    ClientError::invalid_response(
        operation,
        format!("expected {expected}, got {}", got.kind()),
    )
}
