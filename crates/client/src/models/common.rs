//! Shared pieces of Splunk's Atom-derived JSON envelope.
//!
//! This module contains the entry wrapper, ACL metadata and the
//! `messages[]` block that appear across endpoints. It does NOT decide
//! which envelope a response uses (see [`super::response`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{ClientError, Result};

/// Type of message from Splunk API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MessageType {
    #[serde(rename = "FATAL")]
    Fatal,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "WARN")]
    Warn,
    #[serde(rename = "INFO")]
    Info,
    #[serde(rename = "DEBUG")]
    Debug,
    /// Unknown or unrecognized message type.
    #[serde(other)]
    #[default]
    Unknown,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fatal => write!(f, "FATAL"),
            Self::Error => write!(f, "ERROR"),
            Self::Warn => write!(f, "WARN"),
            Self::Info => write!(f, "INFO"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A single message from Splunk (usually in error responses).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SplunkMessage {
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub text: String,
}

/// A collection of messages from Splunk.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SplunkMessages {
    #[serde(default)]
    pub messages: Vec<SplunkMessage>,
}

/// Ownership and sharing metadata attached to an entry.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Acl {
    #[serde(default)]
    pub app: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub sharing: Option<String>,
    #[serde(default)]
    pub perms: Option<Perms>,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    pub modifiable: bool,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    pub removable: bool,
}

/// Users and roles allowed to read or write an object; `*` means everyone.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Perms {
    #[serde(default, deserialize_with = "crate::serde_helpers::strings_from_one_or_many")]
    pub read: Vec<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::strings_from_one_or_many")]
    pub write: Vec<String>,
}

/// One element of an `entry` array.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Entry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub content: Map<String, Value>,
    #[serde(default)]
    pub acl: Option<Acl>,
}

impl Entry {
    /// Deserialize `content` into a typed model.
    ///
    /// The entry name is copied into `content.name` when the content does not
    /// carry its own, so models can declare a plain `name` field.
    pub fn into_model<T: DeserializeOwned>(self, operation: &str) -> Result<T> {
        let mut content = self.content;
        content
            .entry("name".to_string())
            .or_insert_with(|| Value::String(self.name.clone()));
        serde_json::from_value(Value::Object(content)).map_err(|e| {
            ClientError::invalid_response(
                operation,
                format!("entry '{}' has unexpected content: {e}", self.name),
            )
        })
    }

    /// A boolean flag from `content` (`true`, `1`, `"1"`, `"true"`).
    pub fn content_flag(&self, key: &str) -> bool {
        match self.content.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
            Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "True"),
            _ => false,
        }
    }

    /// A string field from `content`, accepting numbers as well.
    pub fn content_str(&self, key: &str) -> Option<String> {
        match self.content.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
        #[serde(default)]
        size: u64,
    }

    #[test]
    fn test_message_type_deserialization() {
        assert_eq!(
            serde_json::from_str::<MessageType>("\"FATAL\"").unwrap(),
            MessageType::Fatal
        );
        assert_eq!(
            serde_json::from_str::<MessageType>("\"WARN\"").unwrap(),
            MessageType::Warn
        );
        assert_eq!(
            serde_json::from_str::<MessageType>("\"whatever\"").unwrap(),
            MessageType::Unknown
        );
    }

    #[test]
    fn test_entry_into_model_injects_name() {
        let entry: Entry = serde_json::from_value(json!({
            "name": "main",
            "content": {"size": 12}
        }))
        .unwrap();
        let model: Named = entry.into_model("test").unwrap();
        assert_eq!(model.name, "main");
        assert_eq!(model.size, 12);
    }

    #[test]
    fn test_entry_into_model_keeps_content_name() {
        let entry: Entry = serde_json::from_value(json!({
            "name": "entry-name",
            "content": {"name": "content-name"}
        }))
        .unwrap();
        let model: Named = entry.into_model("test").unwrap();
        assert_eq!(model.name, "content-name");
    }

    #[test]
    fn test_entry_into_model_reports_operation() {
        let entry: Entry = serde_json::from_value(json!({
            "name": "bad",
            "content": {"size": "lots"}
        }))
        .unwrap();
        let err = entry.into_model::<Named>("list things").unwrap_err();
        assert_eq!(err.operation(), Some("list things"));
    }

    #[test]
    fn test_content_str_accepts_numbers() {
        let entry: Entry = serde_json::from_value(json!({
            "name": "x",
            "content": {"sid": 12345, "label": "l", "nested": {}}
        }))
        .unwrap();
        assert_eq!(entry.content_str("sid").as_deref(), Some("12345"));
        assert_eq!(entry.content_str("label").as_deref(), Some("l"));
        assert_eq!(entry.content_str("nested"), None);
    }

    #[test]
    fn test_acl_flags_and_single_perm() {
        let acl: Acl = serde_json::from_value(json!({
            "app": "search",
            "owner": "admin",
            "sharing": "app",
            "modifiable": "1",
            "removable": false,
            "perms": {"read": "*", "write": ["admin", "power"]}
        }))
        .unwrap();
        assert!(acl.modifiable);
        assert!(!acl.removable);
        let perms = acl.perms.unwrap();
        assert_eq!(perms.read, vec!["*"]);
        assert_eq!(perms.write, vec!["admin", "power"]);
    }
}
