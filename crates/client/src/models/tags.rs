//! Field/value tags stored under `saved/fvtags`.

use serde::Serialize;
use serde_json::Value;

use crate::models::Entry;

/// One tag applied to one `field=value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagAssignment {
    pub field: String,
    pub value: String,
    pub tag: String,
    pub app: Option<String>,
    pub owner: Option<String>,
}

impl TagAssignment {
    /// Expand an fvtags entry into one assignment per tag.
    pub fn from_entry(entry: &Entry) -> Vec<Self> {
        let (field, value) = split_tag_entry_name(&entry.name);
        let app = entry.acl.as_ref().map(|acl| acl.app.clone()).filter(|a| !a.is_empty());
        let owner = entry.acl.as_ref().map(|acl| acl.owner.clone()).filter(|o| !o.is_empty());

        tags_of(entry)
            .into_iter()
            .map(|tag| Self {
                field: field.to_string(),
                value: value.to_string(),
                tag,
                app: app.clone(),
                owner: owner.clone(),
            })
            .collect()
    }
}

/// The fvtags entry name for a pair: `host::web01`.
pub fn tag_entry_name(field: &str, value: &str) -> String {
    format!("{field}::{value}")
}

/// Split `host::web01` into `("host", "web01")`.
///
/// Only the first `::` separates; values may contain more.
pub fn split_tag_entry_name(name: &str) -> (&str, &str) {
    name.split_once("::").unwrap_or(("", name))
}

/// Tags on an fvtags entry.
///
/// Read from `content.tags` (a string or a list); older servers only expose
/// `tag.<name> = enabled` keys.
pub fn tags_of(entry: &Entry) -> Vec<String> {
    let mut tags: Vec<String> = match entry.content.get("tags") {
        Some(Value::String(s)) => s.split(',').map(str::trim).map(String::from).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.trim().to_string())
            .collect(),
        _ => entry
            .content
            .iter()
            .filter(|(_, v)| v.as_str() == Some("enabled"))
            .filter_map(|(k, _)| k.strip_prefix("tag."))
            .map(String::from)
            .collect(),
    };
    tags.retain(|t| !t.is_empty());
    let mut seen = std::collections::HashSet::new();
    tags.retain(|t| seen.insert(t.clone()));
    tags
}
