//! KV Store collection models.
//!
//! Collection schemas are flattened by Splunk into `field.<name>` and
//! `accelerated_fields.<name>` content keys; this module folds them back
//! into maps. Records themselves stay as raw JSON objects.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::common::Entry;

/// A KV Store collection definition.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollectionSummary {
    pub name: String,
    pub app: Option<String>,
    pub owner: Option<String>,
    /// Field name to type (`string`, `number`, `bool`, `time`, ...).
    pub fields: BTreeMap<String, String>,
    /// Index name to its JSON definition.
    pub accelerated_fields: BTreeMap<String, String>,
    pub disabled: bool,
}

impl CollectionSummary {
    pub fn from_entry(entry: &Entry) -> Self {
        let mut fields = BTreeMap::new();
        let mut accelerated_fields = BTreeMap::new();
        for (key, value) in &entry.content {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if let Some(field) = key.strip_prefix("field.") {
                fields.insert(field.to_string(), rendered);
            } else if let Some(index) = key.strip_prefix("accelerated_fields.") {
                accelerated_fields.insert(index.to_string(), rendered);
            }
        }
        Self {
            name: entry.name.clone(),
            app: entry.acl.as_ref().map(|acl| acl.app.clone()),
            owner: entry.acl.as_ref().map(|acl| acl.owner.clone()),
            fields,
            accelerated_fields,
            disabled: entry.content_flag("disabled"),
        }
    }
}

/// Parameters for creating a collection.
#[derive(Debug, Clone, Default)]
pub struct CreateCollectionParams {
    pub name: String,
    /// Field name to type.
    pub fields: BTreeMap<String, String>,
    /// Index name to JSON definition, e.g. `{"user": 1}`.
    pub accelerated_fields: BTreeMap<String, Value>,
}

impl CreateCollectionParams {
    /// Form body for the collection config endpoint.
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![("name".to_string(), self.name.clone())];
        form.extend(
            self.fields
                .iter()
                .map(|(name, kind)| (format!("field.{name}"), kind.clone())),
        );
        form.extend(
            self.accelerated_fields
                .iter()
                .map(|(name, def)| (format!("accelerated_fields.{name}"), def.to_string())),
        );
        form
    }
}

/// Query options for reading collection records.
#[derive(Debug, Clone, Default)]
pub struct KvQuery {
    /// MongoDB-style JSON filter.
    pub query: Option<Value>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    /// e.g. `name:1` or `-created`.
    pub sort: Option<String>,
    /// Comma-separated field projection.
    pub fields: Option<String>,
}

impl KvQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(query) = &self.query {
            params.push(("query", query.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.clone()));
        }
        if let Some(fields) = &self.fields {
            params.push(("fields", fields.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_schema_is_folded() {
        let entry: Entry = serde_json::from_value(json!({
            "name": "assets",
            "content": {
                "field.ip": "string",
                "field.risk": "number",
                "accelerated_fields.by_ip": "{\"ip\": 1}",
                "disabled": false
            },
            "acl": {"app": "search", "owner": "nobody"}
        }))
        .unwrap();

        let summary = CollectionSummary::from_entry(&entry);
        assert_eq!(summary.name, "assets");
        assert_eq!(summary.app.as_deref(), Some("search"));
        assert_eq!(summary.fields.get("risk").map(String::as_str), Some("number"));
        assert_eq!(summary.accelerated_fields.len(), 1);
        assert!(!summary.disabled);
    }

    #[test]
    fn test_create_params_form() {
        let params = CreateCollectionParams {
            name: "assets".to_string(),
            fields: BTreeMap::from([("ip".to_string(), "string".to_string())]),
            accelerated_fields: BTreeMap::from([("by_ip".to_string(), json!({"ip": 1}))]),
        };
        assert_eq!(
            params.to_form(),
            vec![
                ("name".to_string(), "assets".to_string()),
                ("field.ip".to_string(), "string".to_string()),
                ("accelerated_fields.by_ip".to_string(), r#"{"ip":1}"#.to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params() {
        let query = KvQuery {
            query: Some(json!({"status": "active"})),
            limit: Some(10),
            sort: Some("name:1".to_string()),
            ..KvQuery::default()
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("query", r#"{"status":"active"}"#.to_string()),
                ("limit", "10".to_string()),
                ("sort", "name:1".to_string()),
            ]
        );
    }
}
