//! KV Store collections and records.
//!
//! Collection definitions live under `storage/collections/config`, records
//! under `storage/collections/data/{collection}`, both in an app namespace.
//! Record bodies are JSON objects and are returned as-is.

use serde_json::Value;

use crate::client::{RequestBody, SplunkClient};
use crate::endpoints::{encode_path_segment, namespaced};
use crate::error::{ClientError, Result};
use crate::models::{CollectionSummary, CreateCollectionParams, KvQuery};
use crate::retry::Idempotency;
use crate::validators::{validate_app_name, validate_collection_name};

fn config_path(app: &str, collection: Option<&str>) -> Result<String> {
    let app = validate_app_name(app)?;
    let mut path = namespaced(app, "storage/collections/config");
    if let Some(collection) = collection {
        let collection = validate_collection_name(collection)?;
        path.push('/');
        path.push_str(&encode_path_segment(collection));
    }
    Ok(path)
}

fn data_path(app: &str, collection: &str, key: Option<&str>) -> Result<String> {
    let app = validate_app_name(app)?;
    let collection = validate_collection_name(collection)?;
    let mut path = namespaced(
        app,
        &format!("storage/collections/data/{}", encode_path_segment(collection)),
    );
    if let Some(key) = key {
        if key.trim().is_empty() {
            return Err(ClientError::validation(
                "validate record key",
                "record key cannot be empty",
            ));
        }
        path.push('/');
        path.push_str(&encode_path_segment(key));
    }
    Ok(path)
}

fn require_object(value: &Value, operation: &str) -> Result<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ClientError::validation(
            operation,
            "record must be a JSON object",
        ))
    }
}

/// List collections defined in `app`.
pub async fn list_collections(client: &SplunkClient, app: &str) -> Result<Vec<CollectionSummary>> {
    const OPERATION: &str = "list KV Store collections";

    let collection = client
        .get(
            &config_path(app, None)?,
            &[("count", "0".to_string())],
            None,
            OPERATION,
        )
        .await?
        .into_entries(OPERATION)?;
    Ok(collection.entry.iter().map(CollectionSummary::from_entry).collect())
}

/// Create a collection with optional typed fields and accelerations.
pub async fn create_collection(
    client: &SplunkClient,
    app: &str,
    params: &CreateCollectionParams,
) -> Result<()> {
    const OPERATION: &str = "create KV Store collection";

    validate_collection_name(&params.name)?;
    client
        .post(
            &config_path(app, None)?,
            RequestBody::Form(params.to_form()),
            Idempotency::NonIdempotent,
            None,
            OPERATION,
        )
        .await?;
    Ok(())
}

/// Delete a collection and all its records.
pub async fn delete_collection(client: &SplunkClient, app: &str, name: &str) -> Result<()> {
    const OPERATION: &str = "delete KV Store collection";

    client
        .delete(&config_path(app, Some(name))?, &[], OPERATION)
        .await?;
    Ok(())
}

/// Query records with an optional filter, paging, sort and projection.
pub async fn query_records(
    client: &SplunkClient,
    app: &str,
    collection: &str,
    query: &KvQuery,
) -> Result<Vec<Value>> {
    const OPERATION: &str = "query KV Store records";

    client
        .get(
            &data_path(app, collection, None)?,
            &query.to_params(),
            None,
            OPERATION,
        )
        .await?
        .into_records(OPERATION)
}

/// Fetch one record by `_key`.
pub async fn get_record(
    client: &SplunkClient,
    app: &str,
    collection: &str,
    key: &str,
) -> Result<Value> {
    const OPERATION: &str = "get KV Store record";

    let record = client
        .get(&data_path(app, collection, Some(key))?, &[], None, OPERATION)
        .await?
        .into_document(OPERATION)?;
    Ok(Value::Object(record))
}

/// Insert a record and return the `_key` Splunk assigned (or kept).
pub async fn insert_record(
    client: &SplunkClient,
    app: &str,
    collection: &str,
    record: Value,
) -> Result<String> {
    const OPERATION: &str = "insert KV Store record";

    require_object(&record, OPERATION)?;
    let doc = client
        .post(
            &data_path(app, collection, None)?,
            RequestBody::Json(record),
            Idempotency::NonIdempotent,
            None,
            OPERATION,
        )
        .await?
        .into_document(OPERATION)?;

    doc.get("_key")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::invalid_response(OPERATION, "response did not include _key"))
}

/// Replace the record stored under `key`.
pub async fn update_record(
    client: &SplunkClient,
    app: &str,
    collection: &str,
    key: &str,
    record: Value,
) -> Result<()> {
    const OPERATION: &str = "update KV Store record";

    require_object(&record, OPERATION)?;
    client
        .post(
            &data_path(app, collection, Some(key))?,
            RequestBody::Json(record),
            Idempotency::Idempotent,
            None,
            OPERATION,
        )
        .await?;
    Ok(())
}

/// Insert or replace many records at once; returns their keys in order.
pub async fn batch_save(
    client: &SplunkClient,
    app: &str,
    collection: &str,
    records: Vec<Value>,
) -> Result<Vec<String>> {
    const OPERATION: &str = "batch save KV Store records";

    for record in &records {
        require_object(record, OPERATION)?;
    }
    let path = format!("{}/batch_save", data_path(app, collection, None)?);
    let keys = client
        .post(
            &path,
            RequestBody::Json(Value::Array(records)),
            Idempotency::NonIdempotent,
            None,
            OPERATION,
        )
        .await?
        .into_records(OPERATION)?;

    Ok(keys
        .into_iter()
        .filter_map(|key| key.as_str().map(str::to_string))
        .collect())
}

/// Delete one record by `_key`.
pub async fn delete_record(
    client: &SplunkClient,
    app: &str,
    collection: &str,
    key: &str,
) -> Result<()> {
    const OPERATION: &str = "delete KV Store record";

    client
        .delete(&data_path(app, collection, Some(key))?, &[], OPERATION)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths() {
        assert_eq!(
            config_path("search", Some("assets")).unwrap(),
            "/servicesNS/nobody/search/storage/collections/config/assets"
        );
        assert_eq!(
            data_path("search", "assets", Some("abc 1")).unwrap(),
            "/servicesNS/nobody/search/storage/collections/data/assets/abc%201"
        );
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(config_path("bad app", None).is_err());
        assert!(data_path("search", "../x", None).is_err());
        assert!(data_path("search", "assets", Some(" ")).is_err());
    }

    #[test]
    fn test_record_must_be_object() {
        assert!(require_object(&json!({"a": 1}), "insert").is_ok());
        assert!(require_object(&json!([1, 2]), "insert").is_err());
    }
}
