//! CSV lookup table files.
//!
//! Uploads go to the app namespace as multipart bodies. Downloads run
//! `| inputlookup` through the export endpoint so large tables stream
//! instead of being buffered.

use crate::client::{FilePart, RequestBody, ResultStream, SplunkClient};
use crate::endpoints::search::{SearchRequest, export_events};
use crate::endpoints::{encode_path_segment, namespaced, scoped};
use crate::error::{ClientError, Result};
use crate::models::LookupFile;
use crate::retry::Idempotency;
use crate::validators::validate_app_name;

const LOOKUPS_PATH: &str = "data/lookup-table-files";

fn validate_lookup_name(name: &str) -> Result<&str> {
    const OP: &str = "validate lookup name";
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::validation(OP, "lookup name cannot be empty"));
    }
    if name.contains(['/', '\\', '"', '|']) || name.contains("..") {
        return Err(ClientError::validation(
            OP,
            format!("lookup name '{name}' contains invalid characters"),
        ));
    }
    Ok(name)
}

/// List lookup files, optionally only those in `app`.
pub async fn list_lookups(
    client: &SplunkClient,
    app: Option<&str>,
    count: u64,
) -> Result<Vec<LookupFile>> {
    const OPERATION: &str = "list lookup files";

    let app = app.map(validate_app_name).transpose()?;
    let collection = client
        .get(
            &scoped(app, LOOKUPS_PATH),
            &[("count", count.to_string())],
            None,
            OPERATION,
        )
        .await?
        .into_entries(OPERATION)?;
    Ok(collection.entry.iter().map(LookupFile::from_entry).collect())
}

/// Upload CSV content as lookup file `name` in `app`.
pub async fn upload_lookup(
    client: &SplunkClient,
    app: &str,
    name: &str,
    content: Vec<u8>,
) -> Result<()> {
    const OPERATION: &str = "upload lookup file";

    let app = validate_app_name(app)?;
    let name = validate_lookup_name(name)?;
    if content.is_empty() {
        return Err(ClientError::validation(OPERATION, "lookup file is empty"));
    }

    let body = RequestBody::Multipart {
        fields: vec![("name".to_string(), name.to_string())],
        files: vec![FilePart {
            field: "file".to_string(),
            file_name: name.to_string(),
            content,
        }],
    };
    client
        .post(
            &namespaced(app, LOOKUPS_PATH),
            body,
            Idempotency::NonIdempotent,
            None,
            OPERATION,
        )
        .await?;
    Ok(())
}

/// Stream a lookup's rows as CSV.
pub async fn download_lookup(client: &SplunkClient, name: &str) -> Result<ResultStream> {
    let name = validate_lookup_name(name)?;
    let request = SearchRequest::new(format!("| inputlookup \"{name}\""));
    export_events(client, &request, "csv").await
}

pub async fn delete_lookup(client: &SplunkClient, app: &str, name: &str) -> Result<()> {
    const OPERATION: &str = "delete lookup file";

    let app = validate_app_name(app)?;
    let name = validate_lookup_name(name)?;
    client
        .delete(
            &namespaced(app, &format!("{LOOKUPS_PATH}/{}", encode_path_segment(name))),
            &[],
            OPERATION,
        )
        .await?;
    Ok(())
}
