//! Field/value tags (`saved/fvtags`) and searching by tag.
//!
//! Splunk stores every tag on a pair in one entry named `field::value`.
//! Adding or removing a tag rewrites the whole list; the entry is deleted
//! once its last tag is removed.

use tracing::debug;

use crate::client::{RequestBody, SplunkClient};
use crate::endpoints::search::{SearchRequest, oneshot};
use crate::endpoints::{encode_path_segment, scoped};
use crate::error::{ClientError, Result};
use crate::models::tags::{tag_entry_name, tags_of};
use crate::models::{ResultsResponse, TagAssignment};
use crate::retry::Idempotency;
use crate::validators::{
    validate_app_name, validate_field_name, validate_index_name, validate_tag_name,
};

const FVTAGS: &str = "saved/fvtags";

/// `saved/fvtags/host%3A%3Aweb01`; the `::` separator is always encoded.
fn entry_path(app: Option<&str>, field: &str, value: &str) -> String {
    let name = encode_path_segment(&tag_entry_name(field, value)).replace(':', "%3A");
    scoped(app, &format!("{FVTAGS}/{name}"))
}

/// Validated `(app, field, value)` for one pair.
fn pair<'a>(
    operation: &str,
    app: Option<&'a str>,
    field: &'a str,
    value: &'a str,
) -> Result<(Option<&'a str>, &'a str, &'a str)> {
    let app = app.map(validate_app_name).transpose()?;
    let field = validate_field_name(field)?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::validation(operation, "field value cannot be empty"));
    }
    Ok((app, field, value))
}

fn validate_tags(tags: &[String]) -> Result<Vec<String>> {
    if tags.is_empty() {
        return Err(ClientError::validation("validate tag name", "no tags given"));
    }
    tags.iter()
        .map(|t| validate_tag_name(t).map(String::from))
        .collect()
}

/// Every tag assignment visible in `app`, optionally for one field.
pub async fn list_tags(
    client: &SplunkClient,
    app: Option<&str>,
    field: Option<&str>,
) -> Result<Vec<TagAssignment>> {
    const OPERATION: &str = "list tags";

    let app = app.map(validate_app_name).transpose()?;
    let collection = client
        .get(&scoped(app, FVTAGS), &[("count", "0".to_string())], None, OPERATION)
        .await?
        .into_entries(OPERATION)?;

    Ok(collection
        .entry
        .iter()
        .flat_map(TagAssignment::from_entry)
        .filter(|tag| field.is_none_or(|f| tag.field == f))
        .collect())
}

/// Tags on one `field=value` pair; empty when the pair has none.
pub async fn get_tags(
    client: &SplunkClient,
    app: Option<&str>,
    field: &str,
    value: &str,
) -> Result<Vec<String>> {
    const OPERATION: &str = "get tags";

    let (app, field, value) = pair(OPERATION, app, field, value)?;
    match client
        .get(&entry_path(app, field, value), &[], None, OPERATION)
        .await
    {
        Ok(body) => {
            let entry = body.into_first_entry(OPERATION)?;
            Ok(tags_of(&entry))
        }
        Err(ClientError::NotFound { .. }) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

async fn write_tags(
    client: &SplunkClient,
    app: Option<&str>,
    field: &str,
    value: &str,
    tags: &[String],
    operation: &str,
) -> Result<()> {
    client
        .post(
            &entry_path(app, field, value),
            RequestBody::Form(vec![("value".to_string(), tags.join(","))]),
            Idempotency::Idempotent,
            None,
            operation,
        )
        .await?;
    Ok(())
}

/// Add `tags` to a pair, keeping existing ones. Returns the resulting list.
pub async fn add_tags(
    client: &SplunkClient,
    app: Option<&str>,
    field: &str,
    value: &str,
    tags: &[String],
) -> Result<Vec<String>> {
    const OPERATION: &str = "add tags";

    let (app, field, value) = pair(OPERATION, app, field, value)?;
    let new_tags = validate_tags(tags)?;
    let mut merged = get_tags(client, app, field, value).await?;
    let before = merged.len();
    for tag in new_tags {
        if !merged.contains(&tag) {
            merged.push(tag);
        }
    }

    if merged.len() == before {
        debug!(field, value, "Tags already present");
        return Ok(merged);
    }
    write_tags(client, app, field, value, &merged, OPERATION).await?;
    Ok(merged)
}

/// Remove `tags` from a pair. Returns the tags left.
///
/// Fails with a validation error when none of `tags` is on the pair.
pub async fn remove_tags(
    client: &SplunkClient,
    app: Option<&str>,
    field: &str,
    value: &str,
    tags: &[String],
) -> Result<Vec<String>> {
    const OPERATION: &str = "remove tags";

    let (app, field, value) = pair(OPERATION, app, field, value)?;
    let removed = validate_tags(tags)?;
    let existing = get_tags(client, app, field, value).await?;
    if !existing.iter().any(|t| removed.contains(t)) {
        return Err(ClientError::validation(
            OPERATION,
            format!("{field}={value} is not tagged {}", removed.join(", ")),
        ));
    }

    let remaining: Vec<String> = existing
        .into_iter()
        .filter(|t| !removed.contains(t))
        .collect();
    if remaining.is_empty() {
        client
            .delete(&entry_path(app, field, value), &[], OPERATION)
            .await?;
    } else {
        write_tags(client, app, field, value, &remaining, OPERATION).await?;
    }
    Ok(remaining)
}

/// A search for events carrying a tag.
#[derive(Debug, Clone, Default)]
pub struct TagSearch {
    pub tag: String,
    /// Only match the tag on this field (`tag::host=prod`).
    pub field: Option<String>,
    pub index: Option<String>,
}

impl TagSearch {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn to_spl(&self) -> Result<String> {
        let tag = validate_tag_name(&self.tag)?;
        let mut spl = match &self.field {
            Some(field) => format!("search tag::{}={tag}", validate_field_name(field)?),
            None => format!("search tag={tag}"),
        };
        if let Some(index) = &self.index {
            spl.push_str(&format!(" index={}", validate_index_name(index)?));
        }
        Ok(spl)
    }
}

/// Run a tag search as a oneshot, returning at most `count` events.
pub async fn search_by_tag(
    client: &SplunkClient,
    search: &TagSearch,
    earliest_time: Option<String>,
    latest_time: Option<String>,
    count: u64,
) -> Result<ResultsResponse> {
    let request = SearchRequest::new(search.to_spl()?)
        .time_range(earliest_time, latest_time)
        .count(count);
    oneshot(client, &request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_path_encodes_pair() {
        assert_eq!(
            entry_path(Some("search"), "host", "web 01"),
            "/servicesNS/nobody/search/saved/fvtags/host%3A%3Aweb%2001"
        );
        assert_eq!(
            entry_path(None, "uri", "/cart"),
            "/services/saved/fvtags/uri%3A%3A%2Fcart"
        );
    }

    #[test]
    fn test_tag_search_spl() {
        assert_eq!(TagSearch::new("prod").to_spl().unwrap(), "search tag=prod");

        let search = TagSearch {
            field: Some("host".to_string()),
            index: Some("web".to_string()),
            ..TagSearch::new("prod")
        };
        assert_eq!(search.to_spl().unwrap(), "search tag::host=prod index=web");
    }

    #[test]
    fn test_tag_search_rejects_bad_names() {
        assert!(TagSearch::new("prod OR 1").to_spl().is_err());
        let search = TagSearch {
            index: Some("main|delete".to_string()),
            ..TagSearch::new("prod")
        };
        assert!(search.to_spl().is_err());
    }
}
