//! Saved search operations.
//!
//! # What this module handles:
//! - Listing, reading, creating, updating and deleting saved searches
//! - Enabling and disabling them (`disabled=0|1`)
//! - Dispatching one immediately and returning the new job's sid
//!
//! # What this module does NOT handle:
//! - Alert-specific fields and fired alerts (see [`super::alerts`])
//! - Waiting for a dispatched job (see [`crate::poller`])

use tracing::debug;

use crate::client::{RequestBody, SplunkClient};
use crate::endpoints::jobs::extract_sid;
use crate::endpoints::{encode_path_segment, flag, scoped};
use crate::error::{ClientError, Result};
use crate::models::{SavedSearch, SavedSearchParams};
use crate::retry::Idempotency;
use crate::validators::{validate_app_name, validate_spl};

fn collection_path(app: Option<&str>) -> Result<String> {
    let app = app.map(validate_app_name).transpose()?;
    Ok(scoped(app, "saved/searches"))
}

fn item_path(app: Option<&str>, name: &str, suffix: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(ClientError::validation(
            "validate saved search name",
            "saved search name cannot be empty",
        ));
    }
    Ok(format!(
        "{}/{}{suffix}",
        collection_path(app)?,
        encode_path_segment(name)
    ))
}

/// List saved searches, optionally filtered by an SPL-style `search` term.
pub async fn list_saved_searches(
    client: &SplunkClient,
    app: Option<&str>,
    filter: Option<&str>,
    count: u64,
) -> Result<Vec<SavedSearch>> {
    const OPERATION: &str = "list saved searches";

    debug!(app, filter, "Listing saved searches");
    let mut params = vec![("count", count.to_string())];
    if let Some(filter) = filter {
        params.push(("search", filter.to_string()));
    }

    client
        .get(&collection_path(app)?, &params, None, OPERATION)
        .await?
        .into_entries(OPERATION)?
        .entry
        .into_iter()
        .map(|entry| SavedSearch::from_entry(entry, OPERATION))
        .collect()
}

pub async fn get_saved_search(
    client: &SplunkClient,
    app: Option<&str>,
    name: &str,
) -> Result<SavedSearch> {
    const OPERATION: &str = "get saved search";

    let entry = client
        .get(&item_path(app, name, "")?, &[], None, OPERATION)
        .await?
        .into_first_entry(OPERATION)?;
    SavedSearch::from_entry(entry, OPERATION)
}

/// Create a saved search. `params.search` is required.
pub async fn create_saved_search(
    client: &SplunkClient,
    app: Option<&str>,
    name: &str,
    params: &SavedSearchParams,
) -> Result<()> {
    const OPERATION: &str = "create saved search";

    let Some(search) = params.search.as_deref() else {
        return Err(ClientError::validation(OPERATION, "a search query is required"));
    };
    validate_spl(search)?;
    if name.trim().is_empty() {
        return Err(ClientError::validation(OPERATION, "saved search name cannot be empty"));
    }

    let mut form = vec![("name".to_string(), name.to_string())];
    form.extend(params.to_form());
    client
        .post(
            &collection_path(app)?,
            RequestBody::Form(form),
            Idempotency::NonIdempotent,
            None,
            OPERATION,
        )
        .await?;
    Ok(())
}

/// Update the fields set in `params`; at least one must be set.
pub async fn update_saved_search(
    client: &SplunkClient,
    app: Option<&str>,
    name: &str,
    params: &SavedSearchParams,
) -> Result<()> {
    const OPERATION: &str = "update saved search";

    if params.is_empty() {
        return Err(ClientError::validation(OPERATION, "no fields to update"));
    }
    if let Some(search) = params.search.as_deref() {
        validate_spl(search)?;
    }
    client
        .post(
            &item_path(app, name, "")?,
            RequestBody::Form(params.to_form()),
            Idempotency::Idempotent,
            None,
            OPERATION,
        )
        .await?;
    Ok(())
}

pub async fn delete_saved_search(client: &SplunkClient, app: Option<&str>, name: &str) -> Result<()> {
    const OPERATION: &str = "delete saved search";

    client
        .delete(&item_path(app, name, "")?, &[], OPERATION)
        .await?;
    Ok(())
}

/// Enable or disable a saved search.
pub async fn set_saved_search_disabled(
    client: &SplunkClient,
    app: Option<&str>,
    name: &str,
    disabled: bool,
) -> Result<()> {
    let operation = if disabled {
        "disable saved search"
    } else {
        "enable saved search"
    };

    client
        .post(
            &item_path(app, name, "")?,
            RequestBody::form([("disabled", flag(disabled))]),
            Idempotency::Idempotent,
            None,
            operation,
        )
        .await?;
    Ok(())
}

/// Run a saved search now and return the sid of the dispatched job.
pub async fn dispatch_saved_search(
    client: &SplunkClient,
    app: Option<&str>,
    name: &str,
    trigger_actions: bool,
) -> Result<String> {
    const OPERATION: &str = "dispatch saved search";

    let mut form = vec![("dispatch.now", "true")];
    if trigger_actions {
        form.push(("trigger_actions", "1"));
    }
    let body = client
        .post(
            &item_path(app, name, "/dispatch")?,
            RequestBody::form(form),
            Idempotency::NonIdempotent,
            None,
            OPERATION,
        )
        .await?;
    extract_sid(body, OPERATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path_encodes_name() {
        assert_eq!(
            item_path(Some("search"), "Errors Last Hour", "/dispatch").unwrap(),
            "/servicesNS/nobody/search/saved/searches/Errors%20Last%20Hour/dispatch"
        );
        assert_eq!(
            item_path(None, "daily", "").unwrap(),
            "/services/saved/searches/daily"
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            item_path(None, "  ", "").unwrap_err(),
            ClientError::Validation { .. }
        ));
    }
}
