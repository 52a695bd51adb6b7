//! Alert definitions and fired alerts.

use crate::client::{RequestBody, SplunkClient};
use crate::endpoints::saved_searches::list_saved_searches;
use crate::endpoints::{encode_path_segment, namespaced};
use crate::error::{ClientError, Result};
use crate::models::{CreateAlertParams, FiredAlert, FiredAlertFilter, SavedSearch};
use crate::retry::Idempotency;
use crate::validators::{validate_app_name, validate_spl};

const FIRED_ALERTS_PATH: &str = "/services/alerts/fired_alerts";

/// Whether a saved search is configured as an alert.
pub fn is_alert(saved: &SavedSearch) -> bool {
    saved.is_scheduled
        && saved
            .alert_type
            .as_deref()
            .is_some_and(|kind| !kind.is_empty() && kind != "always")
}

/// List saved searches configured as alerts.
///
/// Splunk has no alert-only listing; scheduled saved searches are fetched
/// and those without a trigger condition are dropped here.
pub async fn list_alerts(
    client: &SplunkClient,
    app: Option<&str>,
    count: u64,
) -> Result<Vec<SavedSearch>> {
    let saved = list_saved_searches(client, app, Some("is_scheduled=1"), count).await?;
    Ok(saved.into_iter().filter(is_alert).collect())
}

/// List fired alerts, optionally for a single alert group.
pub async fn list_fired_alerts(
    client: &SplunkClient,
    name: Option<&str>,
    count: u64,
    filter: &FiredAlertFilter,
) -> Result<Vec<FiredAlert>> {
    const OPERATION: &str = "list fired alerts";

    let path = match name {
        Some(name) => format!("{FIRED_ALERTS_PATH}/{}", encode_path_segment(name)),
        None => FIRED_ALERTS_PATH.to_string(),
    };
    let collection = client
        .get(&path, &[("count", count.to_string())], None, OPERATION)
        .await?
        .into_entries(OPERATION)?;

    let mut alerts = Vec::with_capacity(collection.entry.len());
    for entry in collection.entry {
        let alert = FiredAlert::from_entry(entry, OPERATION)?;
        if filter.matches(&alert) {
            alerts.push(alert);
        }
    }
    Ok(alerts)
}

/// Acknowledge (remove) a fired alert group.
pub async fn acknowledge_alert(client: &SplunkClient, name: &str) -> Result<()> {
    const OPERATION: &str = "acknowledge alert";

    if name.trim().is_empty() {
        return Err(ClientError::validation(OPERATION, "alert name cannot be empty"));
    }
    client
        .delete(
            &format!("{FIRED_ALERTS_PATH}/{}", encode_path_segment(name)),
            &[],
            OPERATION,
        )
        .await?;
    Ok(())
}

/// Create an alert as a scheduled saved search in `app`.
pub async fn create_alert(
    client: &SplunkClient,
    app: &str,
    params: &CreateAlertParams,
) -> Result<()> {
    const OPERATION: &str = "create alert";

    let app = validate_app_name(app)?;
    validate_spl(&params.search)?;
    if params.name.trim().is_empty() {
        return Err(ClientError::validation(OPERATION, "alert name cannot be empty"));
    }

    client
        .post(
            &namespaced(app, "saved/searches"),
            RequestBody::Form(params.to_form()),
            Idempotency::NonIdempotent,
            None,
            OPERATION,
        )
        .await?;
    Ok(())
}
