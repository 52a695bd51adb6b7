//! Installed apps under `/services/apps/local`.

use crate::client::{RequestBody, SplunkClient};
use crate::endpoints::{encode_path_segment, flag};
use crate::error::Result;
use crate::models::App;
use crate::retry::Idempotency;
use crate::validators::validate_app_name;

const APPS_PATH: &str = "/services/apps/local";

fn app_path(name: &str) -> Result<String> {
    let name = validate_app_name(name)?;
    Ok(format!("{APPS_PATH}/{}", encode_path_segment(name)))
}

pub async fn list_apps(client: &SplunkClient, count: u64) -> Result<Vec<App>> {
    const OPERATION: &str = "list apps";

    client
        .get(APPS_PATH, &[("count", count.to_string())], None, OPERATION)
        .await?
        .into_entries(OPERATION)?
        .entry
        .into_iter()
        .map(|entry| entry.into_model(OPERATION))
        .collect()
}

pub async fn get_app(client: &SplunkClient, name: &str) -> Result<App> {
    const OPERATION: &str = "get app";

    client
        .get(&app_path(name)?, &[], None, OPERATION)
        .await?
        .into_first_entry(OPERATION)?
        .into_model(OPERATION)
}

/// Enable or disable an app. Splunk may need a restart to apply it.
pub async fn set_app_disabled(client: &SplunkClient, name: &str, disabled: bool) -> Result<()> {
    let operation = if disabled { "disable app" } else { "enable app" };

    client
        .post(
            &app_path(name)?,
            RequestBody::form([("disabled", flag(disabled))]),
            Idempotency::Idempotent,
            None,
            operation,
        )
        .await?;
    Ok(())
}

/// Remove an app from the server.
pub async fn uninstall_app(client: &SplunkClient, name: &str) -> Result<()> {
    const OPERATION: &str = "uninstall app";

    client.delete(&app_path(name)?, &[], OPERATION).await?;
    Ok(())
}
