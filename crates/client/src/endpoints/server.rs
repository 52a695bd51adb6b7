//! Server info, health and raw REST access.

use crate::client::{Params, RequestBody, SplunkClient};
use crate::error::{ClientError, Result};
use crate::models::{HealthInfo, ResponseBody, ServerInfo};
use crate::retry::Idempotency;

pub async fn get_server_info(client: &SplunkClient) -> Result<ServerInfo> {
    const OPERATION: &str = "get server info";

    client
        .get("/services/server/info", &[], None, OPERATION)
        .await?
        .into_first_entry(OPERATION)?
        .into_model(OPERATION)
}

/// splunkd health tree from `/services/server/health/splunkd`.
pub async fn get_health(client: &SplunkClient) -> Result<HealthInfo> {
    const OPERATION: &str = "get server health";

    client
        .get("/services/server/health/splunkd", &[], None, OPERATION)
        .await?
        .into_first_entry(OPERATION)?
        .into_model(OPERATION)
}

fn check_rest_path(path: &str, operation: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(ClientError::validation(
            operation,
            format!("REST path '{path}' must start with '/'"),
        ));
    }
    Ok(())
}

/// GET any REST path and return the classified body.
pub async fn rest_get(
    client: &SplunkClient,
    path: &str,
    params: &Params<'_>,
) -> Result<ResponseBody> {
    const OPERATION: &str = "REST GET";

    check_rest_path(path, OPERATION)?;
    client.get(path, params, None, OPERATION).await
}

/// POST a form to any REST path.
///
/// The target is unknown, so it is treated as non-idempotent unless the
/// caller says otherwise.
pub async fn rest_post(
    client: &SplunkClient,
    path: &str,
    form: Vec<(String, String)>,
    idempotency: Idempotency,
) -> Result<ResponseBody> {
    const OPERATION: &str = "REST POST";

    check_rest_path(path, OPERATION)?;
    client
        .post(path, RequestBody::Form(form), idempotency, None, OPERATION)
        .await
}
