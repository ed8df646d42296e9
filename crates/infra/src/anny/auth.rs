//! OAuth2 pre-authentication hook.
//!
//! Runs once per credential validation/refresh cycle, before dependent
//! calls: resolves the active organization of the authenticated user so the
//! host can cache it onto the credential record. Subsequent calls are then
//! scoped with the `o` query parameter.

use annyflow_domain::{AnnyflowError, Region, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::http::HttpClient;

/// Fetch the authenticated user and extract their active organization id.
///
/// Resolves to an empty string when the user has no active organization or
/// the response omits the relationship at any level; callers treat an empty
/// value as "no organization scoping".
pub async fn resolve_organization_id(
    http: &HttpClient,
    region: Region,
    access_token: &str,
) -> Result<String> {
    let url = format!("{}/api/v1/user", region.base_url());
    resolve_against(http, &url, access_token).await
}

/// Same as [`resolve_organization_id`] but against an explicit user
/// endpoint (tests, self-hosted deployments).
pub async fn resolve_against(http: &HttpClient, url: &str, access_token: &str) -> Result<String> {
    let request = http
        .request(Method::GET, url)
        .query(&[("include", "active_organization")])
        .header("Accept", "application/json")
        .bearer_auth(access_token);

    let response = http.send(request).await?;
    let status = response.status();
    if !status.is_success() {
        debug!(status = status.as_u16(), "user lookup failed during pre-auth");
        return Err(AnnyflowError::Auth(format!(
            "pre-authentication user lookup failed with status {}",
            status.as_u16()
        )));
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    Ok(extract_organization_id(&body))
}

/// Walk `data.relationships.active_organization.data.id`, tolerating
/// absence at every step.
fn extract_organization_id(body: &Value) -> String {
    body.get("data")
        .and_then(|data| data.get("relationships"))
        .and_then(|rels| rels.get("active_organization"))
        .and_then(|org| org.get("data"))
        .and_then(|data| data.get("id"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
