//! Webhook subscription lifecycle and inbound delivery normalization.
//!
//! The remote subscription id is cached in workflow-node static data under
//! a single key; create/check/delete are written to be idempotent so the
//! host can call them on every activation cycle.

use std::collections::HashMap;
use std::sync::Arc;

use annyflow_core::{resource_payload, StaticDataScope, StaticDataStore};
use annyflow_domain::constants::{EVENT_HEADER, TIMESTAMP_HEADER};
use annyflow_domain::{AnnyflowError, Result, WebhookEvent};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::transport::{AnnyClient, RequestOptions};

const SUBSCRIPTION_TYPE: &str = "webhook-subscriptions";
const COLLECTION_PATH: &str = "/api/v1/webhook-subscriptions";
const CACHE_KEY: &str = "webhookId";

/// Manages one remote webhook subscription per (workflow, node) scope.
pub struct WebhookLifecycle {
    client: AnnyClient,
    store: Arc<dyn StaticDataStore>,
    scope: StaticDataScope,
}

impl WebhookLifecycle {
    pub fn new(client: AnnyClient, store: Arc<dyn StaticDataStore>, scope: StaticDataScope) -> Self {
        Self { client, store, scope }
    }

    /// Whether the cached subscription still exists remotely.
    ///
    /// A stale or unverifiable id is dropped from the cache so the next
    /// activation re-creates the subscription.
    pub async fn check_exists(&self) -> bool {
        let Some(id) = self.cached_id() else {
            return false;
        };
        let path = format!("{COLLECTION_PATH}/{id}");
        match self.client.execute(RequestOptions::get(path)).await {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, id = %id, "cached subscription not verifiable, dropping");
                self.store.remove(&self.scope, CACHE_KEY);
                false
            }
        }
    }

    /// Create the remote subscription and cache its id.
    ///
    /// `name` defaults to a label derived from the workflow id.
    pub async fn create(
        &self,
        callback_url: &str,
        name: Option<String>,
        events: &[WebhookEvent],
    ) -> Result<String> {
        let name = name
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("workflow {}", self.scope.workflow_id));
        let events: Vec<Value> =
            events.iter().map(|e| Value::String(e.as_str().to_string())).collect();

        let mut attributes = Map::new();
        attributes.insert("url".to_string(), Value::String(callback_url.to_string()));
        attributes.insert("name".to_string(), Value::String(name));
        attributes.insert("events".to_string(), Value::Array(events));

        let body = resource_payload(SUBSCRIPTION_TYPE, attributes, None, None);
        let response =
            self.client.execute(RequestOptions::post(COLLECTION_PATH).body(body)).await?;

        let id = response
            .pointer("/data/id")
            .or_else(|| response.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                AnnyflowError::Api(format!(
                    "subscription created but no id in response: {response}"
                ))
            })?;

        self.store.set(&self.scope, CACHE_KEY, &id);
        Ok(id)
    }

    /// Delete the remote subscription and clear the cached id.
    ///
    /// No-op without a cached id. A remote delete failure is tolerated (the
    /// subscription may already be gone); the cache is cleared either way,
    /// so a second delete issues no remote call.
    pub async fn delete(&self) -> Result<()> {
        let Some(id) = self.cached_id() else {
            return Ok(());
        };
        let path = format!("{COLLECTION_PATH}/{id}");
        if let Err(err) = self.client.execute(RequestOptions::delete(path)).await {
            warn!(error = %err, id = %id, "remote subscription delete failed, clearing cache anyway");
        }
        self.store.remove(&self.scope, CACHE_KEY);
        Ok(())
    }

    fn cached_id(&self) -> Option<String> {
        self.store.get(&self.scope, CACHE_KEY).filter(|s| !s.is_empty())
    }
}

/// Merge an inbound delivery body with `{event, timestamp}` taken from the
/// platform's delivery headers. Missing headers fall back to `"unknown"`
/// and the current time.
pub fn normalize_delivery(headers: &HashMap<String, String>, body: Value) -> Value {
    let event = header_value(headers, EVENT_HEADER).unwrap_or_else(|| "unknown".to_string());
    let timestamp =
        header_value(headers, TIMESTAMP_HEADER).unwrap_or_else(|| Utc::now().to_rfc3339());

    let mut merged = match body {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            if !other.is_null() {
                map.insert("payload".to_string(), other);
            }
            map
        }
    };
    merged.insert("event".to_string(), Value::String(event));
    merged.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(merged)
}

fn header_value(headers: &HashMap<String, String>, name: &str) -> Option<String> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.clone())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use annyflow_core::InMemoryStaticData;
    use annyflow_domain::{AuthContext, OAuth2Credential, OAuthTokenData};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn lifecycle(server: &MockServer, store: Arc<InMemoryStaticData>) -> WebhookLifecycle {
        let auth = AuthContext::OAuth2(OAuth2Credential {
            oauth_token_data: OAuthTokenData {
                access_token: "test-token".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        let client = AnnyClient::with_base_url(auth, server.uri()).expect("client");
        WebhookLifecycle::new(client, store, StaticDataScope::new("wf-1", "node-1"))
    }

    #[tokio::test]
    async fn create_posts_subscription_and_caches_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/webhook-subscriptions"))
            .and(body_json(json!({
                "data": {
                    "type": "webhook-subscriptions",
                    "attributes": {
                        "url": "https://host/webhook/abc",
                        "name": "workflow wf-1",
                        "events": ["bookings.created", "bookings.checked-in"]
                    }
                }
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "data": { "id": "wh-1" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryStaticData::new());
        let lifecycle = lifecycle(&server, store.clone());
        let id = lifecycle
            .create(
                "https://host/webhook/abc",
                None,
                &[WebhookEvent::BookingCreated, WebhookEvent::BookingCheckedIn],
            )
            .await
            .expect("created");

        assert_eq!(id, "wh-1");
        let scope = StaticDataScope::new("wf-1", "node-1");
        assert_eq!(store.get(&scope, "webhookId"), Some("wh-1".to_string()));
    }

    #[tokio::test]
    async fn create_accepts_flat_id_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "wh-9" })))
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryStaticData::new());
        let lifecycle = lifecycle(&server, store);
        let id = lifecycle
            .create("https://host/webhook/abc", Some("custom".to_string()), &[])
            .await
            .expect("created");
        assert_eq!(id, "wh-9");
    }

    #[tokio::test]
    async fn create_without_id_in_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": {} })))
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryStaticData::new());
        let lifecycle = lifecycle(&server, store.clone());
        let result = lifecycle.create("https://host/webhook/abc", None, &[]).await;

        assert!(matches!(result, Err(AnnyflowError::Api(_))));
        let scope = StaticDataScope::new("wf-1", "node-1");
        assert_eq!(store.get(&scope, "webhookId"), None);
    }

    #[tokio::test]
    async fn check_exists_drops_stale_cache_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/webhook-subscriptions/wh-gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryStaticData::new());
        let scope = StaticDataScope::new("wf-1", "node-1");
        store.set(&scope, "webhookId", "wh-gone");

        let lifecycle = lifecycle(&server, store.clone());
        assert!(!lifecycle.check_exists().await);
        assert_eq!(store.get(&scope, "webhookId"), None);
    }

    #[tokio::test]
    async fn check_exists_without_cached_id_issues_no_call() {
        let server = MockServer::start().await;
        let store = Arc::new(InMemoryStaticData::new());
        let lifecycle = lifecycle(&server, store);

        assert!(!lifecycle.check_exists().await);
        assert!(server.received_requests().await.map(|r| r.is_empty()).unwrap_or(true));
    }

    #[tokio::test]
    async fn second_delete_issues_no_remote_call() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/webhook-subscriptions/wh-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryStaticData::new());
        let scope = StaticDataScope::new("wf-1", "node-1");
        store.set(&scope, "webhookId", "wh-1");

        let lifecycle = lifecycle(&server, store);
        lifecycle.delete().await.expect("first delete");
        lifecycle.delete().await.expect("second delete");
    }

    #[tokio::test]
    async fn delete_tolerates_remote_failure_but_clears_cache() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(InMemoryStaticData::new());
        let scope = StaticDataScope::new("wf-1", "node-1");
        store.set(&scope, "webhookId", "wh-1");

        let lifecycle = lifecycle(&server, store.clone());
        lifecycle.delete().await.expect("delete");
        assert_eq!(store.get(&scope, "webhookId"), None);
    }

    #[test]
    fn normalize_delivery_merges_headers_into_body() {
        let mut headers = HashMap::new();
        headers.insert("X-Anny-Event".to_string(), "bookings.created".to_string());
        headers.insert("x-anny-timestamp".to_string(), "2026-08-24T10:00:00Z".to_string());

        let merged = normalize_delivery(&headers, json!({ "data": { "id": "bk-1" } }));

        assert_eq!(merged["event"], "bookings.created");
        assert_eq!(merged["timestamp"], "2026-08-24T10:00:00Z");
        assert_eq!(merged["data"]["id"], "bk-1");
    }

    #[test]
    fn normalize_delivery_defaults_missing_headers() {
        let merged = normalize_delivery(&HashMap::new(), json!({}));
        assert_eq!(merged["event"], "unknown");
        assert!(merged["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
    }
}
