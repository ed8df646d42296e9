//! Typeahead list-search providers for resource pickers.
//!
//! Searches are best-effort UI helpers: any failure (network, auth,
//! malformed body) degrades to an empty result list instead of an error,
//! so a broken picker never blocks the workflow editor.

use annyflow_domain::constants::MAX_PAGE_SIZE;
use annyflow_domain::ResourceKind;
use serde_json::Value;
use tracing::debug;

use super::transport::{AnnyClient, RequestOptions};

/// One picker entry: display label plus the record id used as the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSearchItem {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListSearchResult {
    pub results: Vec<ListSearchItem>,
    /// Opaque token for the next page; `None` on the last page.
    pub pagination_token: Option<String>,
}

/// Fetch one page of picker entries for a resource kind.
///
/// `pagination_token` is the token returned by the previous call (a page
/// number in string form); `filter` is the user's free-text input.
pub async fn list_search(
    client: &AnnyClient,
    kind: ResourceKind,
    filter: Option<&str>,
    pagination_token: Option<&str>,
) -> ListSearchResult {
    let page: u64 = pagination_token.and_then(|t| t.parse().ok()).unwrap_or(1);

    let mut params = vec![
        ("page[size]".to_string(), MAX_PAGE_SIZE.to_string()),
        ("page[number]".to_string(), page.to_string()),
    ];
    if let Some(filter) = filter.filter(|s| !s.is_empty()) {
        params.push(("filter[search]".to_string(), filter.to_string()));
    }

    let response = match client
        .execute(RequestOptions::get(kind.collection_path()).query(params))
        .await
    {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, resource = kind.jsonapi_type(), "list search failed");
            return ListSearchResult::default();
        }
    };

    let results = response
        .get("data")
        .and_then(Value::as_array)
        .map(|records| records.iter().filter_map(|record| to_item(kind, record)).collect())
        .unwrap_or_default();

    ListSearchResult { results, pagination_token: next_page_token(&response, page) }
}

/// `String(page + 1)` while the server reports more pages, else `None`.
fn next_page_token(response: &Value, page: u64) -> Option<String> {
    let meta = response.get("meta")?;
    let current = meta.get("current_page").and_then(Value::as_u64)?;
    let last = meta.get("last_page").and_then(Value::as_u64)?;
    (current < last).then(|| (page + 1).to_string())
}

fn to_item(kind: ResourceKind, record: &Value) -> Option<ListSearchItem> {
    let id = record.get("id").and_then(Value::as_str)?.to_string();
    // Records arrive either flattened or still wrapped in `attributes`.
    let fields = record.get("attributes").unwrap_or(record);
    Some(ListSearchItem { name: label(kind, &id, fields), value: id })
}

fn label(kind: ResourceKind, id: &str, fields: &Value) -> String {
    match kind {
        ResourceKind::Customer => customer_label(id, fields),
        ResourceKind::Booking => booking_label(id, fields),
        ResourceKind::Order => numbered_label("Order", id, fields),
        ResourceKind::Invoice => numbered_label("Invoice", id, fields),
        ResourceKind::PlanSubscription => numbered_label("Subscription", id, fields),
        ResourceKind::Service | ResourceKind::Resource => fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(id)
            .to_string(),
    }
}

/// "First Last (email)", degrading to whichever parts exist.
fn customer_label(id: &str, fields: &Value) -> String {
    let name = ["given_name", "family_name"]
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let name = if name.is_empty() {
        fields.get("name").and_then(Value::as_str).unwrap_or_default().to_string()
    } else {
        name
    };
    let email = fields.get("email").and_then(Value::as_str).unwrap_or_default();

    match (name.is_empty(), email.is_empty()) {
        (false, false) => format!("{name} ({email})"),
        (false, true) => name,
        (true, false) => email.to_string(),
        (true, true) => id.to_string(),
    }
}

/// "number | description | status", skipping empty parts.
fn booking_label(id: &str, fields: &Value) -> String {
    let parts: Vec<&str> = ["number", "description", "status"]
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        id.to_string()
    } else {
        parts.join(" | ")
    }
}

fn numbered_label(prefix: &str, id: &str, fields: &Value) -> String {
    match fields.get("number").and_then(Value::as_str).filter(|s| !s.is_empty()) {
        Some(number) => format!("{prefix} #{number}"),
        None => format!("{prefix} {id}"),
    }
}

#[cfg(test)]
mod tests {
    use annyflow_domain::{AuthContext, OAuth2Credential, OAuthTokenData};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(server: &MockServer) -> AnnyClient {
        let auth = AuthContext::OAuth2(OAuth2Credential {
            oauth_token_data: OAuthTokenData {
                access_token: "test-token".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        AnnyClient::with_base_url(auth, server.uri()).expect("client")
    }

    #[tokio::test]
    async fn labels_customers_with_name_and_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/customers"))
            .and(query_param("page[size]", "30"))
            .and(query_param("page[number]", "1"))
            .and(query_param("filter[search]", "ada"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "id": "cu-1",
                        "attributes": {
                            "given_name": "Ada",
                            "family_name": "Lovelace",
                            "email": "ada@example.com"
                        }
                    },
                    { "id": "cu-2", "attributes": { "email": "bare@example.com" } }
                ],
                "meta": { "current_page": 1, "last_page": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = list_search(&client, ResourceKind::Customer, Some("ada"), None).await;

        assert_eq!(result.results[0].name, "Ada Lovelace (ada@example.com)");
        assert_eq!(result.results[0].value, "cu-1");
        assert_eq!(result.results[1].name, "bare@example.com");
        assert!(result.pagination_token.is_none());
    }

    #[tokio::test]
    async fn emits_next_page_token_while_pages_remain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/services"))
            .and(query_param("page[number]", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "svc-1", "attributes": { "name": "Desk" } }],
                "meta": { "current_page": 2, "last_page": 5 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = list_search(&client, ResourceKind::Service, None, Some("2")).await;

        assert_eq!(result.results[0].name, "Desk");
        assert_eq!(result.pagination_token, Some("3".to_string()));
    }

    #[tokio::test]
    async fn booking_labels_join_non_empty_parts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/bookings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "id": "bk-1",
                        "attributes": { "number": "B-100", "status": "confirmed" }
                    }
                ],
                "meta": { "current_page": 1, "last_page": 1 }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = list_search(&client, ResourceKind::Booking, None, None).await;
        assert_eq!(result.results[0].name, "B-100 | confirmed");
    }

    #[tokio::test]
    async fn order_and_invoice_use_numbered_labels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "or-1", "attributes": { "number": "2026-001" } }],
                "meta": { "current_page": 1, "last_page": 1 }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = list_search(&client, ResourceKind::Order, None, None).await;
        assert_eq!(result.results[0].name, "Order #2026-001");
    }

    #[tokio::test]
    async fn remote_failure_degrades_to_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = list_search(&client, ResourceKind::Invoice, None, None).await;

        assert!(result.results.is_empty());
        assert!(result.pagination_token.is_none());
    }

    #[tokio::test]
    async fn malformed_token_restarts_at_page_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("page[number]", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [],
                "meta": { "current_page": 1, "last_page": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        list_search(&client, ResourceKind::Resource, None, Some("not-a-number")).await;
    }
}
