//! Customer operations.

use annyflow_core::resource_payload;
use annyflow_domain::{ResourceKind, Result};
use serde_json::{json, Map, Value};

use super::{get_all, get_record, ListOptions};
use crate::anny::transport::{AnnyClient, RequestOptions};

const KIND: ResourceKind = ResourceKind::Customer;

#[derive(Debug, Clone)]
pub enum CustomerOperation {
    GetAll(ListOptions),
    Get { id: String, include: Option<String> },
    Create(CustomerCreate),
    Update { id: String, fields: CustomerUpdate },
    Delete { id: String },
}

/// Fields for creating a customer. Only the email is required.
#[derive(Debug, Clone, Default)]
pub struct CustomerCreate {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

/// Partial attribute patch for a customer.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

pub(crate) async fn execute(client: &AnnyClient, operation: CustomerOperation) -> Result<Value> {
    match operation {
        CustomerOperation::GetAll(options) => get_all(client, KIND, options).await,
        CustomerOperation::Get { id, include } => get_record(client, KIND, &id, include).await,
        CustomerOperation::Create(fields) => create(client, fields).await,
        CustomerOperation::Update { id, fields } => update(client, &id, fields).await,
        CustomerOperation::Delete { id } => delete(client, &id).await,
    }
}

async fn create(client: &AnnyClient, fields: CustomerCreate) -> Result<Value> {
    let mut attributes = Map::new();
    attributes.insert("email".to_string(), Value::String(fields.email));
    insert_optional(&mut attributes, "first_name", fields.first_name);
    insert_optional(&mut attributes, "last_name", fields.last_name);
    insert_optional(&mut attributes, "phone", fields.phone);
    insert_optional(&mut attributes, "company", fields.company);
    insert_optional(&mut attributes, "notes", fields.notes);

    let body = resource_payload(KIND.jsonapi_type(), attributes, None, None);
    client.execute(RequestOptions::post(KIND.collection_path()).body(body)).await
}

async fn update(client: &AnnyClient, id: &str, fields: CustomerUpdate) -> Result<Value> {
    let mut attributes = Map::new();
    insert_optional(&mut attributes, "email", fields.email);
    insert_optional(&mut attributes, "first_name", fields.first_name);
    insert_optional(&mut attributes, "last_name", fields.last_name);
    insert_optional(&mut attributes, "phone", fields.phone);
    insert_optional(&mut attributes, "company", fields.company);
    insert_optional(&mut attributes, "notes", fields.notes);

    let body = resource_payload(KIND.jsonapi_type(), attributes, None, Some(id));
    client.execute(RequestOptions::patch(KIND.record_path(id)).body(body)).await
}

/// The remote delete returns an empty body; emit a synthetic record so the
/// workflow still produces one output item per input item.
async fn delete(client: &AnnyClient, id: &str) -> Result<Value> {
    client.execute(RequestOptions::delete(KIND.record_path(id))).await?;
    Ok(json!({ "deleted": true, "id": id }))
}

fn insert_optional(attributes: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value.filter(|s| !s.is_empty()) {
        attributes.insert(key.to_string(), Value::String(value));
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::tests::test_client;
    use super::*;

    #[tokio::test]
    async fn create_sends_flat_attributes_without_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/customers"))
            .and(body_json(json!({
                "data": {
                    "type": "customers",
                    "attributes": { "email": "a@b.com", "first_name": "Ada" }
                }
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "data": { "id": "cu-1" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let fields = CustomerCreate {
            email: "a@b.com".to_string(),
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };
        create(&client, fields).await.expect("created");
    }

    #[tokio::test]
    async fn update_skips_empty_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/customers/cu-1"))
            .and(body_json(json!({
                "data": {
                    "type": "customers",
                    "id": "cu-1",
                    "attributes": { "phone": "+49 30 1234" }
                }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": "cu-1" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let fields = CustomerUpdate {
            phone: Some("+49 30 1234".to_string()),
            email: Some(String::new()),
            ..Default::default()
        };
        update(&client, "cu-1", fields).await.expect("updated");
    }

    #[tokio::test]
    async fn delete_returns_synthetic_record() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/customers/cu-9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = execute(&client, CustomerOperation::Delete { id: "cu-9".to_string() })
            .await
            .expect("deleted");
        assert_eq!(response, json!({ "deleted": true, "id": "cu-9" }));
    }
}
