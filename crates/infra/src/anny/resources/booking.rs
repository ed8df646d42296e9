//! Booking operations.

use annyflow_core::{relationship_ref, resource_payload};
use annyflow_domain::{ResourceKind, Result};
use serde_json::{Map, Value};

use super::{get_all, get_record, ListOptions};
use crate::anny::transport::{AnnyClient, RequestOptions};

const KIND: ResourceKind = ResourceKind::Booking;

#[derive(Debug, Clone)]
pub enum BookingOperation {
    GetAll(ListOptions),
    Get { id: String, include: Option<String> },
    Create(BookingCreate),
    Update { id: String, fields: BookingUpdate },
    Cancel { id: String },
    CheckIn { id: String },
    CheckOut { id: String },
}

/// Fields for creating a booking. The service relationship is required;
/// customer and resource are optional.
#[derive(Debug, Clone)]
pub struct BookingCreate {
    pub service_id: String,
    pub starts_at: String,
    pub ends_at: String,
    pub customer_id: Option<String>,
    pub resource_id: Option<String>,
    pub notes: Option<String>,
    /// Bypass availability checks on the remote side.
    pub instant_booking: bool,
}

/// Partial attribute patch for a booking.
#[derive(Debug, Clone, Default)]
pub struct BookingUpdate {
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

pub(crate) async fn execute(client: &AnnyClient, operation: BookingOperation) -> Result<Value> {
    match operation {
        BookingOperation::GetAll(options) => get_all(client, KIND, options).await,
        BookingOperation::Get { id, include } => get_record(client, KIND, &id, include).await,
        BookingOperation::Create(fields) => create(client, fields).await,
        BookingOperation::Update { id, fields } => update(client, &id, fields).await,
        BookingOperation::Cancel { id } => action(client, &id, "cancel").await,
        BookingOperation::CheckIn { id } => action(client, &id, "check-in").await,
        BookingOperation::CheckOut { id } => action(client, &id, "check-out").await,
    }
}

async fn create(client: &AnnyClient, fields: BookingCreate) -> Result<Value> {
    let mut attributes = Map::new();
    attributes.insert("starts_at".to_string(), Value::String(fields.starts_at));
    attributes.insert("ends_at".to_string(), Value::String(fields.ends_at));
    if let Some(notes) = fields.notes.filter(|s| !s.is_empty()) {
        attributes.insert("notes".to_string(), Value::String(notes));
    }
    if fields.instant_booking {
        attributes.insert("instant_booking".to_string(), Value::Bool(true));
    }

    let mut relationships = Map::new();
    relationships
        .insert("service".to_string(), relationship_ref("services", &fields.service_id));
    if let Some(customer_id) = fields.customer_id.filter(|s| !s.is_empty()) {
        relationships.insert("customer".to_string(), relationship_ref("customers", &customer_id));
    }
    if let Some(resource_id) = fields.resource_id.filter(|s| !s.is_empty()) {
        relationships.insert("resource".to_string(), relationship_ref("resources", &resource_id));
    }

    let body = resource_payload(KIND.jsonapi_type(), attributes, Some(relationships), None);
    client.execute(RequestOptions::post(KIND.collection_path()).body(body)).await
}

async fn update(client: &AnnyClient, id: &str, fields: BookingUpdate) -> Result<Value> {
    let mut attributes = Map::new();
    if let Some(starts_at) = fields.starts_at.filter(|s| !s.is_empty()) {
        attributes.insert("starts_at".to_string(), Value::String(starts_at));
    }
    if let Some(ends_at) = fields.ends_at.filter(|s| !s.is_empty()) {
        attributes.insert("ends_at".to_string(), Value::String(ends_at));
    }
    if let Some(notes) = fields.notes.filter(|s| !s.is_empty()) {
        attributes.insert("notes".to_string(), Value::String(notes));
    }
    if let Some(status) = fields.status.filter(|s| !s.is_empty()) {
        attributes.insert("status".to_string(), Value::String(status));
    }

    let body = resource_payload(KIND.jsonapi_type(), attributes, None, Some(id));
    client.execute(RequestOptions::patch(KIND.record_path(id)).body(body)).await
}

/// State-transition sub-path (cancel / check-in / check-out), issued as
/// POST with an empty body.
async fn action(client: &AnnyClient, id: &str, action: &str) -> Result<Value> {
    let path = format!("{}/{}", KIND.record_path(id), action);
    client.execute(RequestOptions::post(path)).await
}
