//! Resource operation handlers.
//!
//! One operation enum per writable resource (booking, customer,
//! availability); the five read-only resources share [`ReadOperation`]
//! driven by the domain catalog. Dispatch happens through [`execute`]; the
//! host's per-item loop maps onto [`run_items`].

pub mod availability;
pub mod booking;
pub mod customer;

use annyflow_core::{simplify_records, ListQuery};
use annyflow_domain::{ResourceKind, Result};
use serde_json::{json, Value};
use tracing::warn;

pub use availability::AvailabilityOperation;
pub use booking::{BookingCreate, BookingOperation, BookingUpdate};
pub use customer::{CustomerCreate, CustomerOperation, CustomerUpdate};

use super::transport::{AnnyClient, RequestOptions};

/// Caller-supplied options for a `getAll` operation.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub page_size: u32,
    pub page_number: u32,
    /// Relation expansion; `None` applies the per-resource default.
    pub include: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub custom_filters: Vec<(String, String)>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: annyflow_domain::constants::DEFAULT_PAGE_SIZE,
            page_number: 1,
            include: None,
            search: None,
            sort: None,
            custom_filters: Vec::new(),
        }
    }
}

impl ListOptions {
    /// Build the outbound query, filling in the resource's default include
    /// when the caller left the field blank.
    fn into_query(self, kind: ResourceKind) -> ListQuery {
        let include =
            self.include.filter(|s| !s.is_empty()).unwrap_or_else(|| kind.default_include().to_string());
        ListQuery::new()
            .page_size(self.page_size)
            .page_number(self.page_number)
            .include(include)
            .search(self.search.unwrap_or_default())
            .sort(self.sort.unwrap_or_default())
            .filters(self.custom_filters)
    }
}

/// Read-only operation shared by all catalog resources.
#[derive(Debug, Clone)]
pub enum ReadOperation {
    Get { id: String, include: Option<String> },
    GetAll(ListOptions),
}

/// One host-facing (resource, operation) pair.
#[derive(Debug, Clone)]
pub enum Operation {
    Booking(BookingOperation),
    Customer(CustomerOperation),
    Order(ReadOperation),
    Invoice(ReadOperation),
    Service(ReadOperation),
    Resource(ReadOperation),
    PlanSubscription(ReadOperation),
    Availability(AvailabilityOperation),
}

impl Operation {
    /// Resource kind eligible for simplification; `None` for operations
    /// the simplify toggle never applies to.
    fn simplifiable_kind(&self) -> Option<ResourceKind> {
        match self {
            Self::Booking(BookingOperation::Get { .. } | BookingOperation::GetAll(_)) => {
                Some(ResourceKind::Booking)
            }
            Self::Customer(CustomerOperation::Get { .. } | CustomerOperation::GetAll(_)) => {
                Some(ResourceKind::Customer)
            }
            Self::Order(_) => Some(ResourceKind::Order),
            Self::Invoice(_) => Some(ResourceKind::Invoice),
            Self::Service(_) => Some(ResourceKind::Service),
            Self::Resource(_) => Some(ResourceKind::Resource),
            Self::PlanSubscription(_) => Some(ResourceKind::PlanSubscription),
            _ => None,
        }
    }
}

/// One input item of the host's execution loop.
#[derive(Debug, Clone)]
pub struct ExecutionItem {
    pub operation: Operation,
    pub simplify: bool,
}

/// Execute one operation, returning host output items.
///
/// Collection responses fan out into one item per record; single-record
/// responses produce one item.
pub async fn execute(
    client: &AnnyClient,
    operation: Operation,
    simplify: bool,
) -> Result<Vec<Value>> {
    let kind = operation.simplifiable_kind();
    let response = dispatch(client, operation).await?;

    let response = match (simplify, kind) {
        (true, Some(kind)) => {
            // Simplification applies to the data portion, never the envelope.
            let payload = response.get("data").cloned().unwrap_or(response);
            simplify_records(kind, payload)
        }
        _ => response,
    };

    Ok(match response {
        Value::Array(items) => items,
        single => vec![single],
    })
}

/// Host execution loop: items are processed independently and in order.
///
/// With `continue_on_fail`, a failed item is captured as `{"error": …}` and
/// processing continues; otherwise the first failure aborts the remainder.
pub async fn run_items(
    client: &AnnyClient,
    items: Vec<ExecutionItem>,
    continue_on_fail: bool,
) -> Result<Vec<Value>> {
    let mut output = Vec::new();
    for item in items {
        match execute(client, item.operation, item.simplify).await {
            Ok(values) => output.extend(values),
            Err(err) if continue_on_fail => {
                warn!(error = %err, "item failed, continuing");
                output.push(json!({ "error": err.to_string() }));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(output)
}

async fn dispatch(client: &AnnyClient, operation: Operation) -> Result<Value> {
    match operation {
        Operation::Booking(op) => booking::execute(client, op).await,
        Operation::Customer(op) => customer::execute(client, op).await,
        Operation::Order(op) => read(client, ResourceKind::Order, op).await,
        Operation::Invoice(op) => read(client, ResourceKind::Invoice, op).await,
        Operation::Service(op) => read(client, ResourceKind::Service, op).await,
        Operation::Resource(op) => read(client, ResourceKind::Resource, op).await,
        Operation::PlanSubscription(op) => {
            read(client, ResourceKind::PlanSubscription, op).await
        }
        Operation::Availability(op) => availability::execute(client, op).await,
    }
}

async fn read(client: &AnnyClient, kind: ResourceKind, operation: ReadOperation) -> Result<Value> {
    match operation {
        ReadOperation::Get { id, include } => get_record(client, kind, &id, include).await,
        ReadOperation::GetAll(options) => get_all(client, kind, options).await,
    }
}

/// Fetch one record, expanding the default include when none is given.
pub(crate) async fn get_record(
    client: &AnnyClient,
    kind: ResourceKind,
    id: &str,
    include: Option<String>,
) -> Result<Value> {
    let include =
        include.filter(|s| !s.is_empty()).unwrap_or_else(|| kind.default_include().to_string());
    client
        .fetch(RequestOptions::get(kind.record_path(id)).query_param("include", include))
        .await
}

/// Fetch one page of a collection and return its data portion.
pub(crate) async fn get_all(
    client: &AnnyClient,
    kind: ResourceKind,
    options: ListOptions,
) -> Result<Value> {
    let query = options.into_query(kind);
    let response = client
        .fetch(RequestOptions::get(kind.collection_path()).query(query.into_params()))
        .await?;
    Ok(match response {
        Value::Object(mut envelope) => envelope
            .remove("data")
            .unwrap_or_else(|| Value::Object(envelope)),
        other => other,
    })
}
