//! Availability lookups.
//!
//! Interval math happens remotely; these handlers only shape the query.
//! All three endpoints speak plain JSON in both directions, unlike the
//! catalog resources.

use annyflow_domain::{AnnyflowError, Result};
use serde_json::Value;

use crate::anny::transport::{AnnyClient, RequestOptions};

#[derive(Debug, Clone)]
pub enum AvailabilityOperation {
    UpcomingIntervals(IntervalQuery),
    StartTimes(StartTimesQuery),
    EndTimes(EndTimesQuery),
}

/// Query for the cursor-paginated interval listing. `start_date` carries the
/// cursor echoed back by the previous page; leave it unset for the first
/// page.
#[derive(Debug, Clone, Default)]
pub struct IntervalQuery {
    pub service_id: String,
    pub timezone: String,
    pub resource_id: Option<String>,
    pub quantity: Option<u32>,
    pub start_date: Option<String>,
}

/// Bookable start times on a single date.
#[derive(Debug, Clone, Default)]
pub struct StartTimesQuery {
    pub service_id: String,
    pub timezone: String,
    pub date: String,
    pub resource_id: Option<String>,
    pub quantity: Option<u32>,
}

/// Valid end times for a booking starting at a given datetime.
#[derive(Debug, Clone, Default)]
pub struct EndTimesQuery {
    pub service_id: String,
    pub timezone: String,
    pub start: String,
    pub resource_id: Option<String>,
    pub quantity: Option<u32>,
}

pub(crate) async fn execute(
    client: &AnnyClient,
    operation: AvailabilityOperation,
) -> Result<Value> {
    match operation {
        AvailabilityOperation::UpcomingIntervals(query) => intervals(client, query).await,
        AvailabilityOperation::StartTimes(query) => start_times(client, query).await,
        AvailabilityOperation::EndTimes(query) => end_times(client, query).await,
    }
}

/// Cursor for the next interval page, if the current page echoed one.
pub fn next_interval_cursor(page: &Value) -> Option<String> {
    page.get("page_end_date")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

async fn intervals(client: &AnnyClient, query: IntervalQuery) -> Result<Value> {
    let mut params = base_params(&query.service_id, &query.timezone)?;
    push_scope(&mut params, query.resource_id, query.quantity);
    if let Some(cursor) = query.start_date.filter(|s| !s.is_empty()) {
        params.push(("start_date".to_string(), cursor));
    }
    client
        .execute(RequestOptions::get("/api/v1/availability/intervals").query(params).plain_json())
        .await
}

async fn start_times(client: &AnnyClient, query: StartTimesQuery) -> Result<Value> {
    if query.date.is_empty() {
        return Err(AnnyflowError::InvalidInput("date is required".to_string()));
    }
    let mut params = base_params(&query.service_id, &query.timezone)?;
    params.push(("date".to_string(), query.date));
    push_scope(&mut params, query.resource_id, query.quantity);
    client
        .execute(RequestOptions::get("/api/v1/availability/start-times").query(params).plain_json())
        .await
}

async fn end_times(client: &AnnyClient, query: EndTimesQuery) -> Result<Value> {
    if query.start.is_empty() {
        return Err(AnnyflowError::InvalidInput("start is required".to_string()));
    }
    let mut params = base_params(&query.service_id, &query.timezone)?;
    params.push(("start".to_string(), query.start));
    push_scope(&mut params, query.resource_id, query.quantity);
    client
        .execute(RequestOptions::get("/api/v1/availability/end-times").query(params).plain_json())
        .await
}

fn base_params(service_id: &str, timezone: &str) -> Result<Vec<(String, String)>> {
    if service_id.is_empty() {
        return Err(AnnyflowError::InvalidInput("service id is required".to_string()));
    }
    if timezone.is_empty() {
        return Err(AnnyflowError::InvalidInput("timezone is required".to_string()));
    }
    Ok(vec![
        ("service_id".to_string(), service_id.to_string()),
        ("timezone".to_string(), timezone.to_string()),
    ])
}

fn push_scope(
    params: &mut Vec<(String, String)>,
    resource_id: Option<String>,
    quantity: Option<u32>,
) {
    if let Some(resource_id) = resource_id.filter(|s| !s.is_empty()) {
        params.push(("resource_id".to_string(), resource_id));
    }
    if let Some(quantity) = quantity {
        params.push(("quantity".to_string(), quantity.to_string()));
    }
}
