//! Per-resource response simplification.
//!
//! Projects full (or normalized) records down to a compact summary shape.
//! Fields that are absent or null in the source are omitted from the output
//! entirely, never emitted as null. Nested relations are simplified one
//! level deep; relation values are taken from the `resolved` join when
//! present, falling back to a same-named inline object.

use annyflow_domain::ResourceKind;
use serde_json::{Map, Value};

/// Simplify the `data` portion of a get/getAll response.
///
/// Accepts a single record or an array of records; anything that is not a
/// JSON object passes through unmodified.
pub fn simplify_records(kind: ResourceKind, value: Value) -> Value {
    match value {
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|item| simplify_records(kind, item)).collect())
        }
        Value::Object(_) => simplify_one(kind, &value),
        other => other,
    }
}

fn simplify_one(kind: ResourceKind, record: &Value) -> Value {
    let mut out = Map::new();
    match kind {
        ResourceKind::Booking => {
            pick(record, &mut out, BOOKING_FIELDS);
            sub(record, &mut out, "resource", ResourceKind::Resource);
            sub(record, &mut out, "service", ResourceKind::Service);
            sub(record, &mut out, "customer", ResourceKind::Customer);
        }
        ResourceKind::Customer => {
            pick(record, &mut out, CUSTOMER_FIELDS);
        }
        ResourceKind::Order => {
            pick(record, &mut out, ORDER_FIELDS);
            sub(record, &mut out, "customer", ResourceKind::Customer);
            sub(record, &mut out, "bookings", ResourceKind::Booking);
            sub(record, &mut out, "invoice", ResourceKind::Invoice);
        }
        ResourceKind::Invoice => {
            pick(record, &mut out, INVOICE_FIELDS);
        }
        ResourceKind::Service => {
            pick(record, &mut out, SERVICE_FIELDS);
        }
        ResourceKind::Resource => {
            pick(record, &mut out, RESOURCE_FIELDS);
        }
        ResourceKind::PlanSubscription => {
            pick(record, &mut out, PLAN_SUBSCRIPTION_FIELDS);
            sub(record, &mut out, "customer", ResourceKind::Customer);
            sub_generic(record, &mut out, "plan");
        }
    }
    Value::Object(out)
}

const BOOKING_FIELDS: &[&str] = &[
    "id",
    "number",
    "status",
    "description",
    "starts_at",
    "ends_at",
    "start_date",
    "end_date",
    "notes",
];

const CUSTOMER_FIELDS: &[&str] =
    &["id", "name", "email", "given_name", "family_name", "phone", "company"];

const ORDER_FIELDS: &[&str] = &["id", "number", "status", "total", "currency", "created_at"];

const INVOICE_FIELDS: &[&str] =
    &["id", "number", "status", "total", "currency", "issued_at", "due_at"];

const SERVICE_FIELDS: &[&str] = &["id", "name", "description", "duration", "price"];

const RESOURCE_FIELDS: &[&str] = &["id", "name", "description", "status", "capacity"];

const PLAN_SUBSCRIPTION_FIELDS: &[&str] =
    &["id", "number", "status", "starts_at", "ends_at"];

/// Copy the listed fields, skipping absent and null values.
fn pick(record: &Value, out: &mut Map<String, Value>, fields: &[&str]) {
    for field in fields {
        if let Some(value) = record.get(*field) {
            if !value.is_null() {
                out.insert((*field).to_string(), value.clone());
            }
        }
    }
}

/// Simplify a one-level-deep relation (object or array of objects).
fn sub(record: &Value, out: &mut Map<String, Value>, name: &str, kind: ResourceKind) {
    let Some(related) = relation_value(record, name) else {
        return;
    };
    match related {
        Value::Array(items) => {
            let simplified: Vec<Value> =
                items.iter().filter(|item| item.is_object()).map(|item| simplify_one(kind, item)).collect();
            if !simplified.is_empty() {
                out.insert(name.to_string(), Value::Array(simplified));
            }
        }
        related @ Value::Object(_) => {
            out.insert(name.to_string(), simplify_one(kind, related));
        }
        _ => {}
    }
}

/// Relation with no dedicated projection: keep id/name/type when present.
fn sub_generic(record: &Value, out: &mut Map<String, Value>, name: &str) {
    let Some(related) = relation_value(record, name) else {
        return;
    };
    if related.is_object() {
        let mut compact = Map::new();
        pick(related, &mut compact, &["id", "type", "name"]);
        if !compact.is_empty() {
            out.insert(name.to_string(), Value::Object(compact));
        }
    }
}

/// Relation lookup: prefer the `resolved` join, fall back to an inline
/// same-named value.
fn relation_value<'a>(record: &'a Value, name: &str) -> Option<&'a Value> {
    record
        .get("resolved")
        .and_then(|resolved| resolved.get(name))
        .or_else(|| record.get(name))
        .filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn omits_absent_relations_entirely() {
        let booking = json!({
            "id": "bk-1",
            "number": "B-100",
            "status": "confirmed",
            "resource": null
        });
        let simplified = simplify_records(ResourceKind::Booking, booking);

        assert_eq!(simplified["id"], "bk-1");
        assert!(simplified.get("resource").is_none());
        assert!(simplified.get("service").is_none());
    }

    #[test]
    fn null_scalars_are_dropped() {
        let customer = json!({ "id": "cu-1", "email": "a@b.com", "phone": null });
        let simplified = simplify_records(ResourceKind::Customer, customer);
        assert_eq!(simplified, json!({ "id": "cu-1", "email": "a@b.com" }));
    }

    #[test]
    fn booking_relations_come_from_resolved_join() {
        let booking = json!({
            "id": "bk-1",
            "status": "confirmed",
            "resolved": {
                "customer": { "id": "cu-1", "email": "a@b.com", "internal_flag": true },
                "service": { "id": "svc-1", "name": "Massage", "secret": "x" }
            }
        });
        let simplified = simplify_records(ResourceKind::Booking, booking);

        assert_eq!(
            simplified["customer"],
            json!({ "id": "cu-1", "email": "a@b.com" })
        );
        assert_eq!(simplified["service"], json!({ "id": "svc-1", "name": "Massage" }));
    }

    #[test]
    fn order_simplifies_each_booking_one_level_deep() {
        let order = json!({
            "id": "or-1",
            "number": "O-1",
            "bookings": [
                { "id": "bk-1", "status": "confirmed", "audit_log": [] },
                { "id": "bk-2", "status": "pending" }
            ],
            "customer": { "id": "cu-1", "name": "Alice" }
        });
        let simplified = simplify_records(ResourceKind::Order, order);

        assert_eq!(simplified["bookings"][0], json!({ "id": "bk-1", "status": "confirmed" }));
        assert_eq!(simplified["bookings"][1], json!({ "id": "bk-2", "status": "pending" }));
        assert_eq!(simplified["customer"], json!({ "id": "cu-1", "name": "Alice" }));
    }

    #[test]
    fn arrays_are_simplified_elementwise() {
        let services = json!([
            { "id": "svc-1", "name": "Yoga", "internal": 1 },
            { "id": "svc-2", "name": "Sauna" }
        ]);
        let simplified = simplify_records(ResourceKind::Service, services);
        assert_eq!(
            simplified,
            json!([{ "id": "svc-1", "name": "Yoga" }, { "id": "svc-2", "name": "Sauna" }])
        );
    }

    #[test]
    fn non_object_values_pass_through() {
        let value = json!("already-flat");
        assert_eq!(simplify_records(ResourceKind::Invoice, value.clone()), value);
    }

    #[test]
    fn plan_subscription_keeps_generic_plan_summary() {
        let sub = json!({
            "id": "ps-1",
            "status": "active",
            "resolved": {
                "plan": { "id": "pl-1", "name": "Gold", "price_table": {} }
            }
        });
        let simplified = simplify_records(ResourceKind::PlanSubscription, sub);
        assert_eq!(simplified["plan"], json!({ "id": "pl-1", "name": "Gold" }));
    }
}
