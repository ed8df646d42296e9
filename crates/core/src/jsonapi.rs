//! JSON:API payload codec.
//!
//! Writes are encoded from flat attribute/relationship maps into the
//! `{data: {type, attributes, ...}}` envelope. Reads are normalized the other
//! way: envelopes are flattened into `{id, type, ...attributes}` records and
//! relationship references are joined against the `included` array.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

/// Encode flat attributes into a JSON:API write payload.
///
/// `relationships` is omitted entirely when empty; `id` is omitted on create
/// payloads (pass `None`).
pub fn resource_payload(
    jsonapi_type: &str,
    attributes: Map<String, Value>,
    relationships: Option<Map<String, Value>>,
    id: Option<&str>,
) -> Value {
    let mut data = Map::new();
    data.insert("type".to_string(), Value::String(jsonapi_type.to_string()));
    if let Some(id) = id {
        data.insert("id".to_string(), Value::String(id.to_string()));
    }
    data.insert("attributes".to_string(), Value::Object(attributes));
    if let Some(relationships) = relationships {
        if !relationships.is_empty() {
            data.insert("relationships".to_string(), Value::Object(relationships));
        }
    }
    json!({ "data": data })
}

/// Build a single relationship entry referencing a record by type and id.
pub fn relationship_ref(jsonapi_type: &str, id: &str) -> Value {
    json!({ "data": { "type": jsonapi_type, "id": id } })
}

/// Index over the `included` array of a response, keyed by `(type, id)`.
///
/// Built once per response so relationship resolution is a hash lookup
/// instead of a linear scan per reference.
pub struct IncludedIndex {
    by_key: HashMap<(String, String), Value>,
}

impl IncludedIndex {
    /// Build the index from a response's `included` value (if any).
    pub fn build(included: Option<&Value>) -> Self {
        let mut by_key = HashMap::new();
        if let Some(Value::Array(entries)) = included {
            for entry in entries {
                let (Some(kind), Some(id)) = (
                    entry.get("type").and_then(Value::as_str),
                    entry.get("id").and_then(Value::as_str),
                ) else {
                    continue;
                };
                by_key.insert((kind.to_string(), id.to_string()), flatten_envelope(entry));
            }
        }
        Self { by_key }
    }

    /// Look up a flattened included record by type and id.
    pub fn get(&self, kind: &str, id: &str) -> Option<&Value> {
        self.by_key.get(&(kind.to_string(), id.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Normalize a full JSON:API response into flattened records.
///
/// - `data` is an array: each envelope becomes one normalized record.
/// - `data` is an object: one normalized record.
/// - anything else: the response passes through unchanged (defensive
///   passthrough for endpoints that already return flat bodies).
pub fn normalize_response(response: Value) -> Value {
    let index = IncludedIndex::build(response.get("included"));
    match response.get("data") {
        Some(Value::Array(items)) => {
            Value::Array(items.iter().map(|item| normalize_item(item, &index)).collect())
        }
        Some(data @ Value::Object(_)) => normalize_item(data, &index),
        _ => response,
    }
}

/// Flatten one envelope and resolve its relationships against the index.
///
/// Raw `relationships` are kept unmodified; resolved records are collected
/// under a separate `resolved` key. A reference with no matching included
/// entry falls back to the raw `{type, id}` reference.
pub fn normalize_item(item: &Value, index: &IncludedIndex) -> Value {
    let mut record = flatten_envelope(item);

    let Some(relationships) = item.get("relationships").and_then(Value::as_object) else {
        return record;
    };
    if let Some(obj) = record.as_object_mut() {
        obj.insert("relationships".to_string(), Value::Object(relationships.clone()));
    }

    if index.is_empty() {
        return record;
    }

    let mut resolved = Map::new();
    for (name, entry) in relationships {
        match entry.get("data") {
            Some(Value::Array(refs)) => {
                let joined: Vec<Value> =
                    refs.iter().map(|reference| resolve_ref(reference, index)).collect();
                resolved.insert(name.clone(), Value::Array(joined));
            }
            Some(reference @ Value::Object(_)) => {
                resolved.insert(name.clone(), resolve_ref(reference, index));
            }
            _ => {}
        }
    }

    if !resolved.is_empty() {
        if let Some(obj) = record.as_object_mut() {
            obj.insert("resolved".to_string(), Value::Object(resolved));
        }
    }
    record
}

/// `{type, id, attributes}` -> `{id, type, ...attributes}`.
fn flatten_envelope(item: &Value) -> Value {
    let mut record = Map::new();
    if let Some(id) = item.get("id") {
        record.insert("id".to_string(), id.clone());
    }
    if let Some(kind) = item.get("type") {
        record.insert("type".to_string(), kind.clone());
    }
    if let Some(attributes) = item.get("attributes").and_then(Value::as_object) {
        for (key, value) in attributes {
            record.insert(key.clone(), value.clone());
        }
    }
    Value::Object(record)
}

fn resolve_ref(reference: &Value, index: &IncludedIndex) -> Value {
    let (Some(kind), Some(id)) = (
        reference.get("type").and_then(Value::as_str),
        reference.get("id").and_then(Value::as_str),
    ) else {
        return reference.clone();
    };
    index.get(kind, id).cloned().unwrap_or_else(|| reference.clone())
}
