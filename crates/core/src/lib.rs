//! # Annyflow Core
//!
//! Pure logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The JSON:API payload codec (encode for writes, normalize for reads)
//! - List-query building (pagination clamp, search, sort, custom filters)
//! - Per-resource response simplification
//! - The static-data port used by the webhook lifecycle
//!
//! ## Architecture Principles
//! - Only depends on `annyflow-domain`
//! - No HTTP or host code
//! - Pure, testable transforms over `serde_json::Value`

pub mod jsonapi;
pub mod ports;
pub mod query;
pub mod simplify;

pub use jsonapi::{normalize_response, relationship_ref, resource_payload, IncludedIndex};
pub use ports::{InMemoryStaticData, StaticDataScope, StaticDataStore};
pub use query::ListQuery;
pub use simplify::simplify_records;
