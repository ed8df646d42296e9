//! # Annyflow Infra
//!
//! I/O layer of the anny connector: HTTP transport, authenticated request
//! client, resource operation handlers, list-search providers and the
//! webhook subscription lifecycle.
//!
//! ## Architecture
//! - Depends on `annyflow-domain` and `annyflow-core`
//! - All network access goes through [`http::HttpClient`]
//! - Host-facing entry points live under [`anny`]

pub mod anny;
pub mod http;
