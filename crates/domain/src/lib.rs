//! # Annyflow Domain
//!
//! Business domain types and models for the anny connector.
//!
//! This crate contains:
//! - Region and credential types
//! - The resource catalog (API paths, JSON:API types, default includes)
//! - Domain error types and Result definitions
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other annyflow crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
