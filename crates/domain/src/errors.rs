//! Domain error types shared across all annyflow crates.

use thiserror::Error;

/// Top-level error type for connector operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnyflowError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote API error, already flattened to a display string by the
    /// transport layer (e.g. `[422] Invalid: starts_at required`). The
    /// message is surfaced to the host verbatim.
    #[error("{0}")]
    Api(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for annyflow operations
pub type Result<T> = std::result::Result<T, AnnyflowError>;
