//! Error types for JsonDB
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using JsonDbError
pub type Result<T> = std::result::Result<T, JsonDbError>;

/// Unified error type for JsonDB operations
#[derive(Debug, Error)]
pub enum JsonDbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Key not found")]
    KeyNotFound,

    /// A path tried to descend through a value that is not an object
    #[error("Cannot navigate through non-object value")]
    NotNavigable,

    #[error("Key path must not be empty")]
    EmptyKeyPath,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    /// The request document was decoded but does not describe a valid command
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl JsonDbError {
    /// True for the two lookup failures a path traversal can produce
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, JsonDbError::KeyNotFound | JsonDbError::NotNavigable)
    }
}
