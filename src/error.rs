//! Error types for keytable
//!
//! Provides a unified error type for all operations.
//!
//! The CRUD path only ever produces `RecordNotFound`, `PrimaryKeyConflict`
//! and `ShapeMismatch`. The remaining variants belong to the outer surfaces
//! (visitors, the table actor, the shell).

use thiserror::Error;

/// Result type alias using TableError
pub type Result<T> = std::result::Result<T, TableError>;

/// Unified error type for keytable operations
#[derive(Debug, Error)]
pub enum TableError {
    // -------------------------------------------------------------------------
    // Table Errors
    // -------------------------------------------------------------------------
    #[error("record not found")]
    RecordNotFound,

    #[error("primary key conflict")]
    PrimaryKeyConflict,

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    // -------------------------------------------------------------------------
    // Visitor Errors
    // -------------------------------------------------------------------------
    #[error("visitor failed: {0}")]
    Visit(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("table actor is no longer running")]
    ActorUnavailable,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration / Shell Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command error: {0}")]
    Command(String),
}

impl TableError {
    /// Build a `ShapeMismatch` from any message
    pub fn mismatch(message: impl Into<String>) -> Self {
        TableError::ShapeMismatch(message.into())
    }

    /// Build a `Visit` error from any message
    pub fn visit(message: impl Into<String>) -> Self {
        TableError::Visit(message.into())
    }

    /// Prefix a shape mismatch with the field it happened on.
    /// Other variants pass through untouched.
    pub fn for_field(self, field: &str) -> Self {
        match self {
            TableError::ShapeMismatch(message) => {
                TableError::ShapeMismatch(format!("field `{}`: {}", field, message))
            }
            other => other,
        }
    }
}

impl From<serde_json::Error> for TableError {
    fn from(e: serde_json::Error) -> Self {
        TableError::Serialization(e.to_string())
    }
}
