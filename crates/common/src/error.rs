//! Error types for Vitrine

use thiserror::Error;

/// Result type alias using Vitrine Error
pub type Result<T> = std::result::Result<T, Error>;

/// Vitrine error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a not-found error for an entity kind and id
    pub fn not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        Error::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }
}
