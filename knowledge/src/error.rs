//! Error types for the knowledge base.

use thiserror::Error;

/// Result type alias for knowledge operations.
pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Errors that can occur in the knowledge base.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    /// Malformed input to ingestion.
    #[error("validation error: {0}")]
    Validation(String),

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] tripcraft_embeddings::EmbeddingError),

    /// Knowledge file parse error.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
