//! Error types for the trip planner.

use thiserror::Error;

use crate::generator::GeneratorError;

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors that can occur in the trip planner.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Trip request failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Knowledge base error (ingestion, embedding, or search).
    #[error("knowledge error: {0}")]
    Knowledge(#[from] tripcraft_knowledge::KnowledgeError),

    /// Plan generation failed.
    #[error("generation error: {0}")]
    Generation(#[from] GeneratorError),
}
