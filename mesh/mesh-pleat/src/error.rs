//! Error types for pleat operations.

use thiserror::Error;

/// Result type for pleat operations.
pub type PleatResult<T> = Result<T, PleatError>;

/// Errors that can occur during pleat synthesis or evaluation.
#[derive(Debug, Error)]
pub enum PleatError {
    /// Pleat or evaluation parameters are out of range.
    #[error("invalid pleat parameters: {0}")]
    InvalidParams(String),

    /// The mesh has no vertices.
    #[error("mesh has no vertices")]
    EmptyMesh,
}

impl PleatError {
    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}
