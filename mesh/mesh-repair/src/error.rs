//! Error types for mesh cleanup operations.

use thiserror::Error;

/// Result type for cleanup operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors that can occur during mesh cleanup.
#[derive(Debug, Error)]
pub enum RepairError {
    /// A face references a vertex that does not exist.
    #[error("invalid vertex index {index} (mesh has {vertex_count} vertices)")]
    InvalidIndex {
        /// The invalid index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Invalid cleanup parameters.
    #[error("invalid cleanup parameters: {details}")]
    InvalidParams {
        /// Description of the problem.
        details: String,
    },
}

impl RepairError {
    /// Create an invalid-parameters error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams {
            details: details.into(),
        }
    }
}
