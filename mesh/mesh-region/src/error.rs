//! Error types for region selection.

use thiserror::Error;

/// Result type for region operations.
pub type RegionResult<T> = Result<T, RegionError>;

/// Errors that can occur during region selection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegionError {
    /// A selector referenced a vertex group the mesh does not have.
    #[error("vertex group index {index} not found (mesh has {group_count} groups)")]
    GroupNotFound {
        /// The missing group index.
        index: u32,
        /// Number of groups on the mesh.
        group_count: usize,
    },

    /// Threshold or factor is NaN or infinite.
    #[error("invalid {what}: {value}")]
    InvalidParameter {
        /// Which parameter.
        what: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The mesh has no vertices to select from.
    #[error("mesh is empty")]
    EmptyMesh,
}
