//! Errors raised by extrusion and smoothing.

use thiserror::Error;

/// Result alias for shell building.
pub type ShellResult<T> = Result<T, ShellError>;

/// Why a garment surface could not be thickened or smoothed.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The surface has no faces to derive offset normals from.
    #[error("cannot build a shell on a mesh without faces")]
    EmptyMesh,

    /// A thickness, multiplier or smoothing setting is out of range.
    #[error("invalid shell parameters: {0}")]
    InvalidParams(String),
}

impl ShellError {
    pub(crate) fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert!(ShellError::EmptyMesh.to_string().contains("without faces"));
        let err = ShellError::invalid_params("smoothing factor 1.5 outside [0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid shell parameters: smoothing factor 1.5 outside [0, 1]"
        );
    }
}
