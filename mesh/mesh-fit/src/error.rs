//! Error types for fitting.

use thiserror::Error;

/// Result type for fitting operations.
pub type FitResult<T> = Result<T, FitError>;

/// Errors that can occur while fitting.
#[derive(Debug, Error)]
pub enum FitError {
    /// The body mesh has no usable (non-degenerate) faces.
    #[error("body surface has no usable faces ({faces} faces, all degenerate or invalid)")]
    EmptySurface {
        /// Number of faces in the body mesh.
        faces: usize,
    },

    /// Fit parameters are out of range.
    #[error("invalid fit parameters: {0}")]
    InvalidParams(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FitError::EmptySurface { faces: 3 };
        assert!(format!("{err}").contains("3 faces"));

        let err = FitError::InvalidParams("offset is NaN".to_string());
        assert!(format!("{err}").contains("offset is NaN"));
    }
}
