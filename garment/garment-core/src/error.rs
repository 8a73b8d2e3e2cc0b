//! Error types for garment generation.
//!
//! Every failure carries one human-readable message through `Display`.
//! [`GarmentError::kind`] tells the caller whether the request itself was
//! bad or whether the body simply had nothing to cut the garment from.

use mesh_pleat::PleatError;
use mesh_region::RegionError;
use mesh_repair::RepairError;
use mesh_shell::ShellError;
use thiserror::Error;

use crate::kind::GarmentKind;

/// Result type for garment generation.
pub type GarmentResult<T> = Result<T, GarmentError>;

/// Broad failure class of a [`GarmentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid base mesh or settings. Detected before anything is built.
    Input,
    /// Nothing on the body matched the garment's region.
    Selection,
}

/// Errors that abort a generation call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GarmentError {
    /// The base mesh cannot be used.
    #[error("invalid base mesh: {reason}")]
    InvalidMesh {
        /// What is wrong with it.
        reason: String,
    },

    /// A setting is outside its declared range.
    #[error("setting '{field}' = {value} is out of range [{min}, {max}]")]
    InvalidSetting {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// A garment name did not match any known kind.
    #[error("unknown garment kind '{0}'")]
    UnknownGarmentKind(String),

    /// Settings document could not be parsed.
    #[error("could not parse fit settings: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The body has no vertex groups for the garment's region and the
    /// garment has no height fallback.
    #[error("no vertex groups found for {garment}")]
    NoRegionGroups {
        /// Garment being generated.
        garment: GarmentKind,
    },

    /// Selection ran but kept no vertices.
    #[error("no vertices selected for {garment} generation")]
    NoVerticesSelected {
        /// Garment being generated.
        garment: GarmentKind,
    },

    /// The selected vertices share no faces.
    #[error("{garment} mesh has no faces after selection")]
    EmptyGarment {
        /// Garment being generated.
        garment: GarmentKind,
    },

    /// Region selection rejected its input.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// Duplicate-vertex cleanup rejected its input.
    #[error(transparent)]
    Repair(#[from] RepairError),

    /// Shell extrusion rejected its input.
    #[error(transparent)]
    Shell(#[from] ShellError),

    /// Pleat synthesis or evaluation rejected its input.
    #[error(transparent)]
    Pleat(#[from] PleatError),
}

impl GarmentError {
    /// Failure class for the caller.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoRegionGroups { .. }
            | Self::NoVerticesSelected { .. }
            | Self::EmptyGarment { .. } => ErrorKind::Selection,
            _ => ErrorKind::Input,
        }
    }

    /// Create an invalid mesh error.
    #[must_use]
    pub fn invalid_mesh(reason: impl Into<String>) -> Self {
        Self::InvalidMesh {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GarmentError::InvalidSetting {
            field: "thickness",
            value: 0.5,
            min: 0.001,
            max: 0.1,
        };
        assert_eq!(
            format!("{err}"),
            "setting 'thickness' = 0.5 is out of range [0.001, 0.1]"
        );

        let err = GarmentError::NoVerticesSelected {
            garment: GarmentKind::Pants,
        };
        assert_eq!(format!("{err}"), "no vertices selected for pants generation");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(GarmentError::invalid_mesh("no faces").kind(), ErrorKind::Input);
        assert_eq!(
            GarmentError::NoRegionGroups {
                garment: GarmentKind::Socks
            }
            .kind(),
            ErrorKind::Selection
        );
        assert_eq!(
            GarmentError::from(ShellError::EmptyMesh).kind(),
            ErrorKind::Input
        );
    }
}
