//! Generated garments.

use std::fmt;

use mesh_fit::FitReport;
use mesh_pleat::{PleatSummary, QualityReport};
use mesh_region::SelectionMethod;
use mesh_shell::ShellReport;
use mesh_types::{IndexedMesh, RiggedMesh};

use crate::kind::GarmentKind;

/// A step that could not be applied fully. Generation continued.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryWarning {
    /// Region came from the height heuristic instead of vertex groups.
    HeightFallback,
    /// Vertices without a usable normal were not extruded.
    MissingNormals {
        /// Vertices left in place.
        count: usize,
    },
    /// Fitting was not applied at all.
    FitSkipped {
        /// Why the body surface could not be used.
        reason: String,
    },
    /// Vertices that found no surface point and stayed in place.
    Unprojected {
        /// Vertices left in place.
        count: usize,
    },
    /// Fitted vertices still closer to the body than the offset.
    Uncleared {
        /// Vertices below the clearance.
        count: usize,
    },
    /// No height band had enough vertices for the pleat count.
    NoPleats {
        /// Bands examined.
        bands: usize,
    },
    /// Vertices at a band centroid, with no outward direction to fold.
    DegeneratePleatVertices {
        /// Vertices left in place.
        count: usize,
    },
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeightFallback => write!(f, "selected by height fallback"),
            Self::MissingNormals { count } => {
                write!(f, "{count} vertices without normals were not extruded")
            }
            Self::FitSkipped { reason } => write!(f, "body fitting skipped: {reason}"),
            Self::Unprojected { count } => {
                write!(f, "{count} vertices could not be fitted to the body")
            }
            Self::Uncleared { count } => {
                write!(f, "{count} fitted vertices sit closer to the body than the offset")
            }
            Self::NoPleats { bands } => {
                write!(f, "none of {bands} height bands had enough vertices for pleats")
            }
            Self::DegeneratePleatVertices { count } => {
                write!(f, "{count} vertices at a band center were not pleated")
            }
        }
    }
}

/// An owned garment produced from a base mesh.
///
/// The garment carries the base mesh's vertex groups, remapped onto its
/// own vertices, so it deforms with the same skeleton.
#[derive(Debug, Clone)]
pub struct GarmentMesh {
    /// Geometry and vertex groups. The name is the garment identifier.
    pub rigged: RiggedMesh,
    /// What was generated.
    pub kind: GarmentKind,
    /// How the region was selected.
    pub method: SelectionMethod,
    /// Vertices selected on the base mesh.
    pub selected_vertices: usize,
    /// Degraded steps, in pipeline order.
    pub warnings: Vec<GeometryWarning>,
    /// Extrusion and smoothing outcome.
    pub shell: Option<ShellReport>,
    /// Fitting outcome, when fitting ran.
    pub fit: Option<FitReport>,
    /// Pleat synthesis outcome, for skirts.
    pub pleats: Option<PleatSummary>,
    /// Pleat quality, for skirts.
    pub quality: Option<QualityReport>,
}

impl GarmentMesh {
    /// Object identifier, `"{base}_{kind}"`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.rigged.name
    }

    /// Garment geometry.
    #[must_use]
    pub const fn mesh(&self) -> &IndexedMesh {
        &self.rigged.mesh
    }

    /// True when any step fell back or was skipped.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.method.is_fallback() || !self.warnings.is_empty()
    }

    /// One-line confirmation for the user.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Generated '{}': {} vertices, {} faces",
            self.identifier(),
            self.rigged.mesh.vertices.len(),
            self.rigged.mesh.faces.len()
        );
        if let Some(quality) = &self.quality {
            line.push_str(&format!(", quality {}/100", quality.total_score));
        }
        if !self.warnings.is_empty() {
            line.push_str(&format!(", {} warnings", self.warnings.len()));
        }
        line
    }
}

impl fmt::Display for GarmentMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        writeln!(f, "  kind: {}", self.kind)?;
        writeln!(f, "  selection: {} ({} vertices)", self.method, self.selected_vertices)?;
        for warning in &self.warnings {
            writeln!(f, "  warning: {warning}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    fn garment() -> GarmentMesh {
        GarmentMesh {
            rigged: RiggedMesh::new("Body_pants", unit_cube()),
            kind: GarmentKind::Pants,
            method: SelectionMethod::GroupWeights,
            selected_vertices: 8,
            warnings: Vec::new(),
            shell: None,
            fit: None,
            pleats: None,
            quality: None,
        }
    }

    #[test]
    fn test_summary() {
        let g = garment();
        assert_eq!(g.summary(), "Generated 'Body_pants': 8 vertices, 12 faces");
        assert!(!g.is_degraded());
    }

    #[test]
    fn test_warnings_reported() {
        let mut g = garment();
        g.warnings.push(GeometryWarning::Unprojected { count: 3 });
        assert!(g.is_degraded());
        assert!(g.summary().ends_with(", 1 warnings"));
        assert!(g.to_string().contains("3 vertices could not be fitted"));

        g.warnings.push(GeometryWarning::Uncleared { count: 2 });
        assert!(g.summary().ends_with(", 2 warnings"));
        assert!(g.to_string().contains("2 fitted vertices sit closer"));
    }
}
