//! Normalized mesh quality factor.

use crate::validate::MeshReport;

/// Penalty weights for [`quality_factor_with_weights`].
///
/// Each penalty is scaled by the defect ratio of its category, reaching its
/// full value once `full_penalty_ratio` of the elements are defective.
#[derive(Debug, Clone)]
pub struct QualityWeights {
    /// Penalty for non-manifold edges.
    pub non_manifold: f64,
    /// Penalty for degenerate faces.
    pub degenerate_faces: f64,
    /// Penalty for duplicate vertices.
    pub duplicate_vertices: f64,
    /// Penalty for duplicate faces.
    pub duplicate_faces: f64,
    /// Defect ratio at which a penalty is fully applied.
    pub full_penalty_ratio: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            non_manifold: 0.4,
            degenerate_faces: 0.3,
            duplicate_vertices: 0.2,
            duplicate_faces: 0.1,
            full_penalty_ratio: 0.1,
        }
    }
}

/// Quality factor in `[0, 1]` with default weights.
///
/// `1.0` means no defects. A mesh without faces, or with faces that
/// reference missing vertices, scores `0.0`.
///
/// # Example
///
/// ```
/// use mesh_repair::{quality_factor, validate_mesh};
/// use mesh_types::unit_cube;
///
/// let report = validate_mesh(&unit_cube());
/// assert!((quality_factor(&report) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn quality_factor(report: &MeshReport) -> f64 {
    quality_factor_with_weights(report, &QualityWeights::default())
}

/// Quality factor in `[0, 1]` with custom weights.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn quality_factor_with_weights(report: &MeshReport, weights: &QualityWeights) -> f64 {
    if report.face_count == 0 || report.invalid_face_count > 0 {
        return 0.0;
    }

    let saturation = weights.full_penalty_ratio.max(f64::EPSILON);
    let penalty = |count: usize, total: usize, weight: f64| {
        if total == 0 {
            return 0.0;
        }
        let ratio = count as f64 / total as f64;
        weight * (ratio / saturation).min(1.0)
    };

    let total = penalty(
        report.non_manifold_edge_count,
        report.edge_count,
        weights.non_manifold,
    ) + penalty(
        report.degenerate_face_count,
        report.face_count,
        weights.degenerate_faces,
    ) + penalty(
        report.duplicate_vertex_count,
        report.vertex_count,
        weights.duplicate_vertices,
    ) + penalty(
        report.duplicate_face_count,
        report.face_count,
        weights.duplicate_faces,
    );

    (1.0 - total).clamp(0.0, 1.0)
}
