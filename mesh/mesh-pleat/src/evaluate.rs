//! Pleat geometry quality scoring.
//!
//! The total score out of 100 is the sum of three capped parts:
//!
//! | Part | Points | Tiers |
//! |------|--------|-------|
//! | Angle regularity | 40 | max gap deviation < 5° → 40, < 10° → 20 |
//! | Depth consistency | 35 | ratio > 0.95 → 35, > 0.8 → 20 |
//! | Mesh quality | 25 | `quality_factor * 25`, clamped |
//!
//! All tiers live in [`EvaluationParams`].

// Feature counts and scores are small.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::fmt;

use mesh_repair::{quality_factor, validate_mesh};
use mesh_types::IndexedMesh;
use tracing::{debug, info};

use crate::band::{PleatBand, classify_bands};
use crate::error::{PleatError, PleatResult};
use crate::issues::QualityIssue;

/// Scoring tiers and feature-detection tolerances.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationParams {
    /// Points for gap deviation below `angle_full_tolerance`.
    pub angle_points: u32,
    /// Points for gap deviation below `angle_partial_tolerance`.
    pub angle_partial_points: u32,
    /// Degrees.
    pub angle_full_tolerance: f64,
    /// Degrees.
    pub angle_partial_tolerance: f64,

    /// Points for consistency above `depth_full_threshold`.
    pub depth_points: u32,
    /// Points for consistency above `depth_partial_threshold`.
    pub depth_partial_points: u32,
    /// Consistency ratio for full points.
    pub depth_full_threshold: f64,
    /// Consistency ratio for partial points.
    pub depth_partial_threshold: f64,

    /// Maximum mesh quality points.
    pub mesh_points: f64,
    /// Mesh quality below this raises an issue.
    pub mesh_issue_below: f64,

    /// Height rounding step, matching pleat synthesis.
    pub band_resolution: f64,
    /// Smallest radial deviation counted as a fold.
    pub feature_abs_tolerance: f64,
    /// Radial deviation counted as a fold, relative to the band median radius.
    pub feature_rel_tolerance: f64,
    /// Allowed difference between estimated and expected pleat counts.
    pub count_tolerance: usize,
}

impl Default for EvaluationParams {
    fn default() -> Self {
        Self {
            angle_points: 40,
            angle_partial_points: 20,
            angle_full_tolerance: 5.0,
            angle_partial_tolerance: 10.0,
            depth_points: 35,
            depth_partial_points: 20,
            depth_full_threshold: 0.95,
            depth_partial_threshold: 0.8,
            mesh_points: 25.0,
            mesh_issue_below: 15.0,
            band_resolution: 0.1,
            feature_abs_tolerance: 1e-4,
            feature_rel_tolerance: 0.01,
            count_tolerance: 2,
        }
    }
}

impl EvaluationParams {
    /// Set the band resolution.
    #[must_use]
    pub const fn with_band_resolution(mut self, resolution: f64) -> Self {
        self.band_resolution = resolution;
        self
    }

    /// Check that tolerances are usable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.band_resolution.is_finite()
            && self.band_resolution > 0.0
            && self.feature_abs_tolerance >= 0.0
            && self.feature_rel_tolerance >= 0.0
            && self.mesh_points.is_finite()
            && self.mesh_points >= 0.0
    }
}

/// Result of [`evaluate_pleats`].
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    /// Sum of the three parts, at most 100.
    pub total_score: u32,
    /// Angle regularity points.
    pub angle_score: u32,
    /// Depth consistency points.
    pub depth_score: u32,
    /// Mesh quality points.
    pub mesh_score: u32,

    /// Pleat count the mesh was generated with.
    pub expected_pleat_count: usize,
    /// Median folds detected per band, if any.
    pub estimated_pleat_count: Option<usize>,
    /// Largest angular gap deviation in degrees, if measurable.
    pub max_angle_deviation: Option<f64>,
    /// Depth consistency ratio, if any folds were found.
    pub depth_consistency: Option<f64>,
    /// Unrounded mesh quality points.
    pub mesh_quality: f64,
    /// Total folds detected.
    pub feature_count: usize,

    /// Problems found.
    pub issues: Vec<QualityIssue>,
    /// One suggestion per issue.
    pub recommendations: Vec<String>,
}

impl QualityReport {
    /// True if `total_score` reaches `threshold`.
    #[must_use]
    pub fn passes(&self, threshold: u32) -> bool {
        self.total_score >= threshold
    }

    /// One-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.issues.is_empty() {
            format!("Pleat quality {}/100", self.total_score)
        } else {
            format!(
                "Pleat quality {}/100 with {} issue(s)",
                self.total_score,
                self.issues.len()
            )
        }
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pleat Quality Report:")?;
        writeln!(f, "  Total: {}/100", self.total_score)?;
        writeln!(
            f,
            "  Angle: {}  Depth: {}  Mesh: {}",
            self.angle_score, self.depth_score, self.mesh_score
        )?;
        match self.estimated_pleat_count {
            Some(n) => writeln!(
                f,
                "  Pleats: {n} detected, {} expected",
                self.expected_pleat_count
            )?,
            None => writeln!(f, "  Pleats: none detected, {} expected", self.expected_pleat_count)?,
        }
        for (issue, rec) in self.issues.iter().zip(&self.recommendations) {
            writeln!(f, "  - {issue} ({rec})")?;
        }
        Ok(())
    }
}

/// A vertex whose radius departs from its band median.
#[derive(Debug, Clone, Copy)]
struct Feature {
    angle: f64,
    deviation: f64,
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn band_features(mesh: &IndexedMesh, band: &PleatBand, params: &EvaluationParams) -> Vec<Feature> {
    let Some(centroid) = band.centroid(mesh) else {
        return Vec::new();
    };
    let polar: Vec<(f64, f64)> = band
        .members
        .iter()
        .filter_map(|&v| mesh.vertices.get(v as usize))
        .map(|vertex| {
            let dx = vertex.position.x - centroid.x;
            let dy = vertex.position.y - centroid.y;
            (dx.hypot(dy), dy.atan2(dx).to_degrees())
        })
        .collect();

    let mut radii: Vec<f64> = polar.iter().map(|(r, _)| *r).collect();
    let Some(reference) = median(&mut radii) else {
        return Vec::new();
    };
    let tolerance = params
        .feature_abs_tolerance
        .max(params.feature_rel_tolerance * reference);

    polar
        .into_iter()
        .filter_map(|(r, angle)| {
            let deviation = r - reference;
            (deviation.abs() > tolerance).then_some(Feature { angle, deviation })
        })
        .collect()
}

/// Largest |gap - expected| over consecutive features, including the wrap gap.
fn max_gap_deviation(features: &[Feature], expected: f64) -> Option<f64> {
    if features.len() < 2 {
        return None;
    }
    let mut angles: Vec<f64> = features.iter().map(|f| f.angle).collect();
    angles.sort_by(f64::total_cmp);
    let wrap = angles[0] + 360.0 - angles[angles.len() - 1];
    let deviation = angles
        .windows(2)
        .map(|w| w[1] - w[0])
        .chain(std::iter::once(wrap))
        .map(|gap| (gap - expected).abs())
        .fold(0.0, f64::max);
    Some(deviation)
}

/// `1 - std/mean` of absolute deviations, clamped to `[0, 1]`.
fn class_consistency(depths: &[f64]) -> Option<f64> {
    if depths.is_empty() {
        return None;
    }
    let n = depths.len() as f64;
    let mean = depths.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return None;
    }
    let variance = depths.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    Some((1.0 - variance.sqrt() / mean).clamp(0.0, 1.0))
}

/// Score pleat geometry with default tiers.
///
/// # Errors
///
/// Returns [`PleatError::InvalidParams`] if `expected_pleat_count` is zero.
pub fn evaluate_pleats(mesh: &IndexedMesh, expected_pleat_count: usize) -> PleatResult<QualityReport> {
    evaluate_pleats_with_params(mesh, expected_pleat_count, &EvaluationParams::default())
}

/// Score pleat geometry with custom tiers.
///
/// A report is produced for any mesh, including an empty one; measurements
/// that cannot be taken score zero and add an issue.
///
/// # Errors
///
/// Returns [`PleatError::InvalidParams`] if `expected_pleat_count` is zero
/// or `params` is invalid.
pub fn evaluate_pleats_with_params(
    mesh: &IndexedMesh,
    expected_pleat_count: usize,
    params: &EvaluationParams,
) -> PleatResult<QualityReport> {
    if expected_pleat_count == 0 {
        return Err(PleatError::invalid_params("expected pleat count must be positive"));
    }
    if !params.is_valid() {
        return Err(PleatError::invalid_params("evaluation tolerances out of range"));
    }

    info!(expected_pleat_count, vertices = mesh.vertices.len(), "Evaluating pleat geometry");

    let expected_angle = 360.0 / expected_pleat_count as f64;
    let mut issues = Vec::new();

    let per_band: Vec<Vec<Feature>> = classify_bands(mesh, params.band_resolution)
        .iter()
        .map(|band| band_features(mesh, band, params))
        .filter(|features| !features.is_empty())
        .collect();
    let feature_count: usize = per_band.iter().map(Vec::len).sum();

    // Angle regularity.
    let max_angle_deviation = per_band
        .iter()
        .filter_map(|features| max_gap_deviation(features, expected_angle))
        .reduce(f64::max);
    let angle_score = match max_angle_deviation {
        None => {
            issues.push(if feature_count == 0 {
                QualityIssue::NoPleatFeatures
            } else {
                QualityIssue::AnglesUnmeasurable
            });
            0
        }
        Some(d) if d < params.angle_full_tolerance => params.angle_points,
        Some(d) if d < params.angle_partial_tolerance => params.angle_partial_points,
        Some(d) => {
            issues.push(QualityIssue::IrregularAngles { max_deviation: d });
            0
        }
    };
    debug!(?max_angle_deviation, angle_score, "Angle regularity");

    // Depth consistency.
    let (inner, outer): (Vec<f64>, Vec<f64>) = {
        let all = per_band.iter().flatten();
        let inner = all.clone().filter(|f| f.deviation < 0.0).map(|f| -f.deviation).collect();
        let outer = all.filter(|f| f.deviation > 0.0).map(|f| f.deviation).collect();
        (inner, outer)
    };
    let depth_consistency = {
        let parts: Vec<(f64, usize)> = [&inner, &outer]
            .into_iter()
            .filter_map(|class| class_consistency(class).map(|c| (c, class.len())))
            .collect();
        let weight: usize = parts.iter().map(|(_, n)| n).sum();
        (weight > 0).then(|| parts.iter().map(|(c, n)| c * *n as f64).sum::<f64>() / weight as f64)
    };
    let depth_score = match depth_consistency {
        None => 0,
        Some(c) if c > params.depth_full_threshold => params.depth_points,
        Some(c) if c > params.depth_partial_threshold => params.depth_partial_points,
        Some(c) => {
            issues.push(QualityIssue::InconsistentDepth { consistency: c });
            0
        }
    };
    debug!(?depth_consistency, depth_score, "Depth consistency");

    // Mesh quality.
    let mesh_quality = if mesh.faces.is_empty() {
        0.0
    } else {
        (quality_factor(&validate_mesh(mesh)) * params.mesh_points).clamp(0.0, params.mesh_points)
    };
    let mesh_score = mesh_quality.floor() as u32;
    if mesh_quality < params.mesh_issue_below {
        issues.push(QualityIssue::PoorMeshQuality { score: mesh_quality });
    }
    debug!(mesh_quality, mesh_score, "Mesh quality");

    // Pleat count estimate.
    let mut counts: Vec<f64> = per_band.iter().map(|f| f.len() as f64).collect();
    let estimated_pleat_count = median(&mut counts).map(|m| m.round() as usize);
    if let Some(estimated) = estimated_pleat_count {
        if estimated.abs_diff(expected_pleat_count) > params.count_tolerance {
            issues.push(QualityIssue::PleatCountMismatch {
                expected: expected_pleat_count,
                estimated,
            });
        }
    }

    let total_score = angle_score
        .saturating_add(depth_score)
        .saturating_add(mesh_score)
        .min(100);
    let recommendations = issues.iter().map(QualityIssue::recommendation).collect();

    info!(
        total_score,
        issues = issues.len(),
        "Pleat evaluation complete"
    );

    Ok(QualityReport {
        total_score,
        angle_score,
        depth_score,
        mesh_score,
        expected_pleat_count,
        estimated_pleat_count,
        max_angle_deviation,
        depth_consistency,
        mesh_quality,
        feature_count,
        issues,
        recommendations,
    })
}
