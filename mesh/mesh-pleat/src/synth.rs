//! Pleat synthesis.

use mesh_types::IndexedMesh;
use tracing::{debug, info, warn};

use crate::band::classify_bands;
use crate::error::{PleatError, PleatResult};

/// Below this distance from its band centroid a vertex has no radial direction.
const CENTROID_EPSILON: f64 = 1e-12;

/// Parameters for [`synthesize_pleats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PleatParams {
    /// Number of pleat steps per band.
    pub count: usize,

    /// Inner fold displacement toward the band centroid.
    pub depth: f64,

    /// Outer fold displacement as a fraction of `depth`.
    pub outer_ratio: f64,

    /// Height rounding step for band classification.
    pub band_resolution: f64,
}

impl Default for PleatParams {
    fn default() -> Self {
        Self {
            count: 12,
            depth: 0.05,
            outer_ratio: 0.5,
            band_resolution: 0.1,
        }
    }
}

impl PleatParams {
    /// Create parameters with the given pleat count and depth.
    #[must_use]
    pub fn new(count: usize, depth: f64) -> Self {
        Self {
            count,
            depth,
            ..Self::default()
        }
    }

    /// Set the outer/inner displacement ratio.
    #[must_use]
    pub const fn with_outer_ratio(mut self, ratio: f64) -> Self {
        self.outer_ratio = ratio;
        self
    }

    /// Set the band rounding resolution.
    #[must_use]
    pub const fn with_band_resolution(mut self, resolution: f64) -> Self {
        self.band_resolution = resolution;
        self
    }

    /// Displacement applied to outer folds.
    #[must_use]
    pub fn outer_depth(&self) -> f64 {
        self.depth * self.outer_ratio
    }

    /// Check that parameters are usable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.count > 0
            && self.depth.is_finite()
            && self.depth >= 0.0
            && self.outer_ratio.is_finite()
            && self.outer_ratio >= 0.0
            && self.band_resolution.is_finite()
            && self.band_resolution > 0.0
    }
}

/// Positions (into an angle-sorted band) chosen as inner and outer folds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PleatPartition {
    /// Even steps.
    pub inner: Vec<usize>,
    /// Odd steps.
    pub outer: Vec<usize>,
}

impl PleatPartition {
    /// Total number of classified positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len() + self.outer.len()
    }

    /// True if nothing was classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty() && self.outer.is_empty()
    }
}

/// Partition a band of `n` sorted members into `pleat_count` steps.
///
/// Step `i` sits at position `i * floor(n / pleat_count)` and is an inner
/// fold when `i` is even, an outer fold when odd. Bands with fewer than
/// `pleat_count` members, and a zero count, yield an empty partition.
///
/// # Example
///
/// ```
/// use mesh_pleat::partition_band;
///
/// let p = partition_band(24, 12);
/// assert_eq!(p.inner, vec![0, 4, 8, 12, 16, 20]);
/// assert_eq!(p.outer, vec![2, 6, 10, 14, 18, 22]);
/// ```
#[must_use]
pub fn partition_band(n: usize, pleat_count: usize) -> PleatPartition {
    let mut partition = PleatPartition::default();
    if pleat_count == 0 || n < pleat_count {
        return partition;
    }
    let step = n / pleat_count;
    for i in 0..pleat_count {
        let position = i * step;
        if i % 2 == 0 {
            partition.inner.push(position);
        } else {
            partition.outer.push(position);
        }
    }
    partition
}

/// Statistics from a synthesis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PleatSummary {
    /// Bands found in the mesh.
    pub bands_total: usize,
    /// Bands that received pleats.
    pub bands_pleated: usize,
    /// Bands with fewer members than the pleat count.
    pub bands_skipped: usize,
    /// Vertices moved toward their band centroid.
    pub inner_displaced: usize,
    /// Vertices moved away from their band centroid.
    pub outer_displaced: usize,
    /// Fold vertices left in place because they sit on the centroid.
    pub degenerate: Vec<u32>,
}

impl PleatSummary {
    /// Total vertices moved.
    #[must_use]
    pub fn displaced(&self) -> usize {
        self.inner_displaced + self.outer_displaced
    }
}

/// Fold a mesh into pleats in place.
///
/// Only vertex positions change; faces and vertex count are untouched.
/// Normals are left stale and must be recomputed by the caller.
///
/// # Errors
///
/// Returns [`PleatError::InvalidParams`] for a zero count or non-finite
/// values, and [`PleatError::EmptyMesh`] when there are no vertices.
pub fn synthesize_pleats(mesh: &mut IndexedMesh, params: &PleatParams) -> PleatResult<PleatSummary> {
    if !params.is_valid() {
        return Err(PleatError::invalid_params(format!(
            "count {} depth {} outer ratio {} resolution {}",
            params.count, params.depth, params.outer_ratio, params.band_resolution
        )));
    }
    if mesh.vertices.is_empty() {
        return Err(PleatError::EmptyMesh);
    }

    info!(
        count = params.count,
        depth = params.depth,
        "Synthesizing pleats"
    );

    let bands = classify_bands(mesh, params.band_resolution);
    let mut summary = PleatSummary {
        bands_total: bands.len(),
        ..PleatSummary::default()
    };

    for band in &bands {
        if band.len() < params.count {
            debug!(band = band.key, members = band.len(), "Band too small for pleats");
            summary.bands_skipped += 1;
            continue;
        }
        let Some(centroid) = band.centroid(mesh) else {
            summary.bands_skipped += 1;
            continue;
        };
        let order = band.sorted_by_angle(mesh, &centroid);
        let partition = partition_band(order.len(), params.count);

        let folds = partition
            .inner
            .iter()
            .map(|&i| (i, -params.depth))
            .chain(partition.outer.iter().map(|&i| (i, params.outer_depth())));
        for (position, signed_depth) in folds {
            let v = order[position];
            let vertex = &mut mesh.vertices[v as usize];
            let radial = vertex.position - centroid;
            let len = radial.norm();
            if len < CENTROID_EPSILON {
                summary.degenerate.push(v);
                continue;
            }
            vertex.position += radial * (signed_depth / len);
            if signed_depth < 0.0 {
                summary.inner_displaced += 1;
            } else {
                summary.outer_displaced += 1;
            }
        }
        summary.bands_pleated += 1;
    }

    if summary.bands_pleated == 0 {
        warn!(
            bands = summary.bands_total,
            count = params.count,
            "No band had enough vertices for pleats"
        );
    }
    if !summary.degenerate.is_empty() {
        warn!(
            vertices = summary.degenerate.len(),
            "Fold vertices on their band centroid were not displaced"
        );
    }
    info!(
        pleated = summary.bands_pleated,
        skipped = summary.bands_skipped,
        displaced = summary.displaced(),
        "Pleat synthesis complete"
    );

    Ok(summary)
}
