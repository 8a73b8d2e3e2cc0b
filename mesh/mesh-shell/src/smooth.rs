//! Laplacian smoothing.
//!
//! Each pass moves every free vertex a fraction `factor` of the way toward
//! the average of its edge neighbors:
//!
//! ```text
//! v_new = v + factor * (centroid(N(v)) - v)
//! ```
//!
//! Positions are read from the previous pass only (Jacobi style), so the
//! result does not depend on vertex order.

use mesh_repair::MeshAdjacency;
use mesh_types::IndexedMesh;
use nalgebra::Vector3;
use tracing::debug;

use crate::error::{ShellError, ShellResult};

/// Parameters for [`smooth_laplacian`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    /// Fraction of the way toward the neighbor centroid, in `[0, 1]`.
    pub factor: f64,

    /// Number of passes.
    pub iterations: u32,

    /// Keep open-boundary vertices (garment openings) in place.
    pub preserve_boundaries: bool,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            factor: 0.2,
            iterations: 1,
            preserve_boundaries: true,
        }
    }
}

impl SmoothParams {
    /// Create parameters with the given strength and pass count.
    #[must_use]
    pub const fn new(factor: f64, iterations: u32) -> Self {
        Self {
            factor,
            iterations,
            preserve_boundaries: true,
        }
    }

    /// Set whether boundary vertices are pinned.
    #[must_use]
    pub const fn with_preserve_boundaries(mut self, preserve: bool) -> Self {
        self.preserve_boundaries = preserve;
        self
    }

    /// Check that `factor` lies in `[0, 1]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.factor)
    }
}

/// Outcome of a smoothing run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothResult {
    /// Passes actually run.
    pub iterations: u32,

    /// Largest single-vertex displacement over all passes.
    pub max_displacement: f64,

    /// Vertices that were allowed to move.
    pub free_vertices: usize,
}

/// Smooth `mesh` in place.
///
/// Vertices with no neighbors never move. Normals are not touched; callers
/// recompute them once smoothing is done.
///
/// # Errors
///
/// Returns [`ShellError::InvalidParams`] if `factor` is outside `[0, 1]`.
pub fn smooth_laplacian(mesh: &mut IndexedMesh, params: &SmoothParams) -> ShellResult<SmoothResult> {
    if !params.is_valid() {
        return Err(ShellError::invalid_params(format!(
            "smoothing factor {} must be in [0, 1]",
            params.factor
        )));
    }
    if mesh.vertices.is_empty() || mesh.faces.is_empty() || params.iterations == 0 {
        return Ok(SmoothResult::default());
    }

    let adjacency = MeshAdjacency::build(&mesh.faces);
    let neighbors = adjacency.neighbor_table(mesh.vertices.len());
    let mut pinned = vec![false; mesh.vertices.len()];
    if params.preserve_boundaries {
        for v in adjacency.boundary_vertices() {
            if let Some(flag) = pinned.get_mut(v as usize) {
                *flag = true;
            }
        }
    }
    let free_vertices = neighbors
        .iter()
        .zip(&pinned)
        .filter(|(n, p)| !n.is_empty() && !**p)
        .count();

    let mut max_displacement = 0.0_f64;
    for _ in 0..params.iterations {
        let displacements: Vec<Vector3<f64>> = mesh
            .vertices
            .iter()
            .enumerate()
            .map(|(i, vertex)| {
                let ring = &neighbors[i];
                if pinned[i] || ring.is_empty() {
                    return Vector3::zeros();
                }
                let sum: Vector3<f64> = ring
                    .iter()
                    .map(|&n| mesh.vertices[n as usize].position.coords)
                    .sum();
                #[allow(clippy::cast_precision_loss)]
                let centroid = sum / ring.len() as f64;
                (centroid - vertex.position.coords) * params.factor
            })
            .collect();

        for (vertex, delta) in mesh.vertices.iter_mut().zip(&displacements) {
            vertex.position += delta;
            max_displacement = max_displacement.max(delta.norm());
        }
    }

    debug!(
        iterations = params.iterations,
        factor = params.factor,
        free_vertices,
        max_displacement,
        "Laplacian smoothing complete"
    );

    Ok(SmoothResult {
        iterations: params.iterations,
        max_displacement,
        free_vertices,
    })
}
