//! Normal-offset extrusion.

use mesh_types::{IndexedMesh, MeshTopology};
use tracing::{debug, info, warn};

use crate::error::{ShellError, ShellResult};

/// Parameters for thickness extrusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellParams {
    /// Base wall thickness in mesh units.
    pub thickness: f64,

    /// Scale applied to `thickness` before offsetting.
    pub multiplier: f64,
}

impl Default for ShellParams {
    fn default() -> Self {
        Self {
            thickness: 0.01,
            multiplier: 1.0,
        }
    }
}

impl ShellParams {
    /// Create parameters with the given base thickness and unit multiplier.
    #[must_use]
    pub const fn new(thickness: f64) -> Self {
        Self {
            thickness,
            multiplier: 1.0,
        }
    }

    /// Set the thickness multiplier.
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Distance every vertex is moved: `thickness * multiplier`.
    #[must_use]
    pub fn effective_thickness(&self) -> f64 {
        self.thickness * self.multiplier
    }

    /// Check that both values are finite and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.thickness.is_finite()
            && self.multiplier.is_finite()
            && self.thickness >= 0.0
            && self.multiplier >= 0.0
    }
}

/// Outcome of [`extrude`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionResult {
    /// Number of vertices moved along their normal.
    pub displaced: usize,

    /// Vertices left in place because their normal was degenerate.
    pub skipped: Vec<u32>,

    /// Offset distance actually applied.
    pub applied_thickness: f64,
}

impl ExtrusionResult {
    /// True when every vertex was displaced.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Offset every vertex along its unit normal by `thickness * multiplier`.
///
/// Normals are recomputed from the current faces before moving anything,
/// so stale normals carried by the input never leak into the offset.
/// Vertices whose accumulated normal is degenerate (isolated vertices, or
/// fans whose faces cancel out) stay in place and are reported in
/// [`ExtrusionResult::skipped`]. Normals are recomputed again afterwards.
///
/// # Errors
///
/// Returns [`ShellError::InvalidParams`] for non-finite or negative values,
/// and [`ShellError::EmptyMesh`] when the mesh has no faces.
pub fn extrude(mesh: &mut IndexedMesh, params: &ShellParams) -> ShellResult<ExtrusionResult> {
    if !params.is_valid() {
        return Err(ShellError::invalid_params(format!(
            "thickness {} and multiplier {} must be finite and non-negative",
            params.thickness, params.multiplier
        )));
    }
    if mesh.face_count() == 0 {
        return Err(ShellError::EmptyMesh);
    }

    let distance = params.effective_thickness();
    info!(
        thickness = params.thickness,
        multiplier = params.multiplier,
        vertices = mesh.vertex_count(),
        "Extruding shell by {distance:.4}"
    );

    mesh.recompute_normals();

    let mut displaced = 0;
    let mut skipped = Vec::new();
    for (index, vertex) in mesh.vertices.iter_mut().enumerate() {
        match vertex.normal {
            Some(normal) => {
                vertex.position += normal * distance;
                displaced += 1;
            }
            None => {
                #[allow(clippy::cast_possible_truncation)]
                skipped.push(index as u32);
            }
        }
    }

    if skipped.is_empty() {
        debug!(displaced, "Extrusion complete");
    } else {
        warn!(
            displaced,
            skipped = skipped.len(),
            "Some vertices had degenerate normals and were not extruded"
        );
    }

    mesh.recompute_normals();

    Ok(ExtrusionResult {
        displaced,
        skipped,
        applied_thickness: distance,
    })
}
