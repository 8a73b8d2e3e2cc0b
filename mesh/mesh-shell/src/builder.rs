//! Fluent builder API for giving a garment surface thickness.
//!
//! # Example
//!
//! ```
//! use mesh_shell::ShellBuilder;
//! use mesh_types::open_cylinder;
//!
//! let mut mesh = open_cylinder(0.5, 1.0, 12, 3);
//! let report = ShellBuilder::new(&mut mesh).thickness(0.02).apply().unwrap();
//! assert!(report.smoothing.is_none());
//! ```

use mesh_types::IndexedMesh;

use crate::error::ShellResult;
use crate::extrude::{ExtrusionResult, ShellParams, extrude};
use crate::smooth::{SmoothParams, SmoothResult, smooth_laplacian};

/// Combined result of [`ShellBuilder::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShellReport {
    /// Extrusion statistics.
    pub extrusion: ExtrusionResult,
    /// Smoothing statistics, if a smoothing pass was configured.
    pub smoothing: Option<SmoothResult>,
    /// Vertices left without a normal after the final recompute.
    pub missing_normals: usize,
}

/// Fluent builder that extrudes and optionally smooths a mesh in place.
#[derive(Debug)]
pub struct ShellBuilder<'a> {
    mesh: &'a mut IndexedMesh,
    params: ShellParams,
    smoothing: Option<SmoothParams>,
}

impl<'a> ShellBuilder<'a> {
    /// Start a builder over `mesh` with default thickness and no smoothing.
    #[must_use]
    pub fn new(mesh: &'a mut IndexedMesh) -> Self {
        Self {
            mesh,
            params: ShellParams::default(),
            smoothing: None,
        }
    }

    // =========================================================================
    // Extrusion
    // =========================================================================

    /// Set the base thickness.
    #[must_use]
    pub const fn thickness(mut self, thickness: f64) -> Self {
        self.params.thickness = thickness;
        self
    }

    /// Set the thickness multiplier.
    #[must_use]
    pub const fn multiplier(mut self, multiplier: f64) -> Self {
        self.params.multiplier = multiplier;
        self
    }

    /// Replace all extrusion parameters.
    #[must_use]
    pub const fn params(mut self, params: ShellParams) -> Self {
        self.params = params;
        self
    }

    // =========================================================================
    // Smoothing
    // =========================================================================

    /// Run a Laplacian pass after extrusion.
    #[must_use]
    pub const fn smoothing(mut self, params: SmoothParams) -> Self {
        self.smoothing = Some(params);
        self
    }

    /// Set or clear the smoothing pass.
    #[must_use]
    pub const fn maybe_smoothing(mut self, params: Option<SmoothParams>) -> Self {
        self.smoothing = params;
        self
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Extrude, smooth if configured, and recompute normals.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ShellError`] from extrusion or smoothing.
    pub fn apply(self) -> ShellResult<ShellReport> {
        let extrusion = extrude(self.mesh, &self.params)?;
        let smoothing = match self.smoothing {
            Some(params) => Some(smooth_laplacian(self.mesh, &params)?),
            None => None,
        };
        let missing_normals = self.mesh.recompute_normals();
        Ok(ShellReport {
            extrusion,
            smoothing,
            missing_normals,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::open_cylinder;

    #[test]
    fn test_builder_defaults() {
        let mut mesh = open_cylinder(1.0, 1.0, 8, 2);
        let report = ShellBuilder::new(&mut mesh).apply().unwrap();
        assert_relative_eq!(report.extrusion.applied_thickness, 0.01);
        assert!(report.smoothing.is_none());
        assert_eq!(report.missing_normals, 0);
    }

    #[test]
    fn test_builder_with_smoothing() {
        let mut mesh = open_cylinder(1.0, 1.0, 8, 4);
        let report = ShellBuilder::new(&mut mesh)
            .thickness(0.02)
            .multiplier(0.5)
            .smoothing(SmoothParams::new(0.2, 2))
            .apply()
            .unwrap();

        assert_relative_eq!(report.extrusion.applied_thickness, 0.01);
        let smoothing = report.smoothing.unwrap();
        assert_eq!(smoothing.iterations, 2);
        assert_eq!(smoothing.free_vertices, 8 * 3);
    }

    #[test]
    fn test_builder_propagates_errors() {
        let mut mesh = IndexedMesh::new();
        assert!(ShellBuilder::new(&mut mesh).apply().is_err());
    }
}
