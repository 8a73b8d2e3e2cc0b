//! Geometric fallback selection on the vertical (Z) coordinate.

use hashbrown::HashSet;
use mesh_types::IndexedMesh;

use crate::error::{RegionError, RegionResult};

/// Summary statistics of vertex heights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightStats {
    /// Mean Z coordinate.
    pub mean: f64,
    /// Population standard deviation of the Z coordinate.
    pub std_dev: f64,
    /// Lowest Z coordinate.
    pub min: f64,
    /// Highest Z coordinate.
    pub max: f64,
}

impl HeightStats {
    /// Compute statistics over every vertex, or `None` for an empty mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_region::HeightStats;
    /// use mesh_types::unit_cube;
    ///
    /// let stats = HeightStats::from_mesh(&unit_cube()).unwrap();
    /// assert!((stats.mean - 0.5).abs() < 1e-12);
    /// assert!((stats.std_dev - 0.5).abs() < 1e-12);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_mesh(mesh: &IndexedMesh) -> Option<Self> {
        if mesh.vertices.is_empty() {
            return None;
        }
        let n = mesh.vertices.len() as f64;
        let heights = || mesh.vertices.iter().map(|v| v.position.z);

        let mean = heights().sum::<f64>() / n;
        let variance = heights().map(|z| (z - mean).powi(2)).sum::<f64>() / n;
        let (min, max) = heights().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| {
            (lo.min(z), hi.max(z))
        });

        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }
}

/// Height-based selection policy for bodies without usable vertex groups.
///
/// Both variants keep vertices whose Z coordinate reaches a cutoff derived
/// from [`HeightStats`]; a vertex exactly on the cutoff is kept. This is a degraded heuristic: it knows
/// nothing about the body's anatomy beyond "higher up".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightFallback {
    /// Keep `z >= mean * factor`.
    AboveMeanFactor {
        /// Multiplier on the mean height.
        factor: f64,
    },
    /// Keep `z >= mean + k * std_dev`; used for chest-like regions.
    AboveMeanPlusStd {
        /// Number of standard deviations above the mean.
        k: f64,
    },
}

impl HeightFallback {
    /// Cutoff height for the given statistics.
    #[must_use]
    pub fn cutoff(&self, stats: &HeightStats) -> f64 {
        match *self {
            Self::AboveMeanFactor { factor } => stats.mean * factor,
            Self::AboveMeanPlusStd { k } => k.mul_add(stats.std_dev, stats.mean),
        }
    }

    /// Select the vertices at or above the cutoff.
    ///
    /// # Errors
    ///
    /// [`RegionError::EmptyMesh`] if the mesh has no vertices and
    /// [`RegionError::InvalidParameter`] for a non-finite factor.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_region::HeightFallback;
    /// use mesh_types::unit_cube;
    ///
    /// let top = HeightFallback::AboveMeanFactor { factor: 1.0 }
    ///     .select(&unit_cube())
    ///     .unwrap();
    /// assert_eq!(top.len(), 4);
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    pub fn select(&self, mesh: &IndexedMesh) -> RegionResult<HashSet<u32>> {
        let (what, value) = match *self {
            Self::AboveMeanFactor { factor } => ("height factor", factor),
            Self::AboveMeanPlusStd { k } => ("standard deviation multiplier", k),
        };
        if !value.is_finite() {
            return Err(RegionError::InvalidParameter { what, value });
        }

        let stats = HeightStats::from_mesh(mesh).ok_or(RegionError::EmptyMesh)?;
        let cutoff = self.cutoff(&stats);

        Ok(mesh
            .vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.position.z >= cutoff)
            .map(|(i, _)| i as u32)
            .collect())
    }
}

impl std::fmt::Display for HeightFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AboveMeanFactor { factor } => write!(f, "z >= mean * {factor:.2}"),
            Self::AboveMeanPlusStd { k } => write!(f, "z >= mean + {k:.2} * std"),
        }
    }
}
