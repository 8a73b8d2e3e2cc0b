//! Region selection criteria.

use hashbrown::{HashMap, HashSet};
use mesh_types::{RiggedMesh, VertexGroup};

use crate::error::{RegionError, RegionResult};
use crate::height::HeightFallback;
use crate::region::SelectionMethod;

/// Per-vertex decision on the maximum weight across candidate groups.
///
/// A vertex is kept when the largest weight any candidate group assigns to
/// it strictly exceeds `threshold`. Vertices that no group mentions have no
/// weight and are never kept. There is no neighborhood smoothing.
///
/// # Example
///
/// ```
/// use mesh_region::WeightSelector;
/// use mesh_types::VertexGroup;
///
/// let chest = VertexGroup::new("Chest", 0).with_weights([(0, 0.05), (1, 0.6)]);
/// let arm = VertexGroup::new("UpperArm.L", 1).with_weights([(0, 0.4)]);
///
/// let picked = WeightSelector::new(0.1).select(3, &[&chest, &arm]).unwrap();
/// assert_eq!(picked.len(), 2); // vertex 0 via the arm, vertex 1 via the chest
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightSelector {
    /// Weight a vertex must exceed to be kept.
    pub threshold: f64,
}

impl WeightSelector {
    /// Create a selector with the given threshold.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Maximum weight per vertex across `groups`, ignoring entries at or
    /// beyond `vertex_count`.
    #[must_use]
    pub fn max_weights(vertex_count: usize, groups: &[&VertexGroup]) -> HashMap<u32, f64> {
        let mut max: HashMap<u32, f64> = HashMap::new();
        for group in groups {
            for (vertex, weight) in group.iter() {
                if vertex as usize >= vertex_count || weight <= 0.0 {
                    continue;
                }
                max.entry(vertex)
                    .and_modify(|w| *w = w.max(weight))
                    .or_insert(weight);
            }
        }
        max
    }

    /// Select the vertices of a `vertex_count`-vertex mesh.
    ///
    /// # Errors
    ///
    /// [`RegionError::InvalidParameter`] if the threshold is NaN.
    pub fn select(&self, vertex_count: usize, groups: &[&VertexGroup]) -> RegionResult<HashSet<u32>> {
        if self.threshold.is_nan() {
            return Err(RegionError::InvalidParameter {
                what: "threshold",
                value: self.threshold,
            });
        }

        Ok(Self::max_weights(vertex_count, groups)
            .into_iter()
            .filter(|&(_, w)| w > self.threshold)
            .map(|(v, _)| v)
            .collect())
    }
}

/// How to pick a region's vertices from a rigged mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionSelector {
    /// Weight threshold over the groups with these indices.
    Weights {
        /// Candidate group indices ([`VertexGroup::index`]).
        groups: Vec<u32>,
        /// Weight a vertex must exceed.
        threshold: f64,
    },

    /// Geometric fallback, ignoring vertex groups.
    Height(HeightFallback),
}

impl RegionSelector {
    /// Weight-threshold selector over the given group indices.
    #[must_use]
    pub fn weights(groups: impl IntoIterator<Item = u32>, threshold: f64) -> Self {
        Self::Weights {
            groups: groups.into_iter().collect(),
            threshold,
        }
    }

    /// Height fallback selector.
    #[must_use]
    pub const fn height(fallback: HeightFallback) -> Self {
        Self::Height(fallback)
    }

    /// Which selection method this selector represents.
    #[must_use]
    pub const fn method(&self) -> SelectionMethod {
        match self {
            Self::Weights { .. } => SelectionMethod::GroupWeights,
            Self::Height(_) => SelectionMethod::HeightFallback,
        }
    }

    /// Apply the selector.
    ///
    /// # Errors
    ///
    /// [`RegionError::GroupNotFound`] if a group index is not on the mesh,
    /// plus whatever the underlying selector reports.
    pub fn select_vertices(&self, rigged: &RiggedMesh) -> RegionResult<HashSet<u32>> {
        match self {
            Self::Weights { groups, threshold } => {
                let resolved = groups
                    .iter()
                    .map(|&index| {
                        rigged
                            .groups
                            .iter()
                            .find(|g| g.index == index)
                            .ok_or(RegionError::GroupNotFound {
                                index,
                                group_count: rigged.groups.len(),
                            })
                    })
                    .collect::<RegionResult<Vec<_>>>()?;
                WeightSelector::new(*threshold).select(rigged.mesh.vertices.len(), &resolved)
            }
            Self::Height(fallback) => fallback.select(&rigged.mesh),
        }
    }
}
