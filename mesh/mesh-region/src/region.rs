//! Selected mesh regions.

use hashbrown::HashSet;
use mesh_types::RiggedMesh;
use tracing::{debug, warn};

use crate::error::RegionResult;
use crate::selector::RegionSelector;

/// How a region's vertices were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionMethod {
    /// Vertex-group weights above a threshold.
    GroupWeights,
    /// Height heuristic; lower quality than group weights.
    HeightFallback,
}

impl SelectionMethod {
    /// True for the degraded geometric heuristic.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::HeightFallback)
    }
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GroupWeights => write!(f, "group weights"),
            Self::HeightFallback => write!(f, "height fallback"),
        }
    }
}

/// A named set of vertices selected from a mesh.
///
/// # Example
///
/// ```
/// use mesh_region::{MeshRegion, SelectionMethod};
///
/// let region = MeshRegion::from_vertices("sleeve", [0, 1, 2, 3]);
/// assert_eq!(region.name(), "sleeve");
/// assert_eq!(region.vertex_count(), 4);
/// assert!(!region.method().is_fallback());
/// ```
#[derive(Debug, Clone)]
pub struct MeshRegion {
    name: String,
    vertices: HashSet<u32>,
    method: SelectionMethod,
}

impl MeshRegion {
    /// Create a region from explicit vertex indices.
    #[must_use]
    pub fn from_vertices(name: impl Into<String>, vertices: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name: name.into(),
            vertices: vertices.into_iter().collect(),
            method: SelectionMethod::GroupWeights,
        }
    }

    /// Create a region by applying a selector to a rigged mesh.
    ///
    /// Selecting with [`RegionSelector::Height`] logs a warning: the result
    /// is a geometric guess, not an anatomical region.
    ///
    /// # Errors
    ///
    /// Propagates selector errors.
    pub fn from_selector(
        rigged: &RiggedMesh,
        name: impl Into<String>,
        selector: &RegionSelector,
    ) -> RegionResult<Self> {
        let name = name.into();
        let vertices = selector.select_vertices(rigged)?;

        match selector {
            RegionSelector::Height(fallback) => warn!(
                "Region '{}' on '{}' selected by height fallback ({}): {} vertices",
                name,
                rigged.name,
                fallback,
                vertices.len()
            ),
            RegionSelector::Weights { groups, threshold } => debug!(
                "Region '{}' on '{}' selected from {} groups at threshold {:.3}: {} vertices",
                name,
                rigged.name,
                groups.len(),
                threshold,
                vertices.len()
            ),
        }

        Ok(Self {
            name,
            vertices,
            method: selector.method(),
        })
    }

    /// Region name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How the vertices were selected.
    #[must_use]
    pub const fn method(&self) -> SelectionMethod {
        self.method
    }

    /// Selected vertex indices.
    #[must_use]
    pub const fn vertices(&self) -> &HashSet<u32> {
        &self.vertices
    }

    /// Number of selected vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// True when nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Check membership of a vertex.
    #[must_use]
    pub fn contains_vertex(&self, vertex: u32) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Vertex indices in ascending order.
    #[must_use]
    pub fn sorted_vertices(&self) -> Vec<u32> {
        let mut out: Vec<u32> = self.vertices.iter().copied().collect();
        out.sort_unstable();
        out
    }
}
