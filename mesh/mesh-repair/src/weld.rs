//! Vertex welding and compaction.
//!
//! Every operation here reports how vertex indices moved so that sparse
//! per-vertex data (vertex group weights) can be rewritten to match.

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, Vertex};
use nalgebra::Point3;
use tracing::debug;

use crate::error::{RepairError, RepairResult};

/// Parameters for [`cleanup_mesh`].
#[derive(Debug, Clone)]
pub struct CleanupParams {
    /// Vertices closer than this are merged. Zero disables welding.
    pub merge_distance: f64,

    /// Drop vertices that no face references after welding.
    pub remove_unreferenced: bool,
}

impl Default for CleanupParams {
    fn default() -> Self {
        Self {
            merge_distance: 1e-4,
            remove_unreferenced: true,
        }
    }
}

impl CleanupParams {
    /// Set the merge distance.
    #[must_use]
    pub const fn with_merge_distance(mut self, distance: f64) -> Self {
        self.merge_distance = distance;
        self
    }

    /// Enable or disable unreferenced-vertex removal.
    #[must_use]
    pub const fn with_remove_unreferenced(mut self, remove: bool) -> Self {
        self.remove_unreferenced = remove;
        self
    }

    /// Check that the merge distance is finite and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.merge_distance.is_finite() && self.merge_distance >= 0.0
    }
}

/// Outcome of [`cleanup_mesh`].
#[derive(Debug, Clone, Default)]
pub struct CleanupSummary {
    /// Vertices merged into another vertex.
    pub vertices_welded: usize,
    /// Faces dropped because welding collapsed two of their corners.
    pub faces_collapsed: usize,
    /// Vertices dropped (welded away or unreferenced).
    pub vertices_removed: usize,
    /// Old vertex index to new vertex index; `None` for removed vertices.
    pub remap: Vec<Option<u32>>,
}

impl CleanupSummary {
    /// True when the mesh was modified.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.vertices_welded > 0 || self.faces_collapsed > 0 || self.vertices_removed > 0
    }
}

/// Weld nearby vertices, then compact the vertex array.
///
/// # Errors
///
/// Returns [`RepairError::InvalidParams`] for a negative or non-finite merge
/// distance and [`RepairError::InvalidIndex`] if a face references a missing
/// vertex. The mesh is untouched on error.
pub fn cleanup_mesh(mesh: &mut IndexedMesh, params: &CleanupParams) -> RepairResult<CleanupSummary> {
    if !params.is_valid() {
        return Err(RepairError::invalid_params(format!(
            "merge distance must be finite and non-negative, got {}",
            params.merge_distance
        )));
    }
    if let Some((_, index)) = mesh.first_invalid_face() {
        return Err(RepairError::InvalidIndex {
            index,
            vertex_count: mesh.vertices.len(),
        });
    }

    let original_vertices = mesh.vertices.len();
    let faces_before = mesh.faces.len();

    let (vertices_welded, representative) = weld_in_place(mesh, params.merge_distance);
    let faces_collapsed = faces_before - mesh.faces.len();

    let compaction = if params.remove_unreferenced {
        remove_unreferenced_vertices(mesh)
    } else {
        identity_remap(mesh.vertices.len())
    };

    // Compose: old -> representative -> compacted
    let remap: Vec<Option<u32>> = representative
        .iter()
        .map(|&rep| compaction.get(rep as usize).copied().flatten())
        .collect();

    let summary = CleanupSummary {
        vertices_welded,
        faces_collapsed,
        vertices_removed: original_vertices - mesh.vertices.len(),
        remap,
    };

    debug!(
        welded = summary.vertices_welded,
        collapsed = summary.faces_collapsed,
        removed = summary.vertices_removed,
        "Mesh cleanup complete"
    );

    Ok(summary)
}

/// Weld vertices closer than `epsilon`.
///
/// Faces are rewritten to point at the surviving vertex and faces that
/// collapse to a line are removed. Merged vertices stay in the array,
/// unreferenced; follow with [`remove_unreferenced_vertices`] to compact.
///
/// Returns the number of vertices merged.
pub fn weld_vertices(mesh: &mut IndexedMesh, epsilon: f64) -> usize {
    weld_in_place(mesh, epsilon).0
}

/// Remove vertices not referenced by any face.
///
/// Returns the old-to-new index map (`None` for removed vertices).
#[allow(clippy::cast_possible_truncation)]
pub fn remove_unreferenced_vertices(mesh: &mut IndexedMesh) -> Vec<Option<u32>> {
    let mut referenced = vec![false; mesh.vertices.len()];
    for face in &mesh.faces {
        for &v in face {
            if let Some(slot) = referenced.get_mut(v as usize) {
                *slot = true;
            }
        }
    }

    let mut remap = vec![None; mesh.vertices.len()];
    let mut kept = Vec::with_capacity(mesh.vertices.len());
    for (old, vertex) in std::mem::take(&mut mesh.vertices).into_iter().enumerate() {
        if referenced[old] {
            remap[old] = Some(kept.len() as u32);
            kept.push(vertex);
        }
    }
    mesh.vertices = kept;

    for face in &mut mesh.faces {
        for v in face.iter_mut() {
            if let Some(new) = remap.get(*v as usize).copied().flatten() {
                *v = new;
            }
        }
    }

    remap
}

/// Canonical representative of every vertex under `epsilon` welding, plus
/// the number of non-canonical vertices.
///
/// Uses a spatial hash with cell size `2 * epsilon` and scans the 3x3x3
/// neighborhood of each cell. The lowest index in a cluster wins.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn representatives(vertices: &[Vertex], epsilon: f64) -> (Vec<u32>, usize) {
    let mut rep: Vec<u32> = (0..vertices.len() as u32).collect();
    if vertices.is_empty() || epsilon.is_nan() || epsilon <= 0.0 {
        return (rep, 0);
    }

    let cell_size = epsilon * 2.0;
    let mut grid: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (idx, vertex) in vertices.iter().enumerate() {
        grid.entry(cell_of(&vertex.position, cell_size))
            .or_default()
            .push(idx as u32);
    }

    let mut merged = 0;
    for (idx, vertex) in vertices.iter().enumerate() {
        let idx = idx as u32;
        if rep[idx as usize] != idx {
            continue;
        }
        let (cx, cy, cz) = cell_of(&vertex.position, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &other in candidates {
                        if other <= idx || rep[other as usize] != other {
                            continue;
                        }
                        let dist = (vertex.position - vertices[other as usize].position).norm();
                        if dist < epsilon {
                            rep[other as usize] = idx;
                            merged += 1;
                        }
                    }
                }
            }
        }
    }

    (rep, merged)
}

fn weld_in_place(mesh: &mut IndexedMesh, epsilon: f64) -> (usize, Vec<u32>) {
    let (rep, merged) = representatives(&mesh.vertices, epsilon);
    if merged == 0 {
        return (0, rep);
    }

    for face in &mut mesh.faces {
        for v in face.iter_mut() {
            if let Some(&target) = rep.get(*v as usize) {
                *v = target;
            }
        }
    }
    mesh.faces
        .retain(|&[i0, i1, i2]| i0 != i1 && i1 != i2 && i0 != i2);

    (merged, rep)
}

#[allow(clippy::cast_possible_truncation)]
fn identity_remap(len: usize) -> Vec<Option<u32>> {
    (0..len).map(|i| Some(i as u32)).collect()
}

#[allow(clippy::cast_possible_truncation)]
fn cell_of(pos: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    (
        (pos.x / cell_size).floor() as i64,
        (pos.y / cell_size).floor() as i64,
        (pos.z / cell_size).floor() as i64,
    )
}
