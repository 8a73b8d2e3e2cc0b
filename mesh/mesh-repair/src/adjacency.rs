//! Edge and vertex adjacency.

use hashbrown::{HashMap, HashSet};

/// Edge-to-face and vertex-to-face lookups for a triangle list.
///
/// Garments cut from a body are open shells, so boundary edges are the
/// norm here (waist, hems, cuffs); non-manifold edges are the defect.
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    /// Undirected edge `(lo, hi)` to the faces using it.
    edge_to_faces: HashMap<(u32, u32), Vec<usize>>,
    /// Vertex to the faces using it.
    vertex_to_faces: HashMap<u32, Vec<usize>>,
}

impl MeshAdjacency {
    /// Build adjacency information from a list of faces.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_repair::MeshAdjacency;
    ///
    /// let adj = MeshAdjacency::build(&[[0, 1, 2], [1, 3, 2]]);
    /// assert_eq!(adj.boundary_edge_count(), 4);
    /// assert_eq!(adj.neighbors(2), vec![0, 1, 3]);
    /// ```
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut adjacency = Self::default();

        for (face_idx, &[a, b, c]) in faces.iter().enumerate() {
            for v in [a, b, c] {
                adjacency.vertex_to_faces.entry(v).or_default().push(face_idx);
            }
            for (p, q) in [(a, b), (b, c), (c, a)] {
                adjacency
                    .edge_to_faces
                    .entry(undirected(p, q))
                    .or_default()
                    .push(face_idx);
            }
        }

        adjacency
    }

    /// Faces using the undirected edge `(v0, v1)`, if it exists.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[usize]> {
        self.edge_to_faces.get(&undirected(v0, v1)).map(Vec::as_slice)
    }

    /// Faces using a vertex. Empty for isolated or unknown vertices.
    #[must_use]
    pub fn faces_for_vertex(&self, v: u32) -> &[usize] {
        self.vertex_to_faces.get(&v).map_or(&[], Vec::as_slice)
    }

    /// Vertices sharing an edge with `v`, sorted ascending.
    #[must_use]
    pub fn neighbors(&self, v: u32) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .edge_to_faces
            .keys()
            .filter_map(|&(lo, hi)| match (lo == v, hi == v) {
                (true, false) => Some(hi),
                (false, true) => Some(lo),
                _ => None,
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Neighbor lists for every vertex in `0..vertex_count`, built in one
    /// pass over the edges.
    #[must_use]
    pub fn neighbor_table(&self, vertex_count: usize) -> Vec<Vec<u32>> {
        let mut table = vec![Vec::new(); vertex_count];
        for &(lo, hi) in self.edge_to_faces.keys() {
            if lo == hi {
                continue;
            }
            if let Some(list) = table.get_mut(lo as usize) {
                list.push(hi);
            }
            if let Some(list) = table.get_mut(hi as usize) {
                list.push(lo);
            }
        }
        for list in &mut table {
            list.sort_unstable();
        }
        table
    }

    /// Vertices lying on at least one boundary edge.
    #[must_use]
    pub fn boundary_vertices(&self) -> HashSet<u32> {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .flat_map(|(&(lo, hi), _)| [lo, hi])
            .collect()
    }

    /// Number of edges used by exactly one face.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces.values().filter(|f| f.len() == 1).count()
    }

    /// Number of edges used by more than two faces.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces.values().filter(|f| f.len() > 2).count()
    }

    /// True when no edge is shared by more than two faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edge_to_faces.values().all(|f| f.len() <= 2)
    }

    /// True when every edge is shared by at least two faces.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edge_to_faces.values().all(|f| f.len() >= 2)
    }

    /// Total number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }
}

#[inline]
fn undirected(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 { (v0, v1) } else { (v1, v0) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn strip() -> Vec<[u32; 3]> {
        vec![[0, 1, 2], [1, 3, 2]]
    }

    #[test]
    fn shared_edge_has_two_faces() {
        let adj = MeshAdjacency::build(&strip());
        assert_eq!(adj.faces_for_edge(2, 1).unwrap().len(), 2);
        assert_eq!(adj.faces_for_edge(0, 1).unwrap().len(), 1);
        assert!(adj.faces_for_edge(0, 3).is_none());
        assert_eq!(adj.faces_for_vertex(2).len(), 2);
        assert!(adj.faces_for_vertex(99).is_empty());
    }

    #[test]
    fn open_strip_is_manifold_not_watertight() {
        let adj = MeshAdjacency::build(&strip());
        assert_eq!(adj.edge_count(), 5);
        assert_eq!(adj.boundary_edge_count(), 4);
        assert!(adj.is_manifold());
        assert!(!adj.is_watertight());
        assert_eq!(adj.boundary_vertices().len(), 4);
    }

    #[test]
    fn fan_around_one_edge_is_non_manifold() {
        let adj = MeshAdjacency::build(&[[0, 1, 2], [0, 1, 3], [0, 1, 4]]);
        assert_eq!(adj.non_manifold_edge_count(), 1);
        assert!(!adj.is_manifold());
    }

    #[test]
    fn neighbor_table_matches_single_lookup() {
        let faces = strip();
        let adj = MeshAdjacency::build(&faces);
        let table = adj.neighbor_table(4);
        for v in 0..4 {
            assert_eq!(table[v as usize], adj.neighbors(v));
        }
        assert_eq!(table[0], vec![1, 2]);
    }
}
