//! Mesh validation and health reporting.

use hashbrown::HashSet;
use mesh_types::{IndexedMesh, MeshTopology};

use crate::adjacency::MeshAdjacency;
use crate::weld::representatives;

/// Report of mesh validation results.
///
/// Boundary edges are counted but not treated as issues: garments are open
/// shells by construction.
#[derive(Debug, Clone, Default)]
pub struct MeshReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of faces.
    pub face_count: usize,
    /// Total number of edges.
    pub edge_count: usize,

    /// Edges with only one adjacent face.
    pub boundary_edge_count: usize,
    /// Edges with more than two adjacent faces.
    pub non_manifold_edge_count: usize,
    /// Faces with (near-)zero area.
    pub degenerate_face_count: usize,
    /// Faces repeating another face's vertex set.
    pub duplicate_face_count: usize,
    /// Vertices within the duplicate epsilon of an earlier vertex.
    pub duplicate_vertex_count: usize,
    /// Faces referencing a vertex index out of range.
    pub invalid_face_count: usize,

    /// No boundary edges.
    pub is_watertight: bool,
    /// No non-manifold edges.
    pub is_manifold: bool,
}

impl MeshReport {
    /// Check if the mesh has any defects.
    #[must_use]
    pub const fn has_issues(&self) -> bool {
        self.issue_count() > 0
    }

    /// Total number of defects found.
    #[must_use]
    pub const fn issue_count(&self) -> usize {
        self.non_manifold_edge_count
            + self.degenerate_face_count
            + self.duplicate_face_count
            + self.duplicate_vertex_count
            + self.invalid_face_count
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Edges: {} ({} boundary)", self.edge_count, self.boundary_edge_count)?;
        writeln!(
            f,
            "  Manifold: {}",
            if self.is_manifold { "Yes" } else { "No" }
        )?;

        if self.has_issues() {
            writeln!(f, "  Issues:")?;
            if self.non_manifold_edge_count > 0 {
                writeln!(f, "    Non-manifold edges: {}", self.non_manifold_edge_count)?;
            }
            if self.degenerate_face_count > 0 {
                writeln!(f, "    Degenerate faces: {}", self.degenerate_face_count)?;
            }
            if self.duplicate_face_count > 0 {
                writeln!(f, "    Duplicate faces: {}", self.duplicate_face_count)?;
            }
            if self.duplicate_vertex_count > 0 {
                writeln!(f, "    Duplicate vertices: {}", self.duplicate_vertex_count)?;
            }
            if self.invalid_face_count > 0 {
                writeln!(f, "    Invalid faces: {}", self.invalid_face_count)?;
            }
        }

        Ok(())
    }
}

/// Options for mesh validation.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Area below which a face is degenerate.
    pub degenerate_area_threshold: f64,
    /// Distance below which two vertices count as duplicates.
    pub duplicate_vertex_epsilon: f64,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            degenerate_area_threshold: 1e-12,
            duplicate_vertex_epsilon: 1e-4,
        }
    }
}

/// Validate a mesh with default options.
///
/// # Example
///
/// ```
/// use mesh_repair::validate_mesh;
/// use mesh_types::open_cylinder;
///
/// let report = validate_mesh(&open_cylinder(1.0, 1.0, 12, 3));
/// assert!(report.is_manifold);
/// assert!(!report.is_watertight);
/// assert!(!report.has_issues());
/// ```
#[must_use]
pub fn validate_mesh(mesh: &IndexedMesh) -> MeshReport {
    validate_mesh_with_options(mesh, &ValidationOptions::default())
}

/// Validate a mesh with custom options.
#[must_use]
pub fn validate_mesh_with_options(mesh: &IndexedMesh, options: &ValidationOptions) -> MeshReport {
    let adjacency = MeshAdjacency::build(&mesh.faces);

    let mut degenerate_face_count = 0;
    let mut invalid_face_count = 0;
    for face_index in 0..mesh.faces.len() {
        match mesh.triangle(face_index) {
            Some(tri) if tri.is_degenerate(options.degenerate_area_threshold) => {
                degenerate_face_count += 1;
            }
            Some(_) => {}
            None => invalid_face_count += 1,
        }
    }

    let (_, duplicate_vertex_count) =
        representatives(&mesh.vertices, options.duplicate_vertex_epsilon);

    MeshReport {
        vertex_count: mesh.vertices.len(),
        face_count: mesh.faces.len(),
        edge_count: adjacency.edge_count(),
        boundary_edge_count: adjacency.boundary_edge_count(),
        non_manifold_edge_count: adjacency.non_manifold_edge_count(),
        degenerate_face_count,
        duplicate_face_count: count_duplicate_faces(&mesh.faces),
        duplicate_vertex_count,
        invalid_face_count,
        is_watertight: adjacency.is_watertight(),
        is_manifold: adjacency.is_manifold(),
    }
}

/// Count faces whose vertex set (either winding) was already seen.
fn count_duplicate_faces(faces: &[[u32; 3]]) -> usize {
    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(faces.len());
    faces
        .iter()
        .filter(|face| {
            let mut key = **face;
            key.sort_unstable();
            !seen.insert(key)
        })
        .count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mesh_types::{Vertex, unit_cube};

    fn simple_triangle() -> IndexedMesh {
        IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0, 0.0], &[0, 1, 2])
    }

    #[test]
    fn validate_single_triangle() {
        let report = validate_mesh(&simple_triangle());
        assert_eq!(report.vertex_count, 3);
        assert_eq!(report.boundary_edge_count, 3);
        assert!(!report.is_watertight);
        assert!(!report.has_issues());
    }

    #[test]
    fn closed_cube_is_clean() {
        let report = validate_mesh(&unit_cube());
        assert!(report.is_watertight);
        assert!(report.is_manifold);
        assert_eq!(report.issue_count(), 0);
    }

    #[test]
    fn detect_degenerate_faces() {
        let mesh = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0], &[0, 1, 2]);
        assert_eq!(validate_mesh(&mesh).degenerate_face_count, 1);
    }

    #[test]
    fn detect_duplicate_faces_either_winding() {
        let mut mesh = simple_triangle();
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([0, 2, 1]);
        assert_eq!(validate_mesh(&mesh).duplicate_face_count, 2);
    }

    #[test]
    fn detect_duplicate_vertices() {
        let mut mesh = simple_triangle();
        mesh.vertices.push(Vertex::from_coords(10.0, 0.0, 0.00001));
        let report = validate_mesh(&mesh);
        assert_eq!(report.duplicate_vertex_count, 1);
        assert!(report.has_issues());

        let strict = ValidationOptions {
            duplicate_vertex_epsilon: 1e-9,
            ..Default::default()
        };
        assert_eq!(validate_mesh_with_options(&mesh, &strict).duplicate_vertex_count, 0);
    }

    #[test]
    fn invalid_faces_are_counted_not_panicked_on() {
        let mut mesh = simple_triangle();
        mesh.faces.push([0, 1, 7]);
        let report = validate_mesh(&mesh);
        assert_eq!(report.invalid_face_count, 1);
    }

    #[test]
    fn report_display() {
        let mut mesh = simple_triangle();
        mesh.faces.push([0, 1, 2]);
        let display = validate_mesh(&mesh).to_string();

        assert!(display.contains("Vertices: 3"));
        assert!(display.contains("Duplicate faces: 1"));
    }
}
