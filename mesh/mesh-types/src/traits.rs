//! Read-only topology access shared by the geometry crates.

use crate::{Triangle, Vertex};

/// Indexed access to the vertices and faces of a triangle mesh.
///
/// Selection, extrusion and fitting only read meshes through this trait,
/// plus direct field access where they mutate positions.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangular faces.
    fn face_count(&self) -> usize;

    /// A mesh without vertices or without faces has no surface to work on.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Vertex at `index`, if it exists.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Corner indices of face `index`, if it exists.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Face `face_index` with its corners resolved.
    ///
    /// `None` when the face or one of its corners is out of range.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Every face that resolves, in face order.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}
