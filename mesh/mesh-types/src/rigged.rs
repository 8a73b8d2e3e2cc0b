//! Named meshes carrying vertex groups.

use crate::{IndexedMesh, VertexGroup};
use hashbrown::HashSet;

/// A named mesh together with its vertex groups.
///
/// This is the unit the garment pipeline consumes (the body) and produces
/// (the garment). Each value is exclusively owned; a garment derived from a
/// body is a separate copy.
///
/// # Example
///
/// ```
/// use hashbrown::HashSet;
/// use mesh_types::{unit_cube, RiggedMesh};
///
/// let mut body = RiggedMesh::new("Body", unit_cube());
/// let top = body.add_group("Chest");
/// for v in 4..8 {
///     top.set_weight(v, 1.0);
/// }
///
/// let keep: HashSet<u32> = (4..8).collect();
/// let lid = body.extract("Body_lid", &keep);
/// assert_eq!(lid.mesh.vertices.len(), 4);
/// assert_eq!(lid.groups[0].len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiggedMesh {
    /// Object identifier.
    pub name: String,

    /// Geometry.
    pub mesh: IndexedMesh,

    /// Vertex groups, indexed by [`VertexGroup::index`].
    pub groups: Vec<VertexGroup>,
}

impl RiggedMesh {
    /// Wrap a mesh without any vertex groups.
    #[must_use]
    pub fn new(name: impl Into<String>, mesh: IndexedMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            groups: Vec::new(),
        }
    }

    /// Append a new empty group and return it for filling.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_group(&mut self, name: impl Into<String>) -> &mut VertexGroup {
        let index = self.groups.len() as u32;
        self.groups.push(VertexGroup::new(name, index));
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    /// Look up a group by exact name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&VertexGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Copy the mesh keeping only the vertices in `keep`.
    ///
    /// Faces that reference a deleted vertex are dropped, and every group is
    /// remapped onto the surviving vertices. The source is left untouched.
    #[must_use]
    pub fn extract(&self, name: impl Into<String>, keep: &HashSet<u32>) -> Self {
        let (mesh, remap) = self.mesh.extract_vertices(keep);
        let mut groups = self.groups.clone();
        for group in &mut groups {
            group.remap(&remap);
        }
        Self {
            name: name.into(),
            mesh,
            groups,
        }
    }

    /// Apply a vertex index remap produced by a cleanup pass to every group.
    pub fn remap_groups(&mut self, remap: &[Option<u32>]) {
        for group in &mut self.groups {
            group.remap(remap);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::unit_cube;

    #[test]
    fn add_group_assigns_sequential_indices() {
        let mut body = RiggedMesh::new("Body", unit_cube());
        body.add_group("Hips");
        body.add_group("Spine");
        assert_eq!(body.groups[1].index, 1);
        assert_eq!(body.group("Spine").unwrap().index, 1);
        assert!(body.group("spine").is_none());
    }

    #[test]
    fn extract_keeps_source_intact() {
        let mut body = RiggedMesh::new("Body", unit_cube());
        body.add_group("Hips").set_weight(0, 1.0);
        body.groups[0].set_weight(7, 0.5);

        let keep: HashSet<u32> = [4, 5, 6, 7].into_iter().collect();
        let part = body.extract("Body_part", &keep);

        assert_eq!(body.mesh.vertices.len(), 8);
        assert_eq!(body.groups[0].len(), 2);
        assert_eq!(part.name, "Body_part");
        // Vertex 7 becomes index 3; vertex 0 is gone
        assert_eq!(part.groups[0].weight(3), Some(0.5));
        assert_eq!(part.groups[0].len(), 1);
    }
}
