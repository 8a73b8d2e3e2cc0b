//! Indexed triangle mesh.

use crate::{MeshTopology, Triangle, Vertex};
use hashbrown::HashSet;
use nalgebra::Vector3;

/// Face normal sums shorter than this leave the vertex without a normal.
const NORMAL_EPSILON: f64 = 1e-10;

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, with faces referencing
/// vertices by index. Faces use **counter-clockwise (CCW) winding** when
/// viewed from outside.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, MeshTopology, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from flat coordinate and index arrays.
    ///
    /// Returns an empty mesh if either array length is not a multiple of 3.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = IndexedMesh::from_raw(&positions, &[0, 1, 2]);
    /// assert_eq!(mesh.vertex_count(), 3);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();

        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Self { vertices, faces }
    }

    /// Translate mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Scale mesh uniformly around the origin.
    pub fn scale(&mut self, factor: f64) {
        for vertex in &mut self.vertices {
            vertex.position.coords *= factor;
        }
    }

    /// Find the first face that references a vertex index outside the
    /// vertex array. Returns `(face_index, vertex_index)`.
    #[must_use]
    pub fn first_invalid_face(&self) -> Option<(usize, u32)> {
        let count = self.vertices.len();
        self.faces.iter().enumerate().find_map(|(fi, face)| {
            face.iter()
                .find(|&&vi| vi as usize >= count)
                .map(|&vi| (fi, vi))
        })
    }

    /// Recompute every vertex normal from the current face topology.
    ///
    /// Normals are the normalized sum of the area-weighted normals of all
    /// adjacent faces. Vertices that touch no face, or whose face normals
    /// cancel out, get `None`.
    ///
    /// Returns the number of vertices left without a normal.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::unit_cube;
    ///
    /// let mut cube = unit_cube();
    /// assert_eq!(cube.recompute_normals(), 0);
    /// let len = cube.vertices[6].normal.map_or(0.0, |n| n.norm());
    /// assert!((len - 1.0).abs() < 1e-10);
    /// ```
    pub fn recompute_normals(&mut self) -> usize {
        let mut sums = vec![Vector3::zeros(); self.vertices.len()];

        for &[i0, i1, i2] in &self.faces {
            let (Some(a), Some(b), Some(c)) = (
                self.vertices.get(i0 as usize),
                self.vertices.get(i1 as usize),
                self.vertices.get(i2 as usize),
            ) else {
                continue;
            };
            let n = Triangle::new(a.position, b.position, c.position).normal_unnormalized();
            sums[i0 as usize] += n;
            sums[i1 as usize] += n;
            sums[i2 as usize] += n;
        }

        let mut missing = 0;
        for (vertex, sum) in self.vertices.iter_mut().zip(sums) {
            let len = sum.norm();
            if len > NORMAL_EPSILON {
                vertex.normal = Some(sum / len);
            } else {
                vertex.normal = None;
                missing += 1;
            }
        }
        missing
    }

    /// Copy the vertices listed in `keep` into a new mesh, deleting the rest.
    ///
    /// Kept vertices preserve their relative order. Faces survive only when
    /// all three of their vertices are kept. Returns the new mesh together
    /// with the old-to-new index map (`None` for deleted vertices).
    ///
    /// # Example
    ///
    /// ```
    /// use hashbrown::HashSet;
    /// use mesh_types::{unit_cube, MeshTopology};
    ///
    /// let cube = unit_cube();
    /// let top: HashSet<u32> = [4, 5, 6, 7].into_iter().collect();
    /// let (lid, remap) = cube.extract_vertices(&top);
    ///
    /// assert_eq!(lid.vertex_count(), 4);
    /// assert_eq!(lid.face_count(), 2);
    /// assert_eq!(remap[4], Some(0));
    /// assert_eq!(remap[0], None);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
    pub fn extract_vertices(&self, keep: &HashSet<u32>) -> (Self, Vec<Option<u32>>) {
        let mut remap = vec![None; self.vertices.len()];
        let mut vertices = Vec::with_capacity(keep.len());

        for (old, vertex) in self.vertices.iter().enumerate() {
            if keep.contains(&(old as u32)) {
                remap[old] = Some(vertices.len() as u32);
                vertices.push(vertex.clone());
            }
        }

        let faces = self
            .faces
            .iter()
            .filter_map(|&[a, b, c]| {
                let lookup = |i: u32| remap.get(i as usize).copied().flatten();
                Some([lookup(a)?, lookup(b)?, lookup(c)?])
            })
            .collect();

        (Self { vertices, faces }, remap)
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [i0, i1, i2] = *self.faces.get(face_index)?;
        Some(Triangle::new(
            self.vertices.get(i0 as usize)?.position,
            self.vertices.get(i1 as usize)?.position,
            self.vertices.get(i2 as usize)?.position,
        ))
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        (0..self.faces.len()).filter_map(|fi| self.triangle(fi))
    }
}

/// Create a unit cube mesh from (0,0,0) to (1,1,1) with outward-facing
/// winding.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let positions = [
        0.0, 0.0, 0.0, // 0
        1.0, 0.0, 0.0, // 1
        1.0, 1.0, 0.0, // 2
        0.0, 1.0, 0.0, // 3
        0.0, 0.0, 1.0, // 4
        1.0, 0.0, 1.0, // 5
        1.0, 1.0, 1.0, // 6
        0.0, 1.0, 1.0, // 7
    ];
    let faces = [
        0, 2, 1, 0, 3, 2, // bottom (-Z)
        4, 5, 6, 4, 6, 7, // top (+Z)
        0, 1, 5, 0, 5, 4, // front (-Y)
        3, 7, 6, 3, 6, 2, // back (+Y)
        0, 4, 7, 0, 7, 3, // left (-X)
        1, 2, 6, 1, 6, 5, // right (+X)
    ];
    IndexedMesh::from_raw(&positions, &faces)
}

/// Create an open cylinder (a tube without caps) around the Z axis.
///
/// The tube has `rings + 1` rows of `segments` vertices each, spaced
/// evenly from `z = 0` to `z = height`, with outward-facing winding. Vertex
/// `row * segments + s` sits at angle `2π·s / segments`.
///
/// Returns an empty mesh when `segments < 3` or `rings == 0`.
///
/// # Example
///
/// ```
/// use mesh_types::{open_cylinder, MeshTopology};
///
/// let tube = open_cylinder(1.0, 2.0, 24, 4);
/// assert_eq!(tube.vertex_count(), 24 * 5);
/// assert_eq!(tube.face_count(), 24 * 4 * 2);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn open_cylinder(radius: f64, height: f64, segments: u32, rings: u32) -> IndexedMesh {
    if segments < 3 || rings == 0 {
        return IndexedMesh::new();
    }

    let rows = rings + 1;
    let mut mesh = IndexedMesh::with_capacity(
        (rows * segments) as usize,
        (rings * segments * 2) as usize,
    );

    for row in 0..rows {
        let z = height * f64::from(row) / f64::from(rings);
        for s in 0..segments {
            let theta = std::f64::consts::TAU * f64::from(s) / f64::from(segments);
            mesh.vertices.push(Vertex::from_coords(
                radius * theta.cos(),
                radius * theta.sin(),
                z,
            ));
        }
    }

    for row in 0..rings {
        for s in 0..segments {
            let next = (s + 1) % segments;
            let a = row * segments + s;
            let b = row * segments + next;
            let c = (row + 1) * segments + next;
            let d = (row + 1) * segments + s;
            mesh.faces.push([a, b, c]);
            mesh.faces.push([a, c, d]);
        }
    }

    mesh
}
