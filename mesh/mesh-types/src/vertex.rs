//! Vertex type.

use nalgebra::{Point3, Vector3};

/// A mesh vertex: a position and an optional unit normal.
///
/// Normals are derived data. They are filled by
/// [`IndexedMesh::recompute_normals`](crate::IndexedMesh::recompute_normals)
/// and go stale as soon as the face topology or positions change.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, Vertex};
///
/// let v1 = Vertex::new(Point3::new(1.0, 2.0, 3.0));
/// let v2 = Vertex::from_coords(1.0, 2.0, 3.0);
///
/// assert_eq!(v1.position, v2.position);
/// assert!(v1.normal.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Unit normal, if one has been computed.
    pub normal: Option<Vector3<f64>>,
}

impl Vertex {
    /// Create a new vertex with only position set.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Create a vertex with position and normal.
    ///
    /// The normal is stored as given; callers pass unit vectors.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Point3, Vector3, Vertex};
    ///
    /// let v = Vertex::with_normal(Point3::origin(), Vector3::z());
    /// assert_eq!(v.normal, Some(Vector3::z()));
    /// ```
    #[inline]
    #[must_use]
    pub const fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            normal: Some(normal),
        }
    }

    /// Check that every coordinate of the position is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }
}
