//! Resolved triangle with concrete corner positions.

use nalgebra::{Point3, Vector3};

/// One mesh face with its three corner positions looked up.
///
/// Corners follow the mesh winding, so [`Triangle::normal`] points to the
/// outside of a correctly wound garment or body surface.
///
/// ```
/// use mesh_types::{Point3, Triangle};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// assert!(tri.normal().is_some_and(|n| n.z > 0.999));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First corner.
    pub v0: Point3<f64>,
    /// Second corner.
    pub v1: Point3<f64>,
    /// Third corner.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Build a triangle from three corners in winding order.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Edge cross product `(v1 - v0) x (v2 - v0)`.
    ///
    /// Its length is twice the area; vertex normal accumulation sums these
    /// directly.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit normal, or `None` when the corners are collinear.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len = n.norm();
        (len > f64::EPSILON).then(|| n / len)
    }

    /// Area of the face.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        0.5 * self.normal_unnormalized().norm()
    }

    /// Whether the area is below `min_area`.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self, min_area: f64) -> bool {
        self.area() < min_area
    }
}
