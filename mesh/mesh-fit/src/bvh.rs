//! Bounding volume hierarchy over body faces.
//!
//! Built once per [`BodySurface`](crate::BodySurface) so closest-point and
//! ray queries touch a logarithmic number of faces instead of all of them.

use mesh_types::Triangle;
use nalgebra::{Point3, Vector3};

/// Faces per leaf.
const LEAF_SIZE: usize = 4;

/// Padding so flat boxes still catch rays grazing their plane.
const BOX_PADDING: f64 = 1e-9;

/// Axis-aligned box around one or more faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Aabb {
    pub(crate) min: Point3<f64>,
    pub(crate) max: Point3<f64>,
}

impl Aabb {
    pub(crate) fn from_triangle(tri: &Triangle) -> Self {
        let min = Point3::new(
            tri.v0.x.min(tri.v1.x).min(tri.v2.x),
            tri.v0.y.min(tri.v1.y).min(tri.v2.y),
            tri.v0.z.min(tri.v1.z).min(tri.v2.z),
        );
        let max = Point3::new(
            tri.v0.x.max(tri.v1.x).max(tri.v2.x),
            tri.v0.y.max(tri.v1.y).max(tri.v2.y),
            tri.v0.z.max(tri.v1.z).max(tri.v2.z),
        );
        Self { min, max }.padded(BOX_PADDING)
    }

    fn padded(self, pad: f64) -> Self {
        let pad = Vector3::repeat(pad);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    fn longest_axis(&self) -> usize {
        let extent = self.max - self.min;
        if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        }
    }

    /// Squared distance from `point` to the box, zero inside.
    pub(crate) fn distance_squared(&self, point: &Point3<f64>) -> f64 {
        (0..3)
            .map(|axis| {
                let c = point[axis];
                let excess = if c < self.min[axis] {
                    self.min[axis] - c
                } else if c > self.max[axis] {
                    c - self.max[axis]
                } else {
                    0.0
                };
                excess * excess
            })
            .sum()
    }

    /// Parameter interval where the line `origin + t * dir` is inside the
    /// box, over all `t` including negative values.
    pub(crate) fn line_interval(&self, origin: &Point3<f64>, dir: &Vector3<f64>) -> Option<(f64, f64)> {
        let mut lo = f64::NEG_INFINITY;
        let mut hi = f64::INFINITY;
        for axis in 0..3 {
            let (o, d) = (origin[axis], dir[axis]);
            if d.abs() < f64::EPSILON {
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let t0 = (self.min[axis] - o) * inv;
            let t1 = (self.max[axis] - o) * inv;
            lo = lo.max(t0.min(t1));
            hi = hi.min(t0.max(t1));
            if lo > hi {
                return None;
            }
        }
        Some((lo, hi))
    }
}

/// Node of the face hierarchy. Leaves hold indices into the face list the
/// tree was built from.
#[derive(Debug, Clone)]
pub(crate) enum BvhNode {
    Leaf {
        aabb: Aabb,
        faces: Vec<usize>,
    },
    Internal {
        aabb: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// Build a hierarchy over `boxes`, splitting at the centroid median of
    /// the longest axis. `None` when `indices` is empty.
    pub(crate) fn build(boxes: &[Aabb], centroids: &[Point3<f64>], indices: &mut [usize]) -> Option<Self> {
        let (&first, rest) = indices.split_first()?;
        let aabb = rest
            .iter()
            .fold(boxes[first], |acc, &i| acc.union(&boxes[i]));

        if indices.len() <= LEAF_SIZE {
            return Some(Self::Leaf {
                aabb,
                faces: indices.to_vec(),
            });
        }

        let axis = aabb.longest_axis();
        indices.sort_by(|&a, &b| centroids[a][axis].total_cmp(&centroids[b][axis]));

        let mid = indices.len() / 2;
        let (left, right) = indices.split_at_mut(mid);
        match (
            Self::build(boxes, centroids, left),
            Self::build(boxes, centroids, right),
        ) {
            (Some(l), Some(r)) => Some(Self::Internal {
                aabb,
                left: Box::new(l),
                right: Box::new(r),
            }),
            (Some(node), None) | (None, Some(node)) => Some(node),
            (None, None) => None,
        }
    }

    pub(crate) const fn aabb(&self) -> &Aabb {
        match self {
            Self::Leaf { aabb, .. } | Self::Internal { aabb, .. } => aabb,
        }
    }
}
