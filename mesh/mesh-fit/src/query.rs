//! Closest-point and ray queries against a body surface.

use mesh_types::{IndexedMesh, MeshTopology, Triangle};
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::bvh::{Aabb, BvhNode};
use crate::error::{FitError, FitResult};

/// Parallel-ray rejection threshold for [`ray_triangle_intersect`].
const RAY_EPSILON: f64 = 1e-12;

/// Compute the closest point on a triangle to a query point.
///
/// Region-based method from "Real-Time Collision Detection" (Ericson).
#[must_use]
pub fn closest_point_on_triangle(
    point: Point3<f64>,
    v0: Point3<f64>,
    v1: Point3<f64>,
    v2: Point3<f64>,
) -> Point3<f64> {
    let ab = v1 - v0;
    let ac = v2 - v0;
    let ap = point - v0;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return v0;
    }

    let bp = point - v1;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return v1;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return v0 + ab * (d1 / (d1 - d3));
    }

    let cp = point - v2;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return v2;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return v0 + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return v1 + (v2 - v1) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    v0 + ab * (vb * denom) + ac * (vc * denom)
}

/// Intersect the line `origin + t * dir` with a triangle (Möller–Trumbore).
///
/// Unlike a one-sided ray test, `t` may be negative: a hit behind the
/// origin is reported with its signed parameter. Returns `None` when the
/// line is parallel to the triangle or misses it.
#[must_use]
pub fn ray_triangle_intersect(
    origin: Point3<f64>,
    dir: Vector3<f64>,
    v0: Point3<f64>,
    v1: Point3<f64>,
    v2: Point3<f64>,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < RAY_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    Some(f * edge2.dot(&q))
}

/// A point on the body surface returned by a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Location on the surface.
    pub point: Point3<f64>,
    /// Unit normal of the face that was hit.
    pub normal: Vector3<f64>,
    /// Distance from the query origin.
    pub distance: f64,
    /// Index of the face in the body mesh.
    pub face: usize,
}

#[derive(Debug, Clone, Copy)]
struct SurfaceFace {
    index: usize,
    triangle: Triangle,
    normal: Vector3<f64>,
}

/// Relative slack under which two squared distances count as a tie.
const TIE_EPSILON: f64 = 1e-12;

/// Best face found so far by a query.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    /// Squared distance for closest-point queries, signed line parameter
    /// for casts.
    key: f64,
    /// Signed height of the query point over the face plane.
    height: f64,
    point: Point3<f64>,
    slot: usize,
}

fn ties(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIE_EPSILON * (1.0 + a.abs().max(b.abs()))
}

/// Pre-resolved body surface for repeated queries.
///
/// Degenerate faces and faces with out-of-range indices are dropped at
/// construction, so every query works on well-defined normals. The usable
/// faces are indexed by a bounding volume hierarchy.
#[derive(Debug, Clone)]
pub struct BodySurface {
    faces: Vec<SurfaceFace>,
    root: BvhNode,
}

impl BodySurface {
    /// Resolve the usable faces of `mesh` and index them.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::EmptySurface`] if no face is usable.
    pub fn new(mesh: &IndexedMesh) -> FitResult<Self> {
        let faces: Vec<SurfaceFace> = (0..mesh.face_count())
            .filter_map(|index| {
                let triangle = mesh.triangle(index)?;
                let normal = triangle.normal()?;
                Some(SurfaceFace {
                    index,
                    triangle,
                    normal,
                })
            })
            .collect();

        let boxes: Vec<Aabb> = faces.iter().map(|f| Aabb::from_triangle(&f.triangle)).collect();
        let centroids: Vec<Point3<f64>> = faces
            .iter()
            .map(|f| {
                let t = &f.triangle;
                Point3::from((t.v0.coords + t.v1.coords + t.v2.coords) / 3.0)
            })
            .collect();
        let mut slots: Vec<usize> = (0..faces.len()).collect();

        let Some(root) = BvhNode::build(&boxes, &centroids, &mut slots) else {
            return Err(FitError::EmptySurface {
                faces: mesh.face_count(),
            });
        };
        debug!(faces = faces.len(), "Body surface indexed");
        Ok(Self { faces, root })
    }

    /// Number of usable faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn hit(&self, slot: usize, point: Point3<f64>, distance: f64) -> SurfaceHit {
        let face = &self.faces[slot];
        SurfaceHit {
            point,
            normal: face.normal,
            distance,
            face: face.index,
        }
    }

    /// Closest surface point to `point`, with no directional bias.
    ///
    /// When several faces are equally near, as when the closest point is a
    /// shared edge or corner, the face `point` lies furthest behind wins,
    /// then the lowest face index. Below a concave crease this reports a
    /// face the point is behind rather than one it happens to sit above.
    #[must_use]
    pub fn closest(&self, point: Point3<f64>) -> Option<SurfaceHit> {
        let mut best: Option<Candidate> = None;
        self.closest_in(&self.root, point, &mut best);
        best.map(|c| self.hit(c.slot, c.point, c.key.sqrt()))
    }

    fn closest_in(&self, node: &BvhNode, point: Point3<f64>, best: &mut Option<Candidate>) {
        if let Some(b) = best {
            let bound = node.aabb().distance_squared(&point);
            if bound > b.key && !ties(bound, b.key) {
                return;
            }
        }
        match node {
            BvhNode::Leaf { faces, .. } => {
                for &slot in faces {
                    let face = &self.faces[slot];
                    let t = &face.triangle;
                    let found = closest_point_on_triangle(point, t.v0, t.v1, t.v2);
                    let candidate = Candidate {
                        key: (found - point).norm_squared(),
                        height: (point - found).dot(&face.normal),
                        point: found,
                        slot,
                    };
                    if best.is_none_or(|b| self.nearer(&candidate, &b)) {
                        *best = Some(candidate);
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                let dl = left.aabb().distance_squared(&point);
                let dr = right.aabb().distance_squared(&point);
                let (near, far) = if dl <= dr { (left, right) } else { (right, left) };
                self.closest_in(near, point, best);
                self.closest_in(far, point, best);
            }
        }
    }

    fn nearer(&self, a: &Candidate, b: &Candidate) -> bool {
        if !ties(a.key, b.key) {
            return a.key < b.key;
        }
        a.height < b.height
            || (a.height <= b.height && self.faces[a.slot].index < self.faces[b.slot].index)
    }

    /// Nearest intersection of the line through `origin` along `dir`,
    /// looking both forward and backward.
    ///
    /// Hits further than `max_distance` are ignored.
    #[must_use]
    pub fn cast_bidirectional(
        &self,
        origin: Point3<f64>,
        dir: Vector3<f64>,
        max_distance: f64,
    ) -> Option<SurfaceHit> {
        let len = dir.norm();
        if len < RAY_EPSILON || !len.is_finite() {
            return None;
        }
        let dir = dir / len;

        let mut best: Option<Candidate> = None;
        self.cast_in(&self.root, origin, dir, max_distance, &mut best);
        best.map(|c| self.hit(c.slot, c.point, c.key.abs()))
    }

    fn cast_in(
        &self,
        node: &BvhNode,
        origin: Point3<f64>,
        dir: Vector3<f64>,
        max_distance: f64,
        best: &mut Option<Candidate>,
    ) {
        let Some((lo, hi)) = node.aabb().line_interval(&origin, &dir) else {
            return;
        };
        let (lo, hi) = (lo.max(-max_distance), hi.min(max_distance));
        if lo > hi {
            return;
        }
        let nearest = if lo <= 0.0 && hi >= 0.0 {
            0.0
        } else {
            lo.abs().min(hi.abs())
        };
        if best.is_some_and(|b| nearest > b.key.abs()) {
            return;
        }

        match node {
            BvhNode::Leaf { faces, .. } => {
                for &slot in faces {
                    let tri = &self.faces[slot].triangle;
                    let Some(t) = ray_triangle_intersect(origin, dir, tri.v0, tri.v1, tri.v2) else {
                        continue;
                    };
                    if t.abs() > max_distance {
                        continue;
                    }
                    let nearer = best.is_none_or(|b| {
                        t.abs() < b.key.abs()
                            || (t.abs() <= b.key.abs()
                                && self.faces[slot].index < self.faces[b.slot].index)
                    });
                    if nearer {
                        *best = Some(Candidate {
                            key: t,
                            height: 0.0,
                            point: origin + dir * t,
                            slot,
                        });
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                self.cast_in(left, origin, dir, max_distance, best);
                self.cast_in(right, origin, dir, max_distance, best);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{Vertex, open_cylinder, unit_cube};

    fn simple_triangle() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(5.0, 10.0, 0.0),
        )
    }

    fn floor() -> IndexedMesh {
        IndexedMesh::from_raw(
            &[-5.0, -5.0, 0.0, 5.0, -5.0, 0.0, 5.0, 5.0, 0.0, -5.0, 5.0, 0.0],
            &[0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn closest_point_face_region() {
        let (v0, v1, v2) = simple_triangle();
        let closest = closest_point_on_triangle(Point3::new(5.0, 3.0, 5.0), v0, v1, v2);
        assert_relative_eq!(closest, Point3::new(5.0, 3.0, 0.0), epsilon = 1e-10);
    }

    #[test]
    fn closest_point_vertex_and_edge_regions() {
        let (v0, v1, v2) = simple_triangle();
        let corner = closest_point_on_triangle(Point3::new(-5.0, -5.0, 0.0), v0, v1, v2);
        assert_relative_eq!(corner, v0, epsilon = 1e-10);

        let edge = closest_point_on_triangle(Point3::new(5.0, -5.0, 1.0), v0, v1, v2);
        assert_relative_eq!(edge, Point3::new(5.0, 0.0, 0.0), epsilon = 1e-10);
    }

    #[test]
    fn ray_hits_in_both_directions() {
        let (v0, v1, v2) = simple_triangle();
        let down = Vector3::new(0.0, 0.0, -1.0);

        let ahead = ray_triangle_intersect(Point3::new(5.0, 3.0, 5.0), down, v0, v1, v2);
        assert_relative_eq!(ahead.unwrap(), 5.0, epsilon = 1e-10);

        let behind = ray_triangle_intersect(Point3::new(5.0, 3.0, -2.0), down, v0, v1, v2);
        assert_relative_eq!(behind.unwrap(), -2.0, epsilon = 1e-10);
    }

    #[test]
    fn ray_parallel_or_missing() {
        let (v0, v1, v2) = simple_triangle();
        let origin = Point3::new(5.0, 3.0, 5.0);
        assert!(ray_triangle_intersect(origin, Vector3::x(), v0, v1, v2).is_none());

        let far = Point3::new(100.0, 100.0, 5.0);
        assert!(ray_triangle_intersect(far, -Vector3::z(), v0, v1, v2).is_none());
    }

    #[test]
    fn surface_rejects_degenerate_mesh() {
        let mut mesh = IndexedMesh::new();
        for _ in 0..3 {
            mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 1.0));
        }
        mesh.faces.push([0, 1, 2]);
        assert!(matches!(
            BodySurface::new(&mesh),
            Err(FitError::EmptySurface { faces: 1 })
        ));
    }

    #[test]
    fn surface_closest_on_floor() {
        let surface = BodySurface::new(&floor()).unwrap();
        assert_eq!(surface.face_count(), 2);

        let hit = surface.closest(Point3::new(1.0, 2.0, 3.0)).unwrap();
        assert_relative_eq!(hit.point, Point3::new(1.0, 2.0, 0.0), epsilon = 1e-10);
        assert_relative_eq!(hit.distance, 3.0, epsilon = 1e-10);
        assert_relative_eq!(hit.normal, Vector3::z(), epsilon = 1e-10);
    }

    #[test]
    fn surface_cast_picks_nearer_side() {
        let surface = BodySurface::new(&unit_cube()).unwrap();

        // Inside the cube near the top face, pointing up: top is 0.1 away,
        // bottom is 0.9 away behind the origin.
        let hit = surface
            .cast_bidirectional(Point3::new(0.5, 0.5, 0.9), Vector3::z(), f64::INFINITY)
            .unwrap();
        assert_relative_eq!(hit.point.z, 1.0, epsilon = 1e-10);
        assert_relative_eq!(hit.distance, 0.1, epsilon = 1e-10);

        // Same origin, pointing down: the top face is now behind but still nearer.
        let hit = surface
            .cast_bidirectional(Point3::new(0.5, 0.5, 0.9), -Vector3::z(), f64::INFINITY)
            .unwrap();
        assert_relative_eq!(hit.point.z, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn surface_cast_respects_max_distance() {
        let surface = BodySurface::new(&floor()).unwrap();
        let origin = Point3::new(0.0, 0.0, 2.0);
        assert!(surface.cast_bidirectional(origin, -Vector3::z(), 1.0).is_none());
        assert!(surface.cast_bidirectional(origin, -Vector3::z(), 3.0).is_some());
        assert!(surface.cast_bidirectional(origin, Vector3::zeros(), 3.0).is_none());
    }

    /// Two faces meeting at a concave crease along the y axis.
    fn valley() -> IndexedMesh {
        IndexedMesh::from_raw(
            &[
                -1.0, -1.0, 3.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0, -1.0, 1.0, 3.0, 1.0, -1.0, 3.0,
                1.0, 1.0, 3.0,
            ],
            &[0, 1, 2, 0, 2, 3, 1, 4, 2, 2, 4, 5],
        )
    }

    #[test]
    fn closest_matches_face_scan() {
        let body = open_cylinder(0.3, 1.0, 24, 6);
        let surface = BodySurface::new(&body).unwrap();
        let queries = [
            Point3::new(0.5, 0.1, 0.4),
            Point3::new(-0.05, 0.2, 0.9),
            Point3::new(0.0, -0.31, -0.2),
            Point3::new(0.1, 0.1, 1.5),
        ];
        for q in queries {
            let scan = (0..body.face_count())
                .filter_map(|f| body.triangle(f))
                .map(|t| (closest_point_on_triangle(q, t.v0, t.v1, t.v2) - q).norm())
                .fold(f64::INFINITY, f64::min);
            let hit = surface.closest(q).unwrap();
            assert_relative_eq!(hit.distance, scan, epsilon = 1e-12);
        }
    }

    #[test]
    fn cast_matches_face_scan() {
        let body = open_cylinder(0.3, 1.0, 24, 6);
        let surface = BodySurface::new(&body).unwrap();
        let origin = Point3::new(0.05, -0.02, 0.45);
        for dir in [Vector3::x(), Vector3::new(1.0, 1.0, 0.2), Vector3::new(-0.3, 1.0, 0.0)] {
            let unit = dir.normalize();
            let scan = (0..body.face_count())
                .filter_map(|f| body.triangle(f))
                .filter_map(|t| ray_triangle_intersect(origin, unit, t.v0, t.v1, t.v2))
                .map(f64::abs)
                .fold(f64::INFINITY, f64::min);
            let hit = surface.cast_bidirectional(origin, dir, f64::INFINITY).unwrap();
            assert_relative_eq!(hit.distance, scan, epsilon = 1e-12);
        }
    }

    #[test]
    fn crease_tie_reports_face_point_is_behind() {
        let surface = BodySurface::new(&valley()).unwrap();

        // Below the crease and off to the right: both faces are nearest at
        // the crease line, but the point is behind the right-hand face only.
        let q = Point3::new(0.05, 0.0, -0.1);
        let hit = surface.closest(q).unwrap();
        assert_relative_eq!(hit.point, Point3::origin(), epsilon = 1e-12);
        assert!((q - hit.point).dot(&hit.normal) < 0.0);
        assert!(hit.face >= 2);
    }
}
