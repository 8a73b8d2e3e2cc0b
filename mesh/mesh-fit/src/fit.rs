//! Garment-to-body fitting.

// Vertex indices fit in u32 by construction of IndexedMesh.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use std::fmt;

use mesh_types::{IndexedMesh, MeshTopology};
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{FitError, FitResult};
use crate::query::{BodySurface, SurfaceHit};

/// Corrective pushes per vertex before it is reported as uncleared.
const MAX_PUSHES: usize = 8;

/// Floating-point slack when comparing a clearance with the offset.
const CLEARANCE_TOLERANCE: f64 = 1e-9;

/// How a garment vertex finds its place on the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitPolicy {
    /// Bidirectional ray along the garment vertex normal, minimal offset.
    Tight,
    /// Closest surface point, offset by a fraction of the garment thickness.
    #[default]
    Loose,
}

impl fmt::Display for FitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tight => write!(f, "tight"),
            Self::Loose => write!(f, "loose"),
        }
    }
}

/// Parameters for [`fit_to_surface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Projection policy.
    pub policy: FitPolicy,

    /// Offset above the surface in tight mode.
    pub tight_offset: f64,

    /// Garment thickness, used for the loose-mode offset.
    pub thickness: f64,

    /// Fraction of `thickness` used as the loose-mode offset.
    pub offset_multiplier: f64,

    /// Ignore surface points further away than this.
    pub max_distance: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            policy: FitPolicy::Loose,
            tight_offset: 0.001,
            thickness: 0.01,
            offset_multiplier: 0.5,
            max_distance: f64::INFINITY,
        }
    }
}

impl FitParams {
    /// Tight fit with the default 0.001 offset.
    #[must_use]
    pub fn tight() -> Self {
        Self {
            policy: FitPolicy::Tight,
            ..Self::default()
        }
    }

    /// Loose fit for a garment of the given thickness.
    #[must_use]
    pub fn loose(thickness: f64) -> Self {
        Self {
            policy: FitPolicy::Loose,
            thickness,
            ..Self::default()
        }
    }

    /// Set the policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: FitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the tight-mode offset.
    #[must_use]
    pub const fn with_tight_offset(mut self, offset: f64) -> Self {
        self.tight_offset = offset;
        self
    }

    /// Set the garment thickness.
    #[must_use]
    pub const fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    /// Set the loose-mode offset multiplier.
    #[must_use]
    pub const fn with_offset_multiplier(mut self, multiplier: f64) -> Self {
        self.offset_multiplier = multiplier;
        self
    }

    /// Set the maximum projection distance.
    #[must_use]
    pub const fn with_max_distance(mut self, distance: f64) -> Self {
        self.max_distance = distance;
        self
    }

    /// Distance kept between the garment and the body after projection.
    #[must_use]
    pub fn offset(&self) -> f64 {
        match self.policy {
            FitPolicy::Tight => self.tight_offset,
            FitPolicy::Loose => self.thickness * self.offset_multiplier,
        }
    }

    /// Check that all values are usable.
    ///
    /// The offset must be finite and non-negative, otherwise a fitted vertex
    /// could end up below the surface. `max_distance` must be positive and
    /// may be infinite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let offset = self.offset();
        offset.is_finite() && offset >= 0.0 && !self.max_distance.is_nan() && self.max_distance > 0.0
    }
}

/// Statistics from a fitting pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitReport {
    /// Vertices moved onto the body surface.
    pub projected: usize,

    /// Vertices left at their pre-fit position.
    pub unprojected: Vec<u32>,

    /// Projected vertices that had to be pushed out of a neighbouring face.
    pub pushed: usize,

    /// Projected vertices still closer to the body than the offset after
    /// the push limit.
    pub uncleared: Vec<u32>,

    /// Mean vertex displacement over projected vertices.
    pub mean_shift: f64,

    /// Largest vertex displacement.
    pub max_shift: f64,
}

impl FitReport {
    /// True when every vertex found a projection.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unprojected.is_empty()
    }
}

impl fmt::Display for FitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} projected ({} pushed, {} uncleared), {} unprojected, mean shift {:.4}, max shift {:.4}",
            self.projected,
            self.pushed,
            self.uncleared.len(),
            self.unprojected.len(),
            self.mean_shift,
            self.max_shift
        )
    }
}

/// Where a projected vertex ends up.
#[derive(Debug, Clone, Copy)]
struct Placement {
    target: Point3<f64>,
    pushes: usize,
    cleared: bool,
}

/// A face plane a placement must stay `offset` above.
#[derive(Debug, Clone, Copy)]
struct Clearance {
    point: Point3<f64>,
    normal: Vector3<f64>,
}

impl Clearance {
    fn height(&self, p: &Point3<f64>) -> f64 {
        (p - self.point).dot(&self.normal)
    }
}

/// Offset `hit` along its face normal, then push the result out of every
/// face it sank behind.
///
/// Each push moves along the mean normal of all faces met so far, far
/// enough to put the target `offset` above each of their planes, so faces
/// already cleared stay cleared.
fn place(surface: &BodySurface, hit: SurfaceHit, offset: f64) -> Placement {
    let mut target = hit.point + hit.normal * offset;
    let mut planes = vec![Clearance {
        point: hit.point,
        normal: hit.normal,
    }];

    let mut pushes = 0;
    while let Some(near) = surface.closest(target) {
        let height = (target - near.point).dot(&near.normal);
        if near.distance + CLEARANCE_TOLERANCE >= offset && height >= -CLEARANCE_TOLERANCE {
            return Placement {
                target,
                pushes,
                cleared: true,
            };
        }
        if pushes == MAX_PUSHES {
            return Placement {
                target,
                pushes,
                cleared: false,
            };
        }

        pushes += 1;

        planes.push(Clearance {
            point: near.point,
            normal: near.normal,
        });
        let sum: Vector3<f64> = planes.iter().map(|c| c.normal).sum();
        let dir = sum.try_normalize(f64::EPSILON).unwrap_or(near.normal);
        let step = planes
            .iter()
            .filter_map(|c| {
                let rate = c.normal.dot(&dir);
                (rate > f64::EPSILON).then(|| (offset - c.height(&target)) / rate)
            })
            .fold(0.0, f64::max);

        target += if step > CLEARANCE_TOLERANCE {
            dir * step
        } else if height < 0.0 {
            near.normal * (offset - height)
        } else {
            // Outside every plane but too close to an edge or corner.
            let away = (target - near.point)
                .try_normalize(f64::EPSILON)
                .unwrap_or(near.normal);
            away * (offset - near.distance)
        };
    }

    Placement {
        target,
        pushes,
        cleared: true,
    }
}

/// Project every vertex of `garment` onto `body` and offset it outward.
///
/// Garment normals are recomputed first and again after fitting. The offset
/// follows the body face normal at the projected point; a vertex that ends
/// up behind or too close to another face is pushed out again, up to a
/// fixed number of times, and listed in [`FitReport::uncleared`] if that is
/// not enough.
///
/// # Errors
///
/// Returns [`FitError::InvalidParams`] for a negative or non-finite offset,
/// and [`FitError::EmptySurface`] when the body has no usable faces.
///
/// # Example
///
/// ```
/// use mesh_fit::{FitParams, fit_to_surface};
/// use mesh_types::unit_cube;
///
/// let body = unit_cube();
/// let mut garment = unit_cube();
/// garment.scale(1.1);
///
/// let report = fit_to_surface(&mut garment, &body, &FitParams::loose(0.01)).unwrap();
/// assert!(report.is_complete());
/// ```
pub fn fit_to_surface(
    garment: &mut IndexedMesh,
    body: &IndexedMesh,
    params: &FitParams,
) -> FitResult<FitReport> {
    if !params.is_valid() {
        return Err(FitError::InvalidParams(format!(
            "offset {} and max distance {} must be non-negative and finite",
            params.offset(),
            params.max_distance
        )));
    }
    let surface = BodySurface::new(body)?;
    let offset = params.offset();

    info!(
        policy = %params.policy,
        offset,
        vertices = garment.vertex_count(),
        body_faces = surface.face_count(),
        "Fitting garment to body surface"
    );

    garment.recompute_normals();

    let placements: Vec<Option<Placement>> = garment
        .vertices
        .par_iter()
        .map(|vertex| {
            let hit: Option<SurfaceHit> = match params.policy {
                FitPolicy::Tight => vertex.normal.and_then(|n| {
                    surface.cast_bidirectional(vertex.position, n, params.max_distance)
                }),
                FitPolicy::Loose => surface
                    .closest(vertex.position)
                    .filter(|hit| hit.distance <= params.max_distance),
            };
            hit.map(|hit| place(&surface, hit, offset))
        })
        .collect();

    let mut report = FitReport::default();
    let mut total_shift = 0.0;
    for (index, (vertex, placement)) in garment.vertices.iter_mut().zip(placements).enumerate() {
        match placement {
            Some(placement) if placement.target.iter().all(|c| c.is_finite()) => {
                let shift = (placement.target - vertex.position).norm();
                total_shift += shift;
                report.max_shift = report.max_shift.max(shift);
                report.projected += 1;
                if placement.pushes > 0 {
                    report.pushed += 1;
                }
                if !placement.cleared {
                    report.uncleared.push(index as u32);
                }
                vertex.position = placement.target;
            }
            _ => report.unprojected.push(index as u32),
        }
    }
    if report.projected > 0 {
        report.mean_shift = total_shift / report.projected as f64;
    }

    garment.recompute_normals();

    if !report.uncleared.is_empty() {
        warn!(
            uncleared = report.uncleared.len(),
            "Some garment vertices are still closer to the body than the offset"
        );
    }
    if report.is_complete() {
        debug!(%report, "Fit complete");
    } else {
        warn!(
            unprojected = report.unprojected.len(),
            projected = report.projected,
            "Some garment vertices found no projection and were left in place"
        );
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{open_cylinder, unit_cube};

    fn radius(p: &Point3<f64>) -> f64 {
        p.x.hypot(p.y)
    }

    /// Rotate about Z so garment columns never line up with body edges.
    fn twist(mesh: &mut IndexedMesh, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        for v in &mut mesh.vertices {
            let (x, y) = (v.position.x, v.position.y);
            v.position.x = x * cos - y * sin;
            v.position.y = x * sin + y * cos;
        }
    }

    #[test]
    fn test_params_offsets() {
        assert_relative_eq!(FitParams::tight().offset(), 0.001);
        assert_relative_eq!(FitParams::loose(0.02).offset(), 0.01);
        let params = FitParams::loose(0.02).with_offset_multiplier(2.0);
        assert_relative_eq!(params.offset(), 0.04);
    }

    #[test]
    fn test_params_validation() {
        assert!(FitParams::default().is_valid());
        assert!(!FitParams::tight().with_tight_offset(-0.01).is_valid());
        assert!(!FitParams::loose(f64::NAN).is_valid());
        assert!(!FitParams::default().with_max_distance(0.0).is_valid());
    }

    #[test]
    fn test_loose_fit_on_cylinder() {
        let body = open_cylinder(1.0, 2.0, 64, 8);
        let mut garment = open_cylinder(1.3, 1.0, 64, 2);
        garment.translate(Vector3::new(0.0, 0.0, 0.5));

        let params = FitParams::loose(0.02);
        let report = fit_to_surface(&mut garment, &body, &params).unwrap();
        assert!(report.is_complete());

        // Polygonal body: radius lies between the inscribed and circumscribed values.
        let inscribed = (std::f64::consts::PI / 64.0).cos();
        for v in &garment.vertices {
            let r = radius(&v.position);
            assert!(r >= inscribed + 0.01 - 1e-9, "radius {r}");
            assert!(r <= 1.0 + 0.01 + 1e-9, "radius {r}");
        }
    }

    #[test]
    fn test_tight_fit_from_inside() {
        let body = open_cylinder(1.0, 2.0, 64, 8);
        let mut garment = open_cylinder(0.8, 1.0, 64, 2);
        twist(&mut garment, 0.013);
        garment.translate(Vector3::new(0.0, 0.0, 0.6));

        let report = fit_to_surface(&mut garment, &body, &FitParams::tight()).unwrap();
        assert!(report.is_complete());
        for v in &garment.vertices {
            assert!(radius(&v.position) > 0.99);
        }
        assert!(report.max_shift > 0.15);
    }

    #[test]
    fn test_fit_stays_above_surface() {
        let body = unit_cube();
        let mut garment = unit_cube();
        garment.scale(0.5);
        garment.translate(Vector3::new(0.25, 0.25, 0.25));

        fit_to_surface(&mut garment, &body, &FitParams::loose(0.1)).unwrap();
        for v in &garment.vertices {
            let p = v.position;
            let outside = [p.x, p.y, p.z].iter().any(|&c| !(0.0..=1.0).contains(&c));
            assert!(outside, "vertex {p:?} left inside the body");
        }
    }

    /// Two faces meeting at a concave crease along the y axis. The body is
    /// everything below both face planes.
    fn valley() -> IndexedMesh {
        IndexedMesh::from_raw(
            &[
                -1.0, -1.0, 3.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0, -1.0, 1.0, 3.0, 1.0, -1.0, 3.0,
                1.0, 1.0, 3.0,
            ],
            &[0, 1, 2, 0, 2, 3, 1, 4, 2, 2, 4, 5],
        )
    }

    /// Signed heights over the left and right valley planes.
    fn valley_heights(p: &Point3<f64>) -> (f64, f64) {
        let s = 10.0_f64.sqrt();
        ((3.0 * p.x + p.z) / s, (-3.0 * p.x + p.z) / s)
    }

    #[test]
    fn test_crease_keeps_clearance() {
        let body = valley();
        let mut garment = IndexedMesh::from_raw(
            &[0.0, -0.5, 0.001, 0.0, 0.5, 0.001, 0.001, 0.0, 0.001],
            &[0, 1, 2],
        );

        let params = FitParams::loose(0.1);
        let offset = params.offset();
        let report = fit_to_surface(&mut garment, &body, &params).unwrap();

        assert!(report.is_complete());
        assert!(report.uncleared.is_empty());
        assert_eq!(report.pushed, 3);
        for v in &garment.vertices {
            let (left, right) = valley_heights(&v.position);
            assert!(left >= offset - 1e-9, "left height {left}");
            assert!(right >= offset - 1e-9, "right height {right}");
        }
    }

    #[test]
    fn test_unprojectable_vertices_left_in_place() {
        let body = open_cylinder(1.0, 1.0, 16, 2);
        let mut garment = open_cylinder(1.1, 1.0, 16, 2);
        garment.translate(Vector3::new(0.0, 0.0, 10.0));
        let before = garment.clone();

        let params = FitParams::loose(0.01).with_max_distance(1.0);
        let report = fit_to_surface(&mut garment, &body, &params).unwrap();

        assert_eq!(report.projected, 0);
        assert_eq!(report.unprojected.len(), garment.vertex_count());
        for (a, b) in before.vertices.iter().zip(&garment.vertices) {
            assert_relative_eq!(a.position, b.position);
        }
    }

    #[test]
    fn test_empty_body_rejected() {
        let mut garment = unit_cube();
        let result = fit_to_surface(&mut garment, &IndexedMesh::new(), &FitParams::default());
        assert!(matches!(result, Err(FitError::EmptySurface { faces: 0 })));
    }

    #[test]
    fn test_report_display() {
        let report = FitReport {
            projected: 3,
            unprojected: vec![7],
            pushed: 1,
            mean_shift: 0.5,
            max_shift: 1.0,
            ..FitReport::default()
        };
        let text = format!("{report}");
        assert!(text.contains("3 projected (1 pushed, 0 uncleared)"));
        assert!(text.contains("1 unprojected"));
    }
}
