//! Property-based tests for surface fitting.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mesh_fit::{FitParams, fit_to_surface};
use mesh_types::{IndexedMesh, Point3, Vector3, unit_cube};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A unit cube scaled and shifted so it sits partly inside the body cube.
fn garment_strategy() -> impl Strategy<Value = IndexedMesh> {
    (0.2f64..1.5, -0.3f64..0.3, -0.3f64..0.3, -0.3f64..0.3).prop_map(|(s, x, y, z)| {
        let mut mesh = unit_cube();
        mesh.scale(s);
        mesh.translate(Vector3::new(x, y, z));
        mesh
    })
}

fn strictly_inside(p: &Point3<f64>) -> bool {
    [p.x, p.y, p.z].iter().all(|&c| c > 1e-9 && c < 1.0 - 1e-9)
}

/// Two faces meeting at a concave crease along the y axis, spanning
/// `|x| <= 1`. The body is everything below both face planes.
fn valley() -> IndexedMesh {
    IndexedMesh::from_raw(
        &[
            -1.0, -1.0, 3.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0, -1.0, 1.0, 3.0, 1.0, -1.0, 3.0, 1.0,
            1.0, 3.0,
        ],
        &[0, 1, 2, 0, 2, 3, 1, 4, 2, 2, 4, 5],
    )
}

/// A small triangle near the crease, possibly below it.
fn crease_garment_strategy() -> impl Strategy<Value = IndexedMesh> {
    prop::collection::vec((-0.4f64..0.4, -0.6f64..0.6, -0.3f64..0.6), 3).prop_map(|points| {
        let coords: Vec<f64> = points.iter().flat_map(|&(x, y, z)| [x, y, z]).collect();
        IndexedMesh::from_raw(&coords, &[0, 1, 2])
    })
}

/// Signed heights over the left and right valley planes.
fn valley_heights(p: &Point3<f64>) -> (f64, f64) {
    let s = 10.0_f64.sqrt();
    ((3.0 * p.x + p.z) / s, (-3.0 * p.x + p.z) / s)
}

/// Distance from `p` to the valley surface in the xz cross-section. Each
/// face is a half-line leaving the crease.
fn valley_clearance(p: &Point3<f64>) -> f64 {
    let s = 10.0_f64.sqrt();
    [(-1.0 / s, 3.0 / s), (1.0 / s, 3.0 / s)]
        .iter()
        .map(|&(dx, dz)| {
            let along = p.x * dx + p.z * dz;
            if along >= 0.0 {
                (p.x * dz - p.z * dx).abs()
            } else {
                p.x.hypot(p.z)
            }
        })
        .fold(f64::INFINITY, f64::min)
}

// =============================================================================
// Keep-above-surface constraint
// =============================================================================

proptest! {
    /// Loose fitting with a positive offset never leaves a vertex inside the body.
    #[test]
    fn loose_fit_never_inside(garment in garment_strategy(), thickness in 0.001f64..0.1) {
        let body = unit_cube();
        let mut fitted = garment;
        let report = fit_to_surface(&mut fitted, &body, &FitParams::loose(thickness)).unwrap();

        prop_assert!(report.is_complete());
        for v in &fitted.vertices {
            prop_assert!(!strictly_inside(&v.position), "{:?}", v.position);
        }
    }

    /// Fitting only moves vertices and never touches faces.
    #[test]
    fn fit_preserves_topology(garment in garment_strategy()) {
        let body = unit_cube();
        let mut fitted = garment.clone();
        fit_to_surface(&mut fitted, &body, &FitParams::loose(0.01)).unwrap();
        prop_assert_eq!(fitted.faces, garment.faces);
        prop_assert_eq!(fitted.vertices.len(), garment.vertices.len());
    }

    /// Projected plus unprojected always accounts for every vertex.
    #[test]
    fn fit_report_accounts_for_all(garment in garment_strategy(), max in 0.01f64..2.0) {
        let body = unit_cube();
        let mut fitted = garment;
        let params = FitParams::loose(0.01).with_max_distance(max);
        let report = fit_to_surface(&mut fitted, &body, &params).unwrap();
        prop_assert_eq!(report.projected + report.unprojected.len(), fitted.vertices.len());
        prop_assert!(report.max_shift >= report.mean_shift);
    }
}

// =============================================================================
// Concave body
// =============================================================================

proptest! {
    /// Around a concave crease a fitted vertex ends up outside both faces
    /// and at least the offset away from the surface.
    #[test]
    fn crease_fit_keeps_clearance(garment in crease_garment_strategy(), thickness in 0.002f64..0.2) {
        let body = valley();
        let params = FitParams::loose(thickness);
        let offset = params.offset();
        let mut fitted = garment;
        let report = fit_to_surface(&mut fitted, &body, &params).unwrap();

        prop_assert!(report.is_complete());
        prop_assert!(report.uncleared.is_empty());
        for v in &fitted.vertices {
            let (left, right) = valley_heights(&v.position);
            prop_assert!(left >= -1e-9 && right >= -1e-9, "{:?} inside", v.position);
            let clearance = valley_clearance(&v.position);
            prop_assert!(clearance >= offset - 1e-7, "clearance {} below {}", clearance, offset);
        }
    }
}
