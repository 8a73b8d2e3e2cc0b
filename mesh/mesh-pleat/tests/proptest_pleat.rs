//! Property-based tests for pleat synthesis and evaluation.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mesh_pleat::{PleatParams, evaluate_pleats, partition_band, synthesize_pleats};
use mesh_types::{IndexedMesh, Point3, Vertex, open_cylinder};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A single band of `n` vertices at irregular angles and radii.
fn band_strategy() -> impl Strategy<Value = IndexedMesh> {
    prop::collection::vec((0.0f64..std::f64::consts::TAU, 0.3f64..1.0), 6..60).prop_map(|polar| {
        let mut mesh = IndexedMesh::new();
        for (a, r) in polar {
            mesh.vertices
                .push(Vertex::from_coords(r * a.cos(), r * a.sin(), 0.0));
        }
        mesh
    })
}

fn random_mesh_strategy() -> impl Strategy<Value = IndexedMesh> {
    (
        prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0, 0.0f64..1.0), 3..40),
        prop::collection::vec((0u32..40, 0u32..40, 0u32..40), 0..40),
    )
        .prop_map(|(points, faces)| {
            let n = u32::try_from(points.len()).unwrap();
            let mut mesh = IndexedMesh::new();
            for (x, y, z) in points {
                mesh.vertices.push(Vertex::from_coords(x, y, z));
            }
            for (a, b, c) in faces {
                mesh.faces.push([a % n, b % n, c % n]);
            }
            mesh
        })
}

// =============================================================================
// Partition
// =============================================================================

proptest! {
    /// Exactly `p` positions, none both inner and outer, all in range.
    #[test]
    fn partition_completeness(p in 1usize..30, extra in 0usize..100) {
        let n = p + extra;
        let partition = partition_band(n, p);
        prop_assert_eq!(partition.len(), p);
        for i in &partition.inner {
            prop_assert!(!partition.outer.contains(i));
            prop_assert!(*i < n);
        }
        for o in &partition.outer {
            prop_assert!(*o < n);
        }
        prop_assert_eq!(partition.inner.len(), p.div_ceil(2));
    }
}

// =============================================================================
// Synthesis
// =============================================================================

proptest! {
    /// Inner folds move exactly `depth`, outer folds exactly `depth / 2`.
    #[test]
    fn depth_asymmetry(mesh in band_strategy(), count in 6usize..24, depth in 0.01f64..0.2) {
        prop_assume!(mesh.vertices.len() >= count);
        let before = mesh.clone();
        let mut pleated = mesh;
        let summary = synthesize_pleats(&mut pleated, &PleatParams::new(count, depth)).unwrap();

        let sum = before
            .vertices
            .iter()
            .fold(Point3::origin().coords, |acc, v| acc + v.position.coords);
        #[allow(clippy::cast_precision_loss)]
        let centroid = Point3::from(sum / before.vertices.len() as f64);

        let mut inner = 0;
        let mut outer = 0;
        for (a, b) in before.vertices.iter().zip(&pleated.vertices) {
            let moved = (b.position - a.position).norm();
            if moved < 1e-12 {
                continue;
            }
            let outward = (b.position - a.position).dot(&(a.position - centroid));
            if outward < 0.0 {
                prop_assert!((moved - depth).abs() < 1e-9);
                inner += 1;
            } else {
                prop_assert!((moved - depth * 0.5).abs() < 1e-9);
                outer += 1;
            }
        }
        prop_assert_eq!(inner, summary.inner_displaced);
        prop_assert_eq!(outer, summary.outer_displaced);
        prop_assert_eq!(summary.displaced() + summary.degenerate.len(), count);
    }

    /// Synthesis never changes the face list or vertex count.
    #[test]
    fn synthesis_preserves_topology(segments in 6u32..40, count in 6usize..24) {
        let mut mesh = open_cylinder(0.4, 0.6, segments, 6);
        let faces = mesh.faces.clone();
        let n = mesh.vertices.len();
        synthesize_pleats(&mut mesh, &PleatParams::new(count, 0.05)).unwrap();
        prop_assert_eq!(mesh.faces, faces);
        prop_assert_eq!(mesh.vertices.len(), n);
    }
}

// =============================================================================
// Evaluation
// =============================================================================

proptest! {
    /// The total score is always in [0, 100] and every issue has a recommendation.
    #[test]
    fn evaluator_bounded(mesh in random_mesh_strategy(), expected in 1usize..30) {
        let report = evaluate_pleats(&mesh, expected).unwrap();
        prop_assert!(report.total_score <= 100);
        prop_assert_eq!(
            report.total_score,
            (report.angle_score + report.depth_score + report.mesh_score).min(100)
        );
        prop_assert_eq!(report.issues.len(), report.recommendations.len());
    }
}
