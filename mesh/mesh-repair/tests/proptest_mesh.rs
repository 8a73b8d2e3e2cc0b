//! Property-based tests for validation and cleanup.
//!
//! Run with: cargo test -p mesh-repair -- proptest

use mesh_repair::{CleanupParams, cleanup_mesh, quality_factor, validate_mesh};
use mesh_types::{IndexedMesh, Vertex};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A vertex on a coarse lattice so that coincident vertices actually occur.
fn arb_lattice_vertex() -> impl Strategy<Value = Vertex> {
    prop::array::uniform3(0i32..4).prop_map(|[x, y, z]| {
        Vertex::from_coords(f64::from(x) * 0.5, f64::from(y) * 0.5, f64::from(z) * 0.5)
    })
}

/// A mesh whose faces only reference existing vertices.
fn arb_mesh(max_vertices: usize, max_faces: usize) -> impl Strategy<Value = IndexedMesh> {
    prop::collection::vec(arb_lattice_vertex(), 3..=max_vertices).prop_flat_map(move |verts| {
        #[allow(clippy::cast_possible_truncation)]
        let n = verts.len() as u32;
        prop::collection::vec(prop::array::uniform3(0..n), 1..=max_faces)
            .prop_map(move |faces| IndexedMesh::from_parts(verts.clone(), faces))
    })
}

// =============================================================================
// Validation
// =============================================================================

proptest! {
    #[test]
    fn validation_is_deterministic(mesh in arb_mesh(30, 50)) {
        let a = validate_mesh(&mesh);
        let b = validate_mesh(&mesh);
        prop_assert_eq!(a.edge_count, b.edge_count);
        prop_assert_eq!(a.duplicate_vertex_count, b.duplicate_vertex_count);
        prop_assert_eq!(a.is_manifold, b.is_manifold);
    }

    #[test]
    fn quality_factor_is_bounded(mesh in arb_mesh(30, 50)) {
        let q = quality_factor(&validate_mesh(&mesh));
        prop_assert!((0.0..=1.0).contains(&q), "quality factor {} out of range", q);
    }
}

// =============================================================================
// Cleanup
// =============================================================================

proptest! {
    #[test]
    fn cleanup_leaves_valid_indices(mesh in arb_mesh(30, 50)) {
        let mut cleaned = mesh.clone();
        let summary = cleanup_mesh(&mut cleaned, &CleanupParams::default()).unwrap();

        prop_assert!(cleaned.first_invalid_face().is_none());
        prop_assert_eq!(summary.remap.len(), mesh.vertices.len());
        prop_assert!(cleaned.vertices.len() <= mesh.vertices.len());
    }

    #[test]
    fn cleanup_removes_all_duplicates(mesh in arb_mesh(30, 50)) {
        let mut cleaned = mesh.clone();
        cleanup_mesh(&mut cleaned, &CleanupParams::default()).unwrap();
        prop_assert_eq!(validate_mesh(&cleaned).duplicate_vertex_count, 0);
    }

    #[test]
    fn remap_preserves_positions(mesh in arb_mesh(30, 50)) {
        let mut cleaned = mesh.clone();
        let summary = cleanup_mesh(&mut cleaned, &CleanupParams::default()).unwrap();

        for (old, new) in summary.remap.iter().enumerate() {
            if let Some(new) = new {
                let before = mesh.vertices[old].position;
                let after = cleaned.vertices[*new as usize].position;
                prop_assert!((before - after).norm() < 1e-4);
            }
        }
    }

    #[test]
    fn cleanup_is_idempotent(mesh in arb_mesh(30, 50)) {
        let mut once = mesh.clone();
        cleanup_mesh(&mut once, &CleanupParams::default()).unwrap();
        let mut twice = once.clone();
        let summary = cleanup_mesh(&mut twice, &CleanupParams::default()).unwrap();

        prop_assert!(!summary.had_changes());
        prop_assert_eq!(once, twice);
    }
}
