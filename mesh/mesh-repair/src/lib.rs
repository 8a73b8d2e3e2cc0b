//! Mesh validation and cleanup for generated garments.
//!
//! This crate provides tools for:
//! - Edge adjacency ([`MeshAdjacency`])
//! - Mesh validation ([`validate_mesh`]): manifoldness, degenerate faces,
//!   duplicate faces and duplicate (coincident) vertices
//! - Vertex welding and unreferenced-vertex removal, reporting the
//!   old-to-new index map so per-vertex data (weights) can follow
//! - A normalized mesh quality factor used by the garment quality report
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with no host-application dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_repair::{CleanupParams, cleanup_mesh, validate_mesh};
//! use mesh_types::{IndexedMesh, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.00001)); // near-duplicate of 2
//! mesh.faces.push([0, 1, 2]);
//! mesh.faces.push([0, 3, 1]);
//!
//! let report = validate_mesh(&mesh);
//! assert_eq!(report.duplicate_vertex_count, 1);
//!
//! let summary = cleanup_mesh(&mut mesh, &CleanupParams::default()).unwrap();
//! assert_eq!(summary.vertices_welded, 1);
//! assert_eq!(mesh.vertices.len(), 3);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod error;
mod quality;
mod validate;
mod weld;

pub use adjacency::MeshAdjacency;
pub use error::{RepairError, RepairResult};
pub use quality::{QualityWeights, quality_factor, quality_factor_with_weights};
pub use validate::{MeshReport, ValidationOptions, validate_mesh, validate_mesh_with_options};
pub use weld::{
    CleanupParams, CleanupSummary, cleanup_mesh, remove_unreferenced_vertices, weld_vertices,
};
