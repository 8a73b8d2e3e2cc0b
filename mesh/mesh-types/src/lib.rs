//! Core mesh types for garment generation.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace:
//!
//! - [`Vertex`] - A point in 3D space with an optional unit normal
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`VertexGroup`] - A named, sparse vertex-index to weight mapping
//! - [`RiggedMesh`] - A named mesh together with its vertex groups
//!
//! # Layer 0 Crate
//!
//! This crate has no host-application dependencies. Meshes are plain owned
//! values; whoever builds one owns it until it is handed to the caller.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** with Z as height. Garment
//! height bands and the height-based fallback selector read the Z
//! coordinate.
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshTopology, Point3, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert_eq!(mesh.recompute_normals(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod group;
mod mesh;
mod rigged;
mod traits;
mod triangle;
mod vertex;

pub use group::VertexGroup;
pub use mesh::{IndexedMesh, open_cylinder, unit_cube};
pub use rigged::RiggedMesh;
pub use traits::MeshTopology;
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
