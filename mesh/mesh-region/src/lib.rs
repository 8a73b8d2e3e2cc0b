//! Vertex region selection for garment generation.
//!
//! Decides which vertices of a body mesh belong to a garment region.
//!
//! # Layer 0 Crate
//!
//! This crate has no host-application dependencies and never mutates the
//! mesh it selects from.
//!
//! # Overview
//!
//! - [`WeightSelector`] - keeps a vertex when its maximum weight across a
//!   set of candidate vertex groups exceeds a threshold
//! - [`HeightFallback`] - purely geometric selection on the vertical
//!   coordinate, for bodies without usable vertex groups
//! - [`RegionSelector`] - either of the above, applied to a [`RiggedMesh`]
//! - [`MeshRegion`] - the named result, remembering how it was selected
//!
//! # Quick Start
//!
//! ```
//! use mesh_region::{MeshRegion, RegionSelector, SelectionMethod};
//! use mesh_types::{RiggedMesh, unit_cube};
//!
//! let mut body = RiggedMesh::new("Body", unit_cube());
//! let hips = body.add_group("Hips");
//! hips.set_weight(0, 0.9);
//! hips.set_weight(1, 0.2);
//!
//! let selector = RegionSelector::weights([0], 0.3);
//! let region = MeshRegion::from_selector(&body, "pants", &selector).unwrap();
//!
//! assert_eq!(region.vertex_count(), 1);
//! assert!(region.contains_vertex(0));
//! assert_eq!(region.method(), SelectionMethod::GroupWeights);
//! ```
//!
//! The height fallback is a degraded heuristic; applying it logs a warning.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod height;
mod region;
mod selector;

pub use error::{RegionError, RegionResult};
pub use height::{HeightFallback, HeightStats};
pub use region::{MeshRegion, SelectionMethod};
pub use selector::{RegionSelector, WeightSelector};

// Re-export for convenience
pub use mesh_types::{IndexedMesh, RiggedMesh, VertexGroup};
