//! Garment generation from rigged body meshes.
//!
//! Given a body with vertex groups, this crate cuts out the region a
//! garment covers, gives it thickness and fits it back onto the body.
//! Skirts get pleats instead of a fit, and a quality score.
//!
//! # Pipeline
//!
//! 1. [`FitSettings`] are validated; out-of-range values fail up front.
//! 2. A [`SelectionPlan`] picks candidate vertex groups for the
//!    [`GarmentKind`] using name normalization from `garment_rig`.
//! 3. Vertices above the kind's weight threshold are selected. Bodies
//!    without matching groups fall back to a height cut where the kind
//!    allows it.
//! 4. The region is copied out, duplicate vertices are welded and vertex
//!    groups are remapped onto the garment.
//! 5. The shell is extruded along vertex normals and optionally smoothed.
//! 6. The garment is fitted to the body surface, or for skirts, pleated
//!    and scored.
//!
//! Steps that cannot be applied fully are recorded as
//! [`GeometryWarning`]s on the result. Only invalid input and empty
//! selections are errors; see [`ErrorKind`].
//!
//! # Quick Start
//!
//! ```
//! use garment_core::{FitSettings, GarmentKind, generate_pleated_skirt, generate_region_selected_mesh};
//! use mesh_types::{RiggedMesh, open_cylinder};
//!
//! let mut body = RiggedMesh::new("Body", open_cylinder(0.3, 1.0, 24, 4));
//! let hips = body.add_group("Hips");
//! for v in 48..120 {
//!     hips.set_weight(v, 1.0);
//! }
//!
//! let settings = FitSettings::default();
//! let pants = generate_region_selected_mesh(&body, GarmentKind::Pants, &settings).unwrap();
//! println!("{}", pants.summary());
//!
//! let skirt = generate_pleated_skirt(&body, &settings).unwrap();
//! assert!(skirt.quality.is_some());
//! ```
//!
//! # Logging
//!
//! Progress is reported through `tracing`. The crate never installs a
//! subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod garment;
mod generator;
mod kind;
mod pipeline;
mod plan;
mod settings;

pub use error::{ErrorKind, GarmentError, GarmentResult};
pub use garment::{GarmentMesh, GeometryWarning};
pub use generator::{GarmentGenerator, GarmentJob, SessionSummary, generate_batch};
pub use kind::GarmentKind;
pub use pipeline::{
    QUALITY_WARNING_THRESHOLD, evaluate_pleats_geometry, generate_pleated_skirt,
    generate_region_selected_mesh,
};
pub use plan::{PANTS_PATTERNS, SelectionPlan};
pub use settings::{FitSettings, GarmentThresholds};

// Re-export the types callers need to build inputs and read results.
pub use garment_rig::{GroupDiagnosis, RegionMatcher, RegionTag};
pub use mesh_pleat::{QualityIssue, QualityReport};
pub use mesh_region::SelectionMethod;
