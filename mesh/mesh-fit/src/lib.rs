//! Surface fitting of garment meshes onto a body mesh.
//!
//! Every garment vertex is projected onto the body surface and then pushed
//! back out along the body's face normal, so a fitted garment never sits
//! inside the body it was cut from.
//!
//! Two policies are available:
//!
//! - [`FitPolicy::Tight`] casts a ray along the garment vertex normal in both
//!   directions and keeps the nearer hit, then offsets by a small constant.
//! - [`FitPolicy::Loose`] uses the closest surface point without any
//!   directional bias, then offsets by `thickness * offset_multiplier`.
//!
//! A projected vertex is then checked against the whole surface again: near
//! a concave crease the offset along one face can sink it behind a
//! neighbouring face, so it is pushed out until it clears every face it
//! touches by the offset. Queries run against a bounding volume hierarchy
//! built once per body.
//!
//! Vertices that cannot be projected stay where they are and are reported
//! in [`FitReport::unprojected`].
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with no host-application dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_fit::{FitParams, fit_to_surface};
//! use mesh_types::open_cylinder;
//!
//! let body = open_cylinder(1.0, 2.0, 32, 8);
//! let mut sleeve = open_cylinder(1.2, 1.0, 32, 4);
//! sleeve.translate(mesh_types::Vector3::new(0.0, 0.0, 0.5));
//!
//! let report = fit_to_surface(&mut sleeve, &body, &FitParams::loose(0.01)).unwrap();
//! assert!(report.unprojected.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bvh;
mod error;
mod fit;
mod query;

pub use error::{FitError, FitResult};
pub use fit::{FitParams, FitPolicy, FitReport, fit_to_surface};
pub use query::{BodySurface, SurfaceHit, closest_point_on_triangle, ray_triangle_intersect};
