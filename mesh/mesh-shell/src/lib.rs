//! Thickness extrusion and smoothing for garment shells.
//!
//! A garment region cut from a body is a zero-thickness surface lying
//! exactly on the skin. This crate gives it thickness by moving every
//! vertex along its freshly computed unit normal, and optionally relaxes
//! it with Laplacian smoothing.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with no host-application dependencies.
//!
//! # Quick Start with `ShellBuilder`
//!
//! ```
//! use mesh_shell::{ShellBuilder, SmoothParams};
//! use mesh_types::open_cylinder;
//!
//! let mut sleeve = open_cylinder(1.0, 1.0, 16, 4);
//!
//! let report = ShellBuilder::new(&mut sleeve)
//!     .thickness(0.01)
//!     .multiplier(1.5)
//!     .smoothing(SmoothParams::new(0.2, 2))
//!     .apply()
//!     .unwrap();
//!
//! assert_eq!(report.extrusion.displaced, 16 * 5);
//! assert!((report.extrusion.applied_thickness - 0.015).abs() < 1e-12);
//! ```
//!
//! # Low-Level API
//!
//! ```
//! use mesh_shell::{ShellParams, extrude};
//! use mesh_types::open_cylinder;
//!
//! let mut sleeve = open_cylinder(1.0, 1.0, 16, 4);
//! let result = extrude(&mut sleeve, &ShellParams::new(0.01)).unwrap();
//! assert!(result.skipped.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod builder;
mod error;
mod extrude;
mod smooth;

pub use builder::{ShellBuilder, ShellReport};
pub use error::{ShellError, ShellResult};
pub use extrude::{ExtrusionResult, ShellParams, extrude};
pub use smooth::{SmoothParams, SmoothResult, smooth_laplacian};
