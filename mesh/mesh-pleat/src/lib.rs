//! Pleat synthesis and pleat quality evaluation.
//!
//! Pleats are modeled as alternating radial displacements of vertices that
//! share a height band:
//!
//! 1. **Classify** vertices into [`PleatBand`]s by rounded height.
//! 2. **Order** each band by angle around the band centroid.
//! 3. **Partition** every `floor(n / pleat_count)`-th vertex into inner
//!    (even step) and outer (odd step) folds.
//! 4. **Displace** inner folds toward the centroid by `depth`, outer folds
//!    away from it by `depth * outer_ratio`.
//!
//! [`evaluate_pleats`] scores the result out of 100 from angular
//! regularity, depth consistency and general mesh quality.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with no host-application dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_pleat::{PleatParams, evaluate_pleats, synthesize_pleats};
//! use mesh_types::open_cylinder;
//!
//! // Five rows of 24 vertices, one row per 0.1 height band.
//! let mut skirt = open_cylinder(0.5, 0.4, 24, 4);
//!
//! let summary = synthesize_pleats(&mut skirt, &PleatParams::new(12, 0.05)).unwrap();
//! assert_eq!(summary.bands_pleated, 5);
//!
//! let report = evaluate_pleats(&skirt, 12).unwrap();
//! assert!(report.total_score <= 100);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod band;
mod error;
mod evaluate;
mod issues;
mod synth;

pub use band::{PleatBand, band_key, classify_bands};
pub use error::{PleatError, PleatResult};
pub use evaluate::{EvaluationParams, QualityReport, evaluate_pleats, evaluate_pleats_with_params};
pub use issues::QualityIssue;
pub use synth::{PleatParams, PleatPartition, PleatSummary, partition_band, synthesize_pleats};
