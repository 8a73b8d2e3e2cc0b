//! Generator sessions and batch generation.

use std::fmt;

use garment_rig::{GroupDiagnosis, RegionMatcher};
use hashbrown::HashMap;
use mesh_pleat::QualityReport;
use mesh_types::{IndexedMesh, RiggedMesh};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::GarmentResult;
use crate::garment::GarmentMesh;
use crate::kind::GarmentKind;
use crate::pipeline::{evaluate_pleats_geometry, generate_with_matcher, skirt_with_matcher};
use crate::settings::FitSettings;

/// Counts from a finished [`GarmentGenerator`] session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Garments returned to the caller.
    pub generated: usize,
    /// Calls that failed.
    pub failed: usize,
    /// Garments returned, per kind.
    pub by_kind: HashMap<GarmentKind, usize>,
}

impl SessionSummary {
    /// Total generation calls.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.generated + self.failed
    }

    fn record(&mut self, result: &GarmentResult<GarmentMesh>) {
        match result {
            Ok(garment) => {
                self.generated += 1;
                *self.by_kind.entry(garment.kind).or_insert(0) += 1;
            }
            Err(err) => {
                self.failed += 1;
                warn!(error = %err, kind = ?err.kind(), "Garment generation failed");
            }
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} generated, {} failed", self.generated, self.failed)?;
        for kind in GarmentKind::ALL {
            if let Some(count) = self.by_kind.get(&kind) {
                write!(f, ", {kind}: {count}")?;
            }
        }
        Ok(())
    }
}

/// One base mesh and the garment to cut from it.
#[derive(Debug, Clone)]
pub struct GarmentJob {
    /// Body to generate from. Owned by the job.
    pub base: RiggedMesh,
    /// Garment to generate.
    pub kind: GarmentKind,
}

impl GarmentJob {
    /// Create a job.
    #[must_use]
    pub const fn new(base: RiggedMesh, kind: GarmentKind) -> Self {
        Self { base, kind }
    }
}

/// A configured generation session.
///
/// Settings are validated once at [`init`](Self::init) and shared by every
/// call. [`teardown`](Self::teardown) ends the session and reports what it
/// did.
///
/// # Example
///
/// ```
/// use garment_core::{FitSettings, GarmentGenerator, GarmentKind};
/// use mesh_types::{RiggedMesh, unit_cube};
///
/// let mut generator = GarmentGenerator::init(FitSettings::default()).unwrap();
/// let body = RiggedMesh::new("Body", unit_cube());
///
/// // No groups and no height fallback for socks.
/// assert!(generator.generate(&body, GarmentKind::Socks).is_err());
///
/// let summary = generator.teardown();
/// assert_eq!(summary.failed, 1);
/// ```
#[derive(Debug)]
pub struct GarmentGenerator {
    settings: FitSettings,
    matcher: RegionMatcher,
    summary: SessionSummary,
}

impl GarmentGenerator {
    /// Start a session.
    ///
    /// # Errors
    ///
    /// [`crate::GarmentError::InvalidSetting`] if the settings are out of range.
    pub fn init(settings: FitSettings) -> GarmentResult<Self> {
        settings.validate()?;
        info!(
            thickness = settings.thickness,
            tight_fit = settings.tight_fit,
            quality_mode = settings.quality_mode,
            "Garment generator ready"
        );
        Ok(Self {
            settings,
            matcher: RegionMatcher::new(),
            summary: SessionSummary::default(),
        })
    }

    /// Use a matcher with project-specific name affixes.
    #[must_use]
    pub fn with_matcher(mut self, matcher: RegionMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Session settings.
    #[must_use]
    pub const fn settings(&self) -> &FitSettings {
        &self.settings
    }

    /// Counts so far.
    #[must_use]
    pub const fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Generate one garment.
    ///
    /// # Errors
    ///
    /// See [`crate::generate_region_selected_mesh`].
    pub fn generate(&mut self, base: &RiggedMesh, kind: GarmentKind) -> GarmentResult<GarmentMesh> {
        let result = generate_with_matcher(base, kind, &self.settings, &self.matcher);
        self.summary.record(&result);
        result
    }

    /// Generate a pleated skirt.
    ///
    /// # Errors
    ///
    /// See [`crate::generate_pleated_skirt`].
    pub fn generate_skirt(&mut self, base: &RiggedMesh) -> GarmentResult<GarmentMesh> {
        let result = skirt_with_matcher(base, &self.settings, &self.matcher);
        self.summary.record(&result);
        result
    }

    /// Score pleats against the session's pleat count.
    ///
    /// # Errors
    ///
    /// See [`crate::evaluate_pleats_geometry`].
    pub fn evaluate(&self, mesh: &IndexedMesh) -> GarmentResult<QualityReport> {
        evaluate_pleats_geometry(mesh, self.settings.pleat_count)
    }

    /// Explain how a body's vertex groups map onto regions.
    #[must_use]
    pub fn diagnose(&self, base: &RiggedMesh) -> GroupDiagnosis {
        self.matcher.diagnose(&base.groups)
    }

    /// Generate many garments in parallel, one job per worker.
    ///
    /// Results come back in job order.
    pub fn generate_batch(&mut self, jobs: Vec<GarmentJob>) -> Vec<GarmentResult<GarmentMesh>> {
        let results = run_batch(jobs, &self.settings, &self.matcher);
        for result in &results {
            self.summary.record(result);
        }
        results
    }

    /// End the session.
    #[must_use]
    pub fn teardown(self) -> SessionSummary {
        info!(summary = %self.summary, "Garment generator closed");
        self.summary
    }
}

/// Generate garments for independent base meshes in parallel.
///
/// Each job owns its base mesh and each result owns its garment, so no
/// mesh is touched by more than one worker. Results come back in job
/// order.
pub fn generate_batch(jobs: Vec<GarmentJob>, settings: &FitSettings) -> Vec<GarmentResult<GarmentMesh>> {
    run_batch(jobs, settings, &RegionMatcher::new())
}

fn run_batch(
    jobs: Vec<GarmentJob>,
    settings: &FitSettings,
    matcher: &RegionMatcher,
) -> Vec<GarmentResult<GarmentMesh>> {
    info!(jobs = jobs.len(), "Batch generation");
    jobs.into_par_iter()
        .map(|job| generate_with_matcher(&job.base, job.kind, settings, matcher))
        .collect()
}
