//! Generation entry points.
//!
//! Region garments run: validate, plan, select, extract, weld, extrude,
//! smooth, fit. Skirts replace smoothing and fitting with pleat synthesis
//! and a quality evaluation.
//!
//! The base mesh is never modified. A garment is built as an owned copy
//! and only returned once every step has run, so a failed call leaves
//! nothing behind.

use garment_rig::RegionMatcher;
use mesh_fit::{FitParams, fit_to_surface};
use mesh_pleat::{PleatParams, QualityReport, evaluate_pleats, synthesize_pleats};
use mesh_region::MeshRegion;
use mesh_repair::{CleanupParams, cleanup_mesh};
use mesh_shell::{ShellBuilder, ShellReport};
use mesh_types::{IndexedMesh, RiggedMesh};
use tracing::{info, warn};

use crate::error::{GarmentError, GarmentResult};
use crate::garment::{GarmentMesh, GeometryWarning};
use crate::kind::GarmentKind;
use crate::plan::SelectionPlan;
use crate::settings::FitSettings;

/// Scores below this are logged as poor quality.
pub const QUALITY_WARNING_THRESHOLD: u32 = 70;

/// Generate a garment from the body region that `kind` covers.
///
/// Skirts are routed to [`generate_pleated_skirt`].
///
/// # Errors
///
/// Input errors for invalid settings or a malformed base mesh, selection
/// errors when the body offers nothing to cut from. Degraded steps are
/// reported as [`GarmentMesh::warnings`] instead.
///
/// # Example
///
/// ```
/// use garment_core::{FitSettings, GarmentKind, generate_region_selected_mesh};
/// use mesh_types::{RiggedMesh, open_cylinder};
///
/// let mut body = RiggedMesh::new("Body", open_cylinder(0.3, 1.0, 16, 4));
/// let hips = body.add_group("Hips");
/// for v in 32..80 {
///     hips.set_weight(v, 1.0);
/// }
///
/// let pants = generate_region_selected_mesh(&body, GarmentKind::Pants, &FitSettings::default()).unwrap();
/// assert_eq!(pants.identifier(), "Body_pants");
/// assert_eq!(pants.mesh().vertices.len(), 48);
/// ```
pub fn generate_region_selected_mesh(
    base: &RiggedMesh,
    kind: GarmentKind,
    settings: &FitSettings,
) -> GarmentResult<GarmentMesh> {
    generate_with_matcher(base, kind, settings, &RegionMatcher::new())
}

/// Generate a pleated skirt from the hip and leg region.
///
/// # Errors
///
/// As [`generate_region_selected_mesh`]; a body without hip groups is a
/// [`GarmentError::NoRegionGroups`] failure.
pub fn generate_pleated_skirt(base: &RiggedMesh, settings: &FitSettings) -> GarmentResult<GarmentMesh> {
    skirt_with_matcher(base, settings, &RegionMatcher::new())
}

/// Score the pleats of a finished mesh.
///
/// Always produces a report for a valid count; a score below
/// [`QUALITY_WARNING_THRESHOLD`] is logged, never returned as an error.
///
/// # Errors
///
/// [`GarmentError::Pleat`] if `expected_pleat_count` is zero.
pub fn evaluate_pleats_geometry(
    mesh: &IndexedMesh,
    expected_pleat_count: usize,
) -> GarmentResult<QualityReport> {
    let report = evaluate_pleats(mesh, expected_pleat_count)?;
    if report.total_score < QUALITY_WARNING_THRESHOLD {
        warn!(
            score = report.total_score,
            issues = report.issues.len(),
            "Pleat quality below {QUALITY_WARNING_THRESHOLD}"
        );
    } else {
        info!(score = report.total_score, "Pleat quality");
    }
    Ok(report)
}

pub(crate) fn generate_with_matcher(
    base: &RiggedMesh,
    kind: GarmentKind,
    settings: &FitSettings,
    matcher: &RegionMatcher,
) -> GarmentResult<GarmentMesh> {
    if kind.is_pleated() {
        return skirt_with_matcher(base, settings, matcher);
    }

    let mut garment = cut(base, kind, settings, matcher)?;

    let smoothing = if settings.quality_mode {
        kind.smoothing()
    } else {
        None
    };
    let shell = ShellBuilder::new(&mut garment.rigged.mesh)
        .thickness(settings.thickness)
        .multiplier(settings.thickness_multiplier)
        .maybe_smoothing(smoothing)
        .apply()?;
    record_shell(&mut garment, shell);

    if settings.fit_to_body {
        fit(&mut garment, base, settings);
    }

    garment.rigged.mesh.recompute_normals();
    info!(
        garment = %garment.identifier(),
        vertices = garment.rigged.mesh.vertices.len(),
        faces = garment.rigged.mesh.faces.len(),
        warnings = garment.warnings.len(),
        "Garment generated"
    );
    Ok(garment)
}

pub(crate) fn skirt_with_matcher(
    base: &RiggedMesh,
    settings: &FitSettings,
    matcher: &RegionMatcher,
) -> GarmentResult<GarmentMesh> {
    let mut garment = cut(base, GarmentKind::Skirt, settings, matcher)?;

    let params = PleatParams::new(settings.pleat_count, settings.pleat_depth)
        .with_band_resolution(settings.band_resolution);
    let pleats = synthesize_pleats(&mut garment.rigged.mesh, &params)?;
    if pleats.bands_pleated == 0 {
        garment.warnings.push(GeometryWarning::NoPleats {
            bands: pleats.bands_total,
        });
    }
    if !pleats.degenerate.is_empty() {
        warn!(count = pleats.degenerate.len(), "Vertices at band centroid left unpleated");
        garment.warnings.push(GeometryWarning::DegeneratePleatVertices {
            count: pleats.degenerate.len(),
        });
    }
    garment.rigged.mesh.recompute_normals();
    garment.pleats = Some(pleats);

    let shell = ShellBuilder::new(&mut garment.rigged.mesh)
        .thickness(settings.thickness)
        .apply()?;
    record_shell(&mut garment, shell);

    let quality = evaluate_pleats_geometry(&garment.rigged.mesh, settings.pleat_count)?;
    garment.quality = Some(quality);

    info!(
        garment = %garment.identifier(),
        vertices = garment.rigged.mesh.vertices.len(),
        faces = garment.rigged.mesh.faces.len(),
        "Skirt generated"
    );
    Ok(garment)
}

// =============================================================================
// Pipeline steps
// =============================================================================

/// Reject base meshes the pipeline cannot work on.
pub(crate) fn validate_base(base: &RiggedMesh) -> GarmentResult<()> {
    let mesh = &base.mesh;
    if mesh.vertices.is_empty() {
        return Err(GarmentError::invalid_mesh(format!("'{}' has no vertices", base.name)));
    }
    if mesh.faces.is_empty() {
        return Err(GarmentError::invalid_mesh(format!("'{}' has no faces", base.name)));
    }
    if let Some((face, vertex)) = mesh.first_invalid_face() {
        return Err(GarmentError::invalid_mesh(format!(
            "face {face} references vertex {vertex} but '{}' has {} vertices",
            base.name,
            mesh.vertices.len()
        )));
    }
    if let Some(i) = mesh.vertices.iter().position(|v| !v.is_finite()) {
        return Err(GarmentError::invalid_mesh(format!(
            "vertex {i} of '{}' has a non-finite position",
            base.name
        )));
    }
    Ok(())
}

/// Validate, select and extract an owned, welded copy of the region.
fn cut(
    base: &RiggedMesh,
    kind: GarmentKind,
    settings: &FitSettings,
    matcher: &RegionMatcher,
) -> GarmentResult<GarmentMesh> {
    settings.validate()?;
    validate_base(base)?;

    let plan = SelectionPlan::resolve(kind, &base.groups, settings, matcher)?;
    let selector = plan.selector()?;
    let identifier = format!("{}_{kind}", base.name);
    let region = MeshRegion::from_selector(base, identifier.as_str(), &selector)?;
    if region.is_empty() {
        return Err(GarmentError::NoVerticesSelected { garment: kind });
    }

    let mut warnings = Vec::new();
    if region.method().is_fallback() {
        warnings.push(GeometryWarning::HeightFallback);
    }

    let mut rigged = base.extract(identifier, region.vertices());
    if rigged.mesh.faces.is_empty() {
        return Err(GarmentError::EmptyGarment { garment: kind });
    }

    let cleanup = cleanup_mesh(
        &mut rigged.mesh,
        &CleanupParams::default().with_merge_distance(settings.merge_distance),
    )?;
    rigged.remap_groups(&cleanup.remap);
    if rigged.mesh.faces.is_empty() {
        return Err(GarmentError::EmptyGarment { garment: kind });
    }
    rigged.mesh.recompute_normals();

    info!(
        garment = %kind,
        method = %region.method(),
        selected = region.vertex_count(),
        welded = cleanup.vertices_welded,
        vertices = rigged.mesh.vertices.len(),
        faces = rigged.mesh.faces.len(),
        "Region extracted"
    );

    Ok(GarmentMesh {
        rigged,
        kind,
        method: region.method(),
        selected_vertices: region.vertex_count(),
        warnings,
        shell: None,
        fit: None,
        pleats: None,
        quality: None,
    })
}

fn record_shell(garment: &mut GarmentMesh, shell: ShellReport) {
    info!(
        thickness = shell.extrusion.applied_thickness,
        displaced = shell.extrusion.displaced,
        smoothed = shell.smoothing.is_some(),
        "Shell applied"
    );
    if !shell.extrusion.skipped.is_empty() {
        garment.warnings.push(GeometryWarning::MissingNormals {
            count: shell.extrusion.skipped.len(),
        });
    }
    garment.shell = Some(shell);
}

fn fit_params(settings: &FitSettings) -> FitParams {
    if settings.tight_fit {
        FitParams::tight().with_tight_offset(settings.tight_offset)
    } else {
        FitParams::loose(settings.effective_thickness())
            .with_offset_multiplier(settings.offset_multiplier)
    }
}

/// Fit to the body. Failures leave the garment as extruded.
fn fit(garment: &mut GarmentMesh, base: &RiggedMesh, settings: &FitSettings) {
    match fit_to_surface(&mut garment.rigged.mesh, &base.mesh, &fit_params(settings)) {
        Ok(report) => {
            if !report.is_complete() {
                garment.warnings.push(GeometryWarning::Unprojected {
                    count: report.unprojected.len(),
                });
            }
            if !report.uncleared.is_empty() {
                garment.warnings.push(GeometryWarning::Uncleared {
                    count: report.uncleared.len(),
                });
            }
            garment.fit = Some(report);
        }
        Err(err) => {
            warn!(garment = %garment.identifier(), error = %err, "Body fitting skipped");
            garment
                .warnings
                .push(GeometryWarning::FitSkipped { reason: err.to_string() });
        }
    }
}
