//! Generation settings.

use serde::{Deserialize, Serialize};

use crate::error::{GarmentError, GarmentResult};
use crate::kind::GarmentKind;

/// Weight thresholds per garment kind.
///
/// A vertex joins the garment when its largest weight across the
/// garment's groups exceeds the threshold. Socks and skirts derive their
/// threshold from the garment length unless overridden here.
///
/// # Example
///
/// ```
/// use garment_core::{FitSettings, GarmentKind, GarmentThresholds};
///
/// let settings = FitSettings::default();
/// let t = settings.thresholds.for_kind(GarmentKind::Pants, &settings);
/// assert!((t - 0.3).abs() < 1e-12);
///
/// let strict = GarmentThresholds::uniform(0.9);
/// assert!((strict.for_kind(GarmentKind::Skirt, &settings) - 0.9).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarmentThresholds {
    /// Pants.
    pub pants: f64,
    /// T-shirts.
    pub tshirt: f64,
    /// Bras.
    pub bra: f64,
    /// Gloves.
    pub gloves: f64,
    /// Socks; `None` derives `0.1 * sock_length * sock_multiplier`.
    pub socks: Option<f64>,
    /// Skirts; `None` derives `0.1 * skirt_length`.
    pub skirt: Option<f64>,
}

impl Default for GarmentThresholds {
    fn default() -> Self {
        Self {
            pants: 0.3,
            tshirt: 0.1,
            bra: 0.1,
            gloves: 0.1,
            socks: None,
            skirt: None,
        }
    }
}

impl GarmentThresholds {
    /// The same threshold for every kind.
    #[must_use]
    pub const fn uniform(threshold: f64) -> Self {
        Self {
            pants: threshold,
            tshirt: threshold,
            bra: threshold,
            gloves: threshold,
            socks: Some(threshold),
            skirt: Some(threshold),
        }
    }

    /// Threshold for `kind` under `settings`.
    #[must_use]
    pub fn for_kind(&self, kind: GarmentKind, settings: &FitSettings) -> f64 {
        match kind {
            GarmentKind::Pants => self.pants,
            GarmentKind::TShirt => self.tshirt,
            GarmentKind::Bra => self.bra,
            GarmentKind::Gloves => self.gloves,
            GarmentKind::Socks => self
                .socks
                .unwrap_or(0.1 * settings.sock_length * settings.sock_multiplier),
            GarmentKind::Skirt => self.skirt.unwrap_or(0.1 * settings.skirt_length),
        }
    }

    fn validate(&self) -> GarmentResult<()> {
        let fixed = [
            ("thresholds.pants", Some(self.pants)),
            ("thresholds.tshirt", Some(self.tshirt)),
            ("thresholds.bra", Some(self.bra)),
            ("thresholds.gloves", Some(self.gloves)),
            ("thresholds.socks", self.socks),
            ("thresholds.skirt", self.skirt),
        ];
        for (field, value) in fixed {
            if let Some(value) = value {
                // Above 1.0 is legal and selects nothing.
                check(field, value, 0.0, f64::INFINITY)?;
            }
        }
        Ok(())
    }
}

/// Settings for one generation request.
///
/// Missing fields in a JSON document take their defaults, so a partial
/// document such as `{"thickness": 0.02}` is a complete configuration.
///
/// # Example
///
/// ```
/// use garment_core::FitSettings;
///
/// let settings = FitSettings::from_json_str(r#"{"pleat_count": 16, "tight_fit": true}"#).unwrap();
/// assert_eq!(settings.pleat_count, 16);
/// assert!(settings.tight_fit);
/// assert!((settings.thickness - 0.01).abs() < 1e-12);
///
/// assert!(FitSettings::from_json_str(r#"{"pleat_count": 40}"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSettings {
    /// Shell thickness in length units.
    pub thickness: f64,

    /// Scale on `thickness` for region garments.
    pub thickness_multiplier: f64,

    /// Project along the vertex normal and hug the body instead of keeping
    /// a thickness-proportional gap.
    pub tight_fit: bool,

    /// Gap kept by a tight fit.
    pub tight_offset: f64,

    /// Gap kept by a loose fit, as a fraction of the thickness.
    pub offset_multiplier: f64,

    /// Fit region garments to the body surface after extrusion.
    pub fit_to_body: bool,

    /// Smooth region garments after extrusion.
    pub quality_mode: bool,

    /// Keep fingers on gloves; `false` makes mittens.
    pub glove_fingers: bool,

    /// Number of pleats around a skirt.
    pub pleat_count: usize,

    /// Inner fold depth of a pleat.
    pub pleat_depth: f64,

    /// Skirt length, 0 above the knee to 1 at the ankle.
    pub skirt_length: f64,

    /// Sock length, 0 at the ankle to 1 at the knee.
    pub sock_length: f64,

    /// Scale on the sock threshold.
    pub sock_multiplier: f64,

    /// Height band size used to group skirt vertices into rings.
    pub band_resolution: f64,

    /// Vertices closer than this are welded after extraction.
    pub merge_distance: f64,

    /// Weight thresholds per garment kind.
    pub thresholds: GarmentThresholds,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            thickness: 0.01,
            thickness_multiplier: 1.0,
            tight_fit: false,
            tight_offset: 0.001,
            offset_multiplier: 0.5,
            fit_to_body: true,
            quality_mode: true,
            glove_fingers: false,
            pleat_count: 12,
            pleat_depth: 0.05,
            skirt_length: 0.6,
            sock_length: 0.5,
            sock_multiplier: 1.0,
            band_resolution: 0.1,
            merge_distance: 1e-4,
            thresholds: GarmentThresholds::default(),
        }
    }
}

impl FitSettings {
    /// Parse a JSON document and validate it.
    ///
    /// # Errors
    ///
    /// [`GarmentError::ConfigParse`] for malformed JSON and
    /// [`GarmentError::InvalidSetting`] for out-of-range values.
    pub fn from_json_str(json: &str) -> GarmentResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// [`GarmentError::ConfigParse`] if serialization fails.
    pub fn to_json_string(&self) -> GarmentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the shell thickness.
    #[must_use]
    pub const fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    /// Set the thickness multiplier.
    #[must_use]
    pub const fn with_thickness_multiplier(mut self, multiplier: f64) -> Self {
        self.thickness_multiplier = multiplier;
        self
    }

    /// Enable or disable tight fitting.
    #[must_use]
    pub const fn with_tight_fit(mut self, tight: bool) -> Self {
        self.tight_fit = tight;
        self
    }

    /// Enable or disable fitting to the body.
    #[must_use]
    pub const fn with_fit_to_body(mut self, fit: bool) -> Self {
        self.fit_to_body = fit;
        self
    }

    /// Enable or disable quality-mode smoothing.
    #[must_use]
    pub const fn with_quality_mode(mut self, quality: bool) -> Self {
        self.quality_mode = quality;
        self
    }

    /// Enable or disable glove fingers.
    #[must_use]
    pub const fn with_glove_fingers(mut self, fingers: bool) -> Self {
        self.glove_fingers = fingers;
        self
    }

    /// Set pleat count and depth.
    #[must_use]
    pub const fn with_pleats(mut self, count: usize, depth: f64) -> Self {
        self.pleat_count = count;
        self.pleat_depth = depth;
        self
    }

    /// Set the skirt length.
    #[must_use]
    pub const fn with_skirt_length(mut self, length: f64) -> Self {
        self.skirt_length = length;
        self
    }

    /// Set the sock length.
    #[must_use]
    pub const fn with_sock_length(mut self, length: f64) -> Self {
        self.sock_length = length;
        self
    }

    /// Set the band resolution for pleats.
    #[must_use]
    pub const fn with_band_resolution(mut self, resolution: f64) -> Self {
        self.band_resolution = resolution;
        self
    }

    /// Set the weld distance.
    #[must_use]
    pub const fn with_merge_distance(mut self, distance: f64) -> Self {
        self.merge_distance = distance;
        self
    }

    /// Replace the per-kind thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: GarmentThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Shell thickness with the multiplier applied.
    #[must_use]
    pub fn effective_thickness(&self) -> f64 {
        self.thickness * self.thickness_multiplier
    }

    /// Weight threshold for `kind`.
    #[must_use]
    pub fn threshold(&self, kind: GarmentKind) -> f64 {
        self.thresholds.for_kind(kind, self)
    }

    /// Check every value against its declared range.
    ///
    /// # Errors
    ///
    /// [`GarmentError::InvalidSetting`] naming the first field out of range.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> GarmentResult<()> {
        check("thickness", self.thickness, 0.001, 0.1)?;
        check("thickness_multiplier", self.thickness_multiplier, 0.1, 3.0)?;
        check("tight_offset", self.tight_offset, 0.0, 0.1)?;
        check("offset_multiplier", self.offset_multiplier, 0.0, 2.0)?;
        check("pleat_count", self.pleat_count as f64, 6.0, 24.0)?;
        check("pleat_depth", self.pleat_depth, 0.01, 0.2)?;
        check("skirt_length", self.skirt_length, 0.0, 1.0)?;
        check("sock_length", self.sock_length, 0.0, 1.0)?;
        check("sock_multiplier", self.sock_multiplier, 0.1, 3.0)?;
        check("band_resolution", self.band_resolution, f64::MIN_POSITIVE, 1.0)?;
        check("merge_distance", self.merge_distance, 0.0, 0.01)?;
        self.thresholds.validate()
    }
}

fn check(field: &'static str, value: f64, min: f64, max: f64) -> GarmentResult<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GarmentError::InvalidSetting {
            field,
            value,
            min,
            max,
        })
    }
}
