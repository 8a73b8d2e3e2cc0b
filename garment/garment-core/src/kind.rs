//! Garment kinds and their fixed per-kind behavior.

use std::fmt;
use std::str::FromStr;

use mesh_region::HeightFallback;
use mesh_shell::SmoothParams;
use serde::{Deserialize, Serialize};

use crate::error::{GarmentError, GarmentResult};

/// A garment the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentKind {
    /// Chest and arms.
    TShirt,
    /// Hips.
    Pants,
    /// Chest.
    Bra,
    /// Feet and lower legs.
    Socks,
    /// Hands.
    Gloves,
    /// Hips and legs, with pleats.
    Skirt,
}

impl GarmentKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::TShirt,
        Self::Pants,
        Self::Bra,
        Self::Socks,
        Self::Gloves,
        Self::Skirt,
    ];

    /// Lower-case name, also used as the identifier suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TShirt => "tshirt",
            Self::Pants => "pants",
            Self::Bra => "bra",
            Self::Socks => "socks",
            Self::Gloves => "gloves",
            Self::Skirt => "skirt",
        }
    }

    /// Height heuristic used when the body has no matching groups.
    ///
    /// Socks, gloves and skirts have none: a height cut cannot find feet,
    /// hands or a waistline.
    #[must_use]
    pub const fn height_fallback(self) -> Option<HeightFallback> {
        match self {
            Self::TShirt => Some(HeightFallback::AboveMeanFactor { factor: 0.4 }),
            Self::Pants => Some(HeightFallback::AboveMeanFactor { factor: 0.5 }),
            Self::Bra => Some(HeightFallback::AboveMeanPlusStd { k: 0.3 }),
            Self::Socks | Self::Gloves | Self::Skirt => None,
        }
    }

    /// Smoothing pass applied in quality mode. Skirts keep their pleats.
    #[must_use]
    pub const fn smoothing(self) -> Option<SmoothParams> {
        match self {
            Self::TShirt | Self::Pants => Some(SmoothParams::new(0.2, 2)),
            Self::Bra => Some(SmoothParams::new(0.25, 2)),
            Self::Socks => Some(SmoothParams::new(0.18, 1)),
            Self::Gloves => Some(SmoothParams::new(0.15, 1)),
            Self::Skirt => None,
        }
    }

    /// Whether this kind goes through pleat synthesis.
    #[must_use]
    pub const fn is_pleated(self) -> bool {
        matches!(self, Self::Skirt)
    }
}

impl fmt::Display for GarmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GarmentKind {
    type Err = GarmentError;

    /// Accepts the lower-case name in any case, plus `t_shirt`/`t-shirt`.
    fn from_str(s: &str) -> GarmentResult<Self> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| GarmentError::UnknownGarmentKind(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("PANTS".parse::<GarmentKind>().unwrap(), GarmentKind::Pants);
        assert_eq!("T-Shirt".parse::<GarmentKind>().unwrap(), GarmentKind::TShirt);
        assert!(matches!(
            "cape".parse::<GarmentKind>(),
            Err(GarmentError::UnknownGarmentKind(_))
        ));
    }

    #[test]
    fn test_serde_names_match_display() {
        for kind in GarmentKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn test_fallbacks() {
        assert!(GarmentKind::Pants.height_fallback().is_some());
        assert!(GarmentKind::Socks.height_fallback().is_none());
        assert!(GarmentKind::Skirt.height_fallback().is_none());
    }

    #[test]
    fn test_smoothing() {
        assert!(GarmentKind::Skirt.smoothing().is_none());
        let bra = GarmentKind::Bra.smoothing().unwrap();
        assert!((bra.factor - 0.25).abs() < f64::EPSILON);
        assert_eq!(bra.iterations, 2);
        assert!(GarmentKind::Skirt.is_pleated());
    }
}
