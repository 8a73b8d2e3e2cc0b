//! Body-region tags and their surface-form patterns.

use std::fmt;
use std::str::FromStr;

use crate::error::{RigError, RigResult};

/// A body region that garments are cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionTag {
    /// Pelvis and waist.
    Hip,
    /// Upper torso and breasts.
    Chest,
    /// Shoulder to wrist.
    Arm,
    /// Thigh to ankle.
    Leg,
    /// Ankle, foot and toes.
    Foot,
    /// Hand and fingers.
    Hand,
}

impl RegionTag {
    /// Every tag, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Hip,
        Self::Chest,
        Self::Arm,
        Self::Leg,
        Self::Foot,
        Self::Hand,
    ];

    /// Lower-case tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hip => "hip",
            Self::Chest => "chest",
            Self::Arm => "arm",
            Self::Leg => "leg",
            Self::Foot => "foot",
            Self::Hand => "hand",
        }
    }

    /// Lower-case substrings that mark a group as belonging to this region.
    #[must_use]
    pub const fn patterns(self) -> &'static [&'static str] {
        match self {
            Self::Hip => &["hip", "hips", "pelvis", "waist", "腰"],
            Self::Chest => &["chest", "breast", "bust", "thorax", "upper_chest", "胸"],
            Self::Arm => &["arm", "shoulder", "upperarm", "lowerarm", "forearm", "腕", "肩"],
            Self::Leg => &["leg", "thigh", "shin", "calf", "upperleg", "lowerleg", "脚"],
            Self::Foot => &["foot", "feet", "ankle", "toe", "足"],
            Self::Hand => &[
                "hand", "finger", "thumb", "index", "middle", "ring", "little", "手", "指",
            ],
        }
    }

    /// Whether `name` contains any of this tag's patterns, ignoring case.
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.patterns().iter().any(|p| lower.contains(p))
    }
}

impl fmt::Display for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionTag {
    type Err = RigError;

    fn from_str(s: &str) -> RigResult<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == lower)
            .ok_or_else(|| RigError::UnknownRegionTag(s.to_string()))
    }
}

/// Surface forms of a left hand group, in priority order.
pub const LEFT_HAND_PATTERNS: &[&str] = &[
    "Hand_L",
    "hand_l",
    "hand.l",
    "lefthand",
    "left_hand",
    "l_hand",
    "hand_left",
    "LeftHand",
    "Left_Hand",
    "HandL",
    "def_hand_l",
    "ctrl_hand_l",
];

/// Surface forms of a right hand group, in priority order.
pub const RIGHT_HAND_PATTERNS: &[&str] = &[
    "Hand_R",
    "hand_r",
    "hand.r",
    "righthand",
    "right_hand",
    "r_hand",
    "hand_right",
    "RightHand",
    "Right_Hand",
    "HandR",
    "def_hand_r",
    "ctrl_hand_r",
];

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for tag in RegionTag::ALL {
            assert_eq!(tag.as_str().parse::<RegionTag>().unwrap(), tag);
            assert_eq!(tag.to_string(), tag.as_str());
        }
        assert_eq!(" Chest ".parse::<RegionTag>().unwrap(), RegionTag::Chest);
    }

    #[test]
    fn test_unknown_tag() {
        let err = "tail".parse::<RegionTag>().unwrap_err();
        assert!(matches!(err, RigError::UnknownRegionTag(ref s) if s == "tail"));
    }

    #[test]
    fn test_matches() {
        assert!(RegionTag::Chest.matches("UpperChest"));
        assert!(RegionTag::Leg.matches("mixamorig:LeftUpLeg"));
        assert!(RegionTag::Hip.matches("腰"));
        assert!(!RegionTag::Chest.matches("Spine2"));
    }

    #[test]
    fn test_patterns_lowercase() {
        for tag in RegionTag::ALL {
            for p in tag.patterns() {
                assert_eq!(*p, p.to_lowercase());
            }
        }
    }

    #[test]
    fn test_hand_patterns_mirror() {
        assert_eq!(LEFT_HAND_PATTERNS.len(), RIGHT_HAND_PATTERNS.len());
    }
}
