//! Which vertex groups each garment is cut from.

use garment_rig::{RegionMatcher, RegionTag};
use mesh_region::{HeightFallback, RegionSelector};
use mesh_types::VertexGroup;
use tracing::{debug, info};

use crate::error::{GarmentError, GarmentResult};
use crate::kind::GarmentKind;
use crate::settings::FitSettings;

/// Waist group names for pants, most specific first.
pub const PANTS_PATTERNS: &[&str] = &[
    "hip",
    "hips",
    "pelvis",
    "waist",
    "腰",
    "hip_main",
    "pelvis_center",
];

/// Candidate groups, threshold and fallback for one garment on one body.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPlan {
    /// Garment the plan is for.
    pub kind: GarmentKind,
    /// Candidate group indices, in match order without duplicates.
    pub groups: Vec<u32>,
    /// Group names, parallel to `groups`.
    pub group_names: Vec<String>,
    /// Weight a vertex must exceed.
    pub threshold: f64,
    /// Height heuristic when `groups` is empty.
    pub fallback: Option<HeightFallback>,
}

impl SelectionPlan {
    /// Resolve the plan for `kind` against a body's vertex groups.
    ///
    /// # Errors
    ///
    /// [`GarmentError::NoRegionGroups`] for a skirt on a body without hip
    /// groups.
    pub fn resolve(
        kind: GarmentKind,
        groups: &[VertexGroup],
        settings: &FitSettings,
        matcher: &RegionMatcher,
    ) -> GarmentResult<Self> {
        let mut picked: Vec<&VertexGroup> = Vec::new();
        let by_tag = move |tag: RegionTag| matcher.find_groups_by_tag(groups, tag);

        match kind {
            GarmentKind::TShirt => {
                picked.extend(by_tag(RegionTag::Chest));
                picked.extend(by_tag(RegionTag::Arm));
            }
            GarmentKind::Pants => {
                picked.extend(matcher.find_group_by_patterns(groups, PANTS_PATTERNS));
                picked.extend(by_tag(RegionTag::Hip));
            }
            GarmentKind::Bra => picked.extend(by_tag(RegionTag::Chest)),
            GarmentKind::Socks => {
                picked.extend(by_tag(RegionTag::Foot));
                picked.extend(by_tag(RegionTag::Leg));
            }
            GarmentKind::Gloves => {
                let hands = matcher.find_hand_groups(groups);
                picked.extend(hands.left);
                picked.extend(hands.right);
                picked.extend(by_tag(RegionTag::Hand));
                if settings.glove_fingers {
                    info!("Gloves with fingers");
                } else {
                    info!("Gloves in mitten mode");
                }
            }
            GarmentKind::Skirt => {
                let hips = by_tag(RegionTag::Hip);
                if hips.is_empty() {
                    return Err(GarmentError::NoRegionGroups { garment: kind });
                }
                picked.extend(hips);
                picked.extend(by_tag(RegionTag::Leg));
            }
        }

        let mut plan = Self {
            kind,
            groups: Vec::with_capacity(picked.len()),
            group_names: Vec::with_capacity(picked.len()),
            threshold: settings.threshold(kind),
            fallback: kind.height_fallback(),
        };
        for group in picked {
            if !plan.groups.contains(&group.index) {
                plan.groups.push(group.index);
                plan.group_names.push(group.name.clone());
            }
        }

        debug!(garment = %kind, groups = ?plan.group_names, "Candidate groups");
        info!(
            garment = %kind,
            groups = plan.groups.len(),
            threshold = plan.threshold,
            "Selection plan resolved"
        );
        Ok(plan)
    }

    /// Selector to run: weights over the candidates, else the fallback.
    ///
    /// # Errors
    ///
    /// [`GarmentError::NoRegionGroups`] when there are no candidates and no
    /// fallback.
    pub fn selector(&self) -> GarmentResult<RegionSelector> {
        if !self.groups.is_empty() {
            return Ok(RegionSelector::weights(self.groups.iter().copied(), self.threshold));
        }
        self.fallback
            .map(RegionSelector::height)
            .ok_or(GarmentError::NoRegionGroups { garment: self.kind })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mesh_region::SelectionMethod;

    fn groups(names: &[&str]) -> Vec<VertexGroup> {
        names
            .iter()
            .zip(0u32..)
            .map(|(name, i)| VertexGroup::new(*name, i))
            .collect()
    }

    fn resolve(kind: GarmentKind, names: &[&str]) -> GarmentResult<SelectionPlan> {
        SelectionPlan::resolve(
            kind,
            &groups(names),
            &FitSettings::default(),
            &RegionMatcher::new(),
        )
    }

    #[test]
    fn test_pants_pattern_first() {
        let plan = resolve(GarmentKind::Pants, &["hip_extra", "Spine", "Hip"]).unwrap();
        assert_eq!(plan.group_names, ["Hip", "hip_extra"]);
        assert_eq!(plan.groups, [2, 0]);
    }

    #[test]
    fn test_tshirt_chest_and_arms() {
        let plan = resolve(
            GarmentKind::TShirt,
            &["Hips", "Chest", "UpperArm.L", "Forearm.R"],
        )
        .unwrap();
        assert_eq!(plan.group_names, ["Chest", "UpperArm.L", "Forearm.R"]);
    }

    #[test]
    fn test_gloves_hands_first() {
        let plan = resolve(
            GarmentKind::Gloves,
            &["Finger1.L", "mixamorig:RightHand", "mixamorig:LeftHand"],
        )
        .unwrap();
        assert_eq!(
            plan.group_names,
            ["mixamorig:LeftHand", "mixamorig:RightHand", "Finger1.L"]
        );
    }

    #[test]
    fn test_skirt_requires_hips() {
        let err = resolve(GarmentKind::Skirt, &["Thigh.L", "Thigh.R"]).unwrap_err();
        assert!(matches!(err, GarmentError::NoRegionGroups { garment: GarmentKind::Skirt }));

        let plan = resolve(GarmentKind::Skirt, &["Thigh.L", "Hips"]).unwrap();
        assert_eq!(plan.group_names, ["Hips", "Thigh.L"]);
    }

    #[test]
    fn test_fallback_selector() {
        let plan = resolve(GarmentKind::Bra, &["Head"]).unwrap();
        assert!(plan.groups.is_empty());
        assert_eq!(plan.selector().unwrap().method(), SelectionMethod::HeightFallback);

        let socks = resolve(GarmentKind::Socks, &[]).unwrap();
        assert!(matches!(
            socks.selector(),
            Err(GarmentError::NoRegionGroups { garment: GarmentKind::Socks })
        ));
    }

    #[test]
    fn test_weight_selector() {
        let plan = resolve(GarmentKind::Socks, &["LeftFoot", "LeftLeg"]).unwrap();
        match plan.selector().unwrap() {
            RegionSelector::Weights { groups, threshold } => {
                assert_eq!(groups, [0, 1]);
                assert!((threshold - 0.05).abs() < 1e-12);
            }
            RegionSelector::Height(_) => panic!("expected weight selector"),
        }
    }
}
