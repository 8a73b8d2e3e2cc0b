//! Vertex-group lookup by region tag, ordered patterns, or hand side.

use std::fmt;

use hashbrown::HashSet;
use mesh_types::VertexGroup;
use tracing::{debug, info};

use crate::normalize::normalize_with;
use crate::tag::{LEFT_HAND_PATTERNS, RIGHT_HAND_PATTERNS, RegionTag};

/// Left and right hand groups. Either may be missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandGroups<'g> {
    /// Left hand group.
    pub left: Option<&'g VertexGroup>,
    /// Right hand group.
    pub right: Option<&'g VertexGroup>,
}

impl HandGroups<'_> {
    /// Whether both hands were found.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Whether neither hand was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// How a set of vertex groups maps onto body regions.
#[derive(Debug, Clone, Default)]
pub struct GroupDiagnosis {
    /// Matched group names per tag, in [`RegionTag::ALL`] order.
    pub by_tag: Vec<(RegionTag, Vec<String>)>,
    /// Groups that match no tag.
    pub unclassified: Vec<String>,
    /// Group picked as the left hand.
    pub left_hand: Option<String>,
    /// Group picked as the right hand.
    pub right_hand: Option<String>,
}

impl GroupDiagnosis {
    /// Group names matched for `tag`.
    #[must_use]
    pub fn groups_for(&self, tag: RegionTag) -> &[String] {
        self.by_tag
            .iter()
            .find(|(t, _)| *t == tag)
            .map_or(&[], |(_, names)| names.as_slice())
    }

    /// Tags with no matching group.
    #[must_use]
    pub fn missing_tags(&self) -> Vec<RegionTag> {
        RegionTag::ALL
            .into_iter()
            .filter(|tag| self.groups_for(*tag).is_empty())
            .collect()
    }
}

impl fmt::Display for GroupDiagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vertex group diagnosis")?;
        for (tag, names) in &self.by_tag {
            if names.is_empty() {
                writeln!(f, "  {tag:<6} -")?;
            } else {
                writeln!(f, "  {tag:<6} {}", names.join(", "))?;
            }
        }
        writeln!(
            f,
            "  hands  left={} right={}",
            self.left_hand.as_deref().unwrap_or("-"),
            self.right_hand.as_deref().unwrap_or("-")
        )?;
        if !self.unclassified.is_empty() {
            writeln!(f, "  unclassified: {}", self.unclassified.join(", "))?;
        }
        Ok(())
    }
}

/// Finds vertex groups for body regions.
///
/// Name comparisons go through [`normalize_with`] using the matcher's
/// optional project prefix and suffix.
#[derive(Debug, Clone, Default)]
pub struct RegionMatcher {
    custom_prefix: Option<String>,
    custom_suffix: Option<String>,
}

impl RegionMatcher {
    /// Matcher with no project-specific affixes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            custom_prefix: None,
            custom_suffix: None,
        }
    }

    /// Strip this prefix from names before comparing.
    #[must_use]
    pub fn with_custom_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.custom_prefix = Some(prefix.into());
        self
    }

    /// Strip this suffix from names before comparing.
    #[must_use]
    pub fn with_custom_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.custom_suffix = Some(suffix.into());
        self
    }

    /// Normalize a name with this matcher's affixes.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        normalize_with(
            raw,
            self.custom_prefix.as_deref(),
            self.custom_suffix.as_deref(),
        )
    }

    /// First group matching the patterns, tried in order.
    ///
    /// For each pattern, in order: exact case-insensitive name, then equal
    /// normalized names, then case-insensitive substring. The first hit
    /// wins; empty patterns are skipped.
    #[must_use]
    pub fn find_group_by_patterns<'g>(
        &self,
        groups: &'g [VertexGroup],
        patterns: &[&str],
    ) -> Option<&'g VertexGroup> {
        if groups.is_empty() {
            return None;
        }
        let lowered: Vec<String> = groups.iter().map(|g| g.name.to_lowercase()).collect();
        let normalized: Vec<String> = groups.iter().map(|g| self.normalize(&g.name)).collect();

        for pattern in patterns.iter().filter(|p| !p.is_empty()) {
            let pattern_lower = pattern.to_lowercase();
            if let Some(i) = lowered.iter().position(|name| *name == pattern_lower) {
                return Some(&groups[i]);
            }

            let pattern_norm = self.normalize(pattern);
            if !pattern_norm.is_empty() {
                if let Some(i) = normalized.iter().position(|name| *name == pattern_norm) {
                    return Some(&groups[i]);
                }
            }

            if let Some(i) = lowered.iter().position(|name| name.contains(&pattern_lower)) {
                return Some(&groups[i]);
            }
        }
        None
    }

    /// Every group whose name contains one of the tag's patterns.
    ///
    /// Ordered by the first pattern each group matches, then by group order,
    /// without duplicates. For [`RegionTag::Chest`] a "Chest" group comes
    /// before a "Thorax" group wherever they sit in `groups`.
    #[must_use]
    pub fn find_groups_by_tag<'g>(
        &self,
        groups: &'g [VertexGroup],
        tag: RegionTag,
    ) -> Vec<&'g VertexGroup> {
        let lowered: Vec<String> = groups.iter().map(|g| g.name.to_lowercase()).collect();
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for pattern in tag.patterns() {
            for (group, name) in groups.iter().zip(&lowered) {
                if name.contains(pattern) && seen.insert(group.index) {
                    found.push(group);
                }
            }
        }
        debug!(tag = %tag, matched = found.len(), "region tag lookup");
        found
    }

    /// Left and right hand groups.
    #[must_use]
    pub fn find_hand_groups<'g>(&self, groups: &'g [VertexGroup]) -> HandGroups<'g> {
        HandGroups {
            left: self.find_group_by_patterns(groups, LEFT_HAND_PATTERNS),
            right: self.find_group_by_patterns(groups, RIGHT_HAND_PATTERNS),
        }
    }

    /// Classify every group by region tag.
    #[must_use]
    pub fn diagnose(&self, groups: &[VertexGroup]) -> GroupDiagnosis {
        let by_tag: Vec<(RegionTag, Vec<String>)> = RegionTag::ALL
            .into_iter()
            .map(|tag| {
                let names = self
                    .find_groups_by_tag(groups, tag)
                    .into_iter()
                    .map(|g| g.name.clone())
                    .collect();
                (tag, names)
            })
            .collect();

        let unclassified = groups
            .iter()
            .filter(|g| !RegionTag::ALL.iter().any(|tag| tag.matches(&g.name)))
            .map(|g| g.name.clone())
            .collect();

        let hands = self.find_hand_groups(groups);
        let diagnosis = GroupDiagnosis {
            by_tag,
            unclassified,
            left_hand: hands.left.map(|g| g.name.clone()),
            right_hand: hands.right.map(|g| g.name.clone()),
        };

        info!(
            groups = groups.len(),
            unclassified = diagnosis.unclassified.len(),
            missing = diagnosis.missing_tags().len(),
            "vertex groups diagnosed"
        );
        diagnosis
    }
}

/// [`RegionMatcher::find_group_by_patterns`] with the default matcher.
#[must_use]
pub fn find_group_by_patterns<'g>(
    groups: &'g [VertexGroup],
    patterns: &[&str],
) -> Option<&'g VertexGroup> {
    RegionMatcher::new().find_group_by_patterns(groups, patterns)
}

/// [`RegionMatcher::find_groups_by_tag`] with the default matcher.
#[must_use]
pub fn find_groups_by_tag(groups: &[VertexGroup], tag: RegionTag) -> Vec<&VertexGroup> {
    RegionMatcher::new().find_groups_by_tag(groups, tag)
}

/// [`RegionMatcher::find_hand_groups`] with the default matcher.
#[must_use]
pub fn find_hand_groups(groups: &[VertexGroup]) -> HandGroups<'_> {
    RegionMatcher::new().find_hand_groups(groups)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn groups(names: &[&str]) -> Vec<VertexGroup> {
        names
            .iter()
            .zip(0u32..)
            .map(|(name, i)| VertexGroup::new(*name, i))
            .collect()
    }

    #[test]
    fn test_exact_beats_substring() {
        let g = groups(&["hip_extra", "Hip"]);
        let found = find_group_by_patterns(&g, &["hip"]).unwrap();
        assert_eq!(found.name, "Hip");
    }

    #[test]
    fn test_normalized_match() {
        let g = groups(&["Spine", "mixamorig:Hips"]);
        let found = find_group_by_patterns(&g, &["pelvis"]).unwrap();
        assert_eq!(found.name, "mixamorig:Hips");
    }

    #[test]
    fn test_normalized_beats_substring() {
        let g = groups(&["waist_band", "Pelvis"]);
        let found = find_group_by_patterns(&g, &["waist"]).unwrap();
        assert_eq!(found.name, "Pelvis");
    }

    #[test]
    fn test_pattern_order_wins() {
        let g = groups(&["Spine", "Chest"]);
        let found = find_group_by_patterns(&g, &["chest", "spine"]).unwrap();
        assert_eq!(found.name, "Chest");
    }

    #[test]
    fn test_no_match() {
        let g = groups(&["Head", "Neck"]);
        assert!(find_group_by_patterns(&g, &["hip", ""]).is_none());
        assert!(find_group_by_patterns(&[], &["hip"]).is_none());
    }

    #[test]
    fn test_tag_lookup_ordered_unique() {
        let g = groups(&["UpperChest", "Spine", "Breast_L", "bust_thorax"]);
        let names: Vec<&str> = find_groups_by_tag(&g, RegionTag::Chest)
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, ["UpperChest", "Breast_L", "bust_thorax"]);
    }

    #[test]
    fn test_tag_lookup_follows_pattern_order() {
        let g = groups(&["Thorax", "Chest"]);
        let names: Vec<&str> = find_groups_by_tag(&g, RegionTag::Chest)
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, ["Chest", "Thorax"]);

        // "hips" also contains "hip", so both come from the first pattern.
        let g = groups(&["Waist", "Hips", "Pelvis", "Hip_L"]);
        let names: Vec<&str> = find_groups_by_tag(&g, RegionTag::Hip)
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, ["Hips", "Hip_L", "Pelvis", "Waist"]);
    }

    #[test]
    fn test_hand_groups() {
        let g = groups(&["mixamorig:LeftHand", "mixamorig:RightHand", "Head"]);
        let hands = find_hand_groups(&g);
        assert!(hands.is_complete());
        assert_eq!(hands.left.unwrap().index, 0);
        assert_eq!(hands.right.unwrap().index, 1);

        let head_only = groups(&["Head"]);
        let none = find_hand_groups(&head_only);
        assert!(none.is_empty());
    }

    #[test]
    fn test_custom_prefix() {
        let g = groups(&["XX_Pelvis"]);
        let matcher = RegionMatcher::new().with_custom_prefix("xx_");
        assert_eq!(matcher.normalize("XX_Pelvis"), "hips");
        assert_eq!(
            matcher.find_group_by_patterns(&g, &["hips"]).map(|g| g.index),
            Some(0)
        );
    }

    #[test]
    fn test_diagnose() {
        let g = groups(&["Hips", "LeftUpLeg", "LeftHand", "Head"]);
        let diag = RegionMatcher::new().diagnose(&g);
        assert_eq!(diag.groups_for(RegionTag::Hip), ["Hips"]);
        assert_eq!(diag.groups_for(RegionTag::Leg), ["LeftUpLeg"]);
        assert_eq!(diag.unclassified, ["Head"]);
        assert_eq!(diag.left_hand.as_deref(), Some("LeftHand"));
        assert!(diag.right_hand.is_none());
        assert!(diag.missing_tags().contains(&RegionTag::Chest));

        let text = diag.to_string();
        assert!(text.contains("unclassified: Head"));
        assert!(text.contains("left=LeftHand"));
    }
}
