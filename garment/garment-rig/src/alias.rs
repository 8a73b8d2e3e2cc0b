//! Canonical alias table.

use std::sync::OnceLock;

use hashbrown::HashMap;

/// Raw base name to canonical token. Side suffixes are handled separately.
const ALIASES: &[(&str, &str)] = &[
    // Torso
    ("pelvis", "hips"),
    ("waist", "hips"),
    ("spine0", "spine"),
    ("spine_0", "spine"),
    ("spine1", "spine"),
    ("spine_1", "spine"),
    ("spine2", "chest"),
    ("spine_2", "chest"),
    ("upperchest", "chest"),
    ("upper_chest", "chest"),
    ("thorax", "chest"),
    ("collar", "clavicle"),
    // Arms
    ("upperarm", "arm"),
    ("upper_arm", "arm"),
    ("lowerarm", "forearm"),
    ("lower_arm", "forearm"),
    ("elbow", "forearm"),
    // Legs
    ("thigh", "upperleg"),
    ("upleg", "upperleg"),
    ("upper_leg", "upperleg"),
    ("shin", "lowerleg"),
    ("calf", "lowerleg"),
    ("leg", "lowerleg"),
    ("ankle", "foot"),
    ("toebase", "toes"),
    // Fingers
    ("thunb", "thumb"),
    ("thunb1", "thumb_proximal"),
    ("thunb2", "thumb_intermediate"),
    ("thunb3", "thumb_distal"),
    ("index1", "index_proximal"),
    ("index2", "index_intermediate"),
    ("index3", "index_distal"),
    ("middle1", "middle_proximal"),
    ("middle2", "middle_intermediate"),
    ("middle3", "middle_distal"),
    ("ring1", "ring_proximal"),
    ("ring2", "ring_intermediate"),
    ("ring3", "ring_distal"),
    ("little1", "little_proximal"),
    ("little2", "little_intermediate"),
    ("little3", "little_distal"),
    // Breast
    ("bust", "breast"),
    ("breast1", "breast_1"),
    ("breast2", "breast_2"),
    ("bustdynamicbone", "breast"),
    ("boobs", "breast"),
    ("front_chest", "breast_upper"),
];

fn table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| ALIASES.iter().copied().collect())
}

/// Canonical token for a raw base name, if it has one.
///
/// ```
/// use garment_rig::alias_for;
///
/// assert_eq!(alias_for("thigh"), Some("upperleg"));
/// assert_eq!(alias_for("hand"), None);
/// ```
#[must_use]
pub fn alias_for(base: &str) -> Option<&'static str> {
    table().get(base).copied()
}

/// Every `(raw, canonical)` pair in the table.
pub fn aliases() -> impl Iterator<Item = (&'static str, &'static str)> {
    ALIASES.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(alias_for("pelvis"), Some("hips"));
        assert_eq!(alias_for("upperarm"), Some("arm"));
        assert_eq!(alias_for("Pelvis"), None);
    }

    #[test]
    fn test_no_duplicate_keys() {
        assert_eq!(table().len(), ALIASES.len());
    }

    #[test]
    fn test_targets_are_lowercase() {
        for (raw, canonical) in aliases() {
            assert_eq!(raw, raw.to_lowercase());
            assert_eq!(canonical, canonical.to_lowercase());
        }
    }
}
