//! Bone and vertex-group name normalization.
//!
//! One pass runs these steps, each on the output of the previous:
//!
//! 1. lower-case
//! 2. remember and strip a trailing `_end`
//! 3. strip caller-supplied prefix/suffix
//! 4. strip a tool prefix (`mixamorig`, `bip01`, `character`, and
//!    `bip`/`bone`/`rig` when followed by a separator)
//! 5. trim separators
//! 6. detect a side marker as prefix (`left`, `right`, `l_`, `r_`) or
//!    else as suffix (`_l`, `.left`, ...) and strip it
//! 7. map `.`, `-` and whitespace to `_`
//! 8. split camelCase boundaries with `_`; a no-op, since step 1 already
//!    lower-cased the name, so `ToeBase` becomes `toebase`, not `toe_base`
//! 9. strip a trailing `_<digits>`
//! 10. alias lookup
//! 11. re-append `_end`, then the side suffix
//! 12. collapse repeated `_` and trim
//!
//! [`normalize`] repeats the pass until the name stops changing, so its
//! output is a fixed point: `normalize(normalize(s)) == normalize(s)`.

use std::sync::OnceLock;

use regex::Regex;

use crate::alias::alias_for;

/// Upper bound on passes; real names settle in two or three.
const MAX_PASSES: usize = 32;

const TRIM: &[char] = &['_', '.', ' '];

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn tool_prefix() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(
        &RE,
        r"^(?:(?:mixamorig|bip01|character)[._\s:]*|(?:bip|bone|rig)[._\s:]+)",
    )
}

fn side_prefix() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"^(?:(left|right)[._\s]*|(l|r)[._\s]+)")
}

fn side_suffix() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"[._\s]+(left|right|l|r)$")
}

fn separators() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"[.\-\s]")
}

fn numeric_suffix() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"_\d+$")
}

fn repeated_underscores() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"_+")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn from_marker(marker: &str) -> Self {
        if marker.starts_with('l') {
            Self::Left
        } else {
            Self::Right
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Left => "_l",
            Self::Right => "_r",
        }
    }
}

fn is_side_word(s: &str) -> bool {
    matches!(s, "l" | "r" | "left" | "right")
}

fn has_side_suffix(s: &str) -> bool {
    s.ends_with("_l") || s.ends_with("_r")
}

/// Strip a tool prefix unless that would leave nothing meaningful behind.
fn strip_tool_prefix(name: &str) -> &str {
    let Some(m) = tool_prefix().and_then(|re| re.find(name)) else {
        return name;
    };
    let rest = &name[m.end()..];
    let trimmed = rest.trim_matches(TRIM);
    if trimmed.chars().count() < 2 || is_side_word(trimmed) {
        name
    } else {
        rest
    }
}

/// A side marker only counts when something other than another marker
/// is left behind.
fn keeps_base(rest: &str) -> bool {
    let rest = rest.trim_matches(TRIM);
    !rest.is_empty() && !is_side_word(rest)
}

fn take_side(name: &str) -> (String, Option<Side>) {
    if let Some(caps) = side_prefix().and_then(|re| re.captures(name)) {
        if let (Some(all), Some(marker)) = (caps.get(0), caps.get(1).or_else(|| caps.get(2))) {
            let rest = &name[all.end()..];
            if keeps_base(rest) {
                return (rest.to_string(), Some(Side::from_marker(marker.as_str())));
            }
        }
    }
    if let Some(caps) = side_suffix().and_then(|re| re.captures(name)) {
        if let (Some(all), Some(marker)) = (caps.get(0), caps.get(1)) {
            let rest = &name[..all.start()];
            if keeps_base(rest) {
                return (rest.to_string(), Some(Side::from_marker(marker.as_str())));
            }
        }
    }
    (name.to_string(), None)
}

fn replace_all(re: Option<&Regex>, text: &str, with: &str) -> String {
    match re {
        Some(re) => re.replace_all(text, with).into_owned(),
        None => text.to_string(),
    }
}

fn apply_alias(name: String) -> String {
    let split = if has_side_suffix(&name) {
        let (base, side) = name.split_at(name.len() - 2);
        Some((base.trim_end_matches('_'), side))
    } else {
        None
    };
    if let Some((base, side)) = split {
        if let Some(canonical) = alias_for(base) {
            return format!("{canonical}{side}");
        }
    }
    match alias_for(&name) {
        Some(canonical) => canonical.to_string(),
        None => name,
    }
}

fn normalize_pass(raw: &str, custom_prefix: Option<&str>, custom_suffix: Option<&str>) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut name = raw.to_lowercase();

    let had_end = name.ends_with("_end");
    if had_end {
        name.truncate(name.len() - 4);
    }

    if let Some(prefix) = custom_prefix.map(str::to_lowercase).filter(|p| !p.is_empty()) {
        if let Some(rest) = name.strip_prefix(prefix.as_str()) {
            name = rest.to_string();
        }
    }
    if let Some(suffix) = custom_suffix.map(str::to_lowercase).filter(|s| !s.is_empty()) {
        if let Some(rest) = name.strip_suffix(suffix.as_str()) {
            name = rest.to_string();
        }
    }

    let name = strip_tool_prefix(&name).trim_matches(TRIM).to_string();
    let (name, side) = take_side(&name);
    let name = name.trim_matches(TRIM);
    let name = replace_all(separators(), name, "_");
    let name = replace_all(numeric_suffix(), &name, "");
    let mut name = apply_alias(name);

    if had_end {
        name.push_str("_end");
    }
    if let Some(side) = side {
        if !has_side_suffix(&name) {
            name.push_str(side.suffix());
        }
    }

    replace_all(repeated_underscores(), &name, "_")
        .trim_matches('_')
        .to_string()
}

/// Canonicalize a bone or vertex-group name.
///
/// Total over strings: empty input gives an empty string, and nothing
/// panics or fails.
///
/// # Example
///
/// ```
/// use garment_rig::normalize;
///
/// assert_eq!(normalize("Hand.L"), "hand_l");
/// assert_eq!(normalize("Bip01 R UpperArm"), "arm_r");
/// assert_eq!(normalize("Thigh_L.001"), "upperleg_l");
/// assert_eq!(normalize(""), "");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, None, None)
}

/// [`normalize`] with an extra project-specific prefix and suffix to strip.
///
/// ```
/// use garment_rig::normalize_with;
///
/// assert_eq!(normalize_with("MyRig_Spine1", Some("myrig_"), None), "spine");
/// ```
#[must_use]
pub fn normalize_with(raw: &str, custom_prefix: Option<&str>, custom_suffix: Option<&str>) -> String {
    let mut current = normalize_pass(raw, custom_prefix, custom_suffix);
    for _ in 1..MAX_PASSES {
        let next = normalize_pass(&current, custom_prefix, custom_suffix);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_tool_prefixes() {
        assert_eq!(normalize("mixamorig:Hips"), "hips");
        assert_eq!(normalize("Bip01_Pelvis"), "hips");
        assert_eq!(normalize("rig.spine"), "spine");
        assert_eq!(normalize("bone_chest"), "chest");
        // Short prefixes need a separator.
        assert_eq!(normalize("ribcage"), "ribcage");
        assert_eq!(normalize("bonesaw"), "bonesaw");
    }

    #[test]
    fn test_tool_prefix_kept_when_nothing_remains() {
        assert_eq!(normalize("bone_l"), "bone_l");
        assert_eq!(normalize("rig"), "rig");
    }

    #[test]
    fn test_side_prefixes() {
        assert_eq!(normalize("LeftHand"), "hand_l");
        assert_eq!(normalize("right_foot"), "foot_r");
        assert_eq!(normalize("L_UpperArm"), "arm_l");
        assert_eq!(normalize("r.shin"), "lowerleg_r");
    }

    #[test]
    fn test_side_suffixes() {
        assert_eq!(normalize("hand.L"), "hand_l");
        assert_eq!(normalize("Foot_Right"), "foot_r");
        assert_eq!(normalize("thigh r"), "upperleg_r");
    }

    #[test]
    fn test_bare_side_words() {
        assert_eq!(normalize("left"), "left");
        assert_eq!(normalize("L"), "l");
        assert_eq!(normalize("left_r"), "left_r");
    }

    #[test]
    fn test_side_requires_separator() {
        assert_eq!(normalize("navel"), "navel");
        assert_eq!(normalize("collar"), "clavicle");
        assert_eq!(normalize("ear"), "ear");
    }

    #[test]
    fn test_numeric_suffix() {
        assert_eq!(normalize("Spine.002"), "spine");
        assert_eq!(normalize("hand_l_1"), "hand_l");
        assert_eq!(normalize("spine2"), "chest");
    }

    #[test]
    fn test_camel_case_not_split() {
        assert_eq!(normalize("ToeBase"), "toes");
        assert_eq!(normalize("HeadTop"), "headtop");
        assert_eq!(normalize("LeftUpperArm"), "arm_l");
    }

    #[test]
    fn test_end_marker() {
        assert_eq!(normalize("Hand_L_end"), "hand_end_l");
        assert_eq!(normalize("head_end"), "head_end");
    }

    #[test]
    fn test_separators_collapse() {
        assert_eq!(normalize("__upper--arm__"), "arm");
        assert_eq!(normalize("upper arm"), "arm");
    }

    #[test]
    fn test_custom_suffix() {
        assert_eq!(normalize_with("hips_ctrl", None, Some("_ctrl")), "hips");
        assert_eq!(normalize_with("hips_ctrl", None, None), "hips_ctrl");
    }

    #[test]
    fn test_idempotent_examples() {
        for raw in [
            "mixamorig:LeftUpLeg",
            "Bip01 L Thigh",
            "Hand_L_end",
            "breast1",
            "l_r_hand",
            "left",
            "left_r",
            "DEF-forearm.R.001",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {raw}");
        }
    }

    #[test]
    fn test_non_ascii() {
        assert_eq!(normalize("腰"), "腰");
        assert_eq!(normalize("胸.L"), "胸_l");
    }
}
