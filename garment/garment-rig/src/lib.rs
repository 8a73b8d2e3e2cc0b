//! Rig naming: canonical bone/group names and body-region lookup.
//!
//! Skeletons from different authoring tools name the same joint in many
//! ways (`mixamorig:LeftHand`, `Hand.L`, `hand_l.001`). This crate folds
//! such names into one vocabulary and uses it to find the vertex groups
//! that cover a body region.
//!
//! - [`normalize`] canonicalizes a single name.
//! - [`RegionTag`] names the body regions garments are cut from.
//! - [`RegionMatcher`] finds groups by tag, by ordered patterns, or as a
//!   left/right hand pair, and can explain what it found.
//!
//! # Example
//!
//! ```
//! use garment_rig::{RegionMatcher, RegionTag, normalize};
//! use mesh_types::VertexGroup;
//!
//! assert_eq!(normalize("mixamorig:LeftHand"), "hand_l");
//! assert_eq!(normalize("Pelvis"), "hips");
//!
//! let groups = vec![
//!     VertexGroup::new("hip_extra", 0),
//!     VertexGroup::new("Hip", 1),
//!     VertexGroup::new("Spine2", 2),
//! ];
//! let matcher = RegionMatcher::new();
//! let hip = matcher.find_group_by_patterns(&groups, &["hip", "hips", "pelvis"]);
//! assert_eq!(hip.map(|g| g.index), Some(1));
//!
//! let chest = matcher.find_groups_by_tag(&groups, RegionTag::Chest);
//! assert!(chest.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod alias;
mod error;
mod matcher;
mod normalize;
mod tag;

pub use alias::{alias_for, aliases};
pub use error::{RigError, RigResult};
pub use matcher::{
    GroupDiagnosis, HandGroups, RegionMatcher, find_group_by_patterns, find_groups_by_tag,
    find_hand_groups,
};
pub use normalize::{normalize, normalize_with};
pub use tag::{LEFT_HAND_PATTERNS, RIGHT_HAND_PATTERNS, RegionTag};
