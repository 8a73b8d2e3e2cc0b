//! Error types for rig naming.

use thiserror::Error;

/// Result type for rig naming operations.
pub type RigResult<T> = Result<T, RigError>;

/// Errors from rig naming.
#[derive(Debug, Error)]
pub enum RigError {
    /// A region tag string did not name a known region.
    #[error("unknown region tag '{0}' (expected hip, chest, arm, leg, foot or hand)")]
    UnknownRegionTag(String),
}
