//! Posture
//!
//! Pure classification from signals and danger, plus the per-posture spawn
//! and resource tables downstream planners read.

pub mod classifier;
pub mod profiles;

pub use classifier::{apply_posture, classify_posture, PostureChange, PostureThresholds};
pub use profiles::{
    PostureProfile, PostureProfileTable, ResourcePriorities, SpawnProfile, PROFILE_SUM_TOLERANCE,
};
