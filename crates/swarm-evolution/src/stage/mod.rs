//! Evolution stage
//!
//! Maps room and empire progression onto a [`ColonyLevel`](swarm_common::ColonyLevel).

pub mod classifier;
pub mod thresholds;

pub use classifier::{classify_stage, EvolutionClassifier, LevelChange};
pub use thresholds::{StageThreshold, StageThresholds, MAX_CONTROLLER_LEVEL};
