//! # Swarm Evolution
//!
//! Discrete classifications derived from a room's continuous state.
//!
//! ## Stage
//!
//! Highest stage whose threshold record is fully met:
//!
//! ```text
//! endGame > fortification > economicMaturity > earlyExpansion > seed
//! ```
//!
//! ## Posture
//!
//! Override, then danger, then pheromone thresholds, then fallback. Each
//! posture carries a spawn profile (sums to 1.0) and resource priorities.

pub mod posture;
pub mod stage;
pub mod structures;

use serde::{Deserialize, Serialize};
use swarm_common::ConfigError;

pub use posture::{
    apply_posture, classify_posture, PostureChange, PostureProfile, PostureProfileTable,
    PostureThresholds, ResourcePriorities, SpawnProfile,
};
pub use stage::{classify_stage, EvolutionClassifier, LevelChange, StageThreshold, StageThresholds};
pub use structures::{missing_structures, unlock_level};

/// Evolution and posture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Ticks a new stage must persist before it is committed (0 = immediate)
    pub hysteresis_ticks: u64,
    pub stages: StageThresholds,
    pub posture_thresholds: PostureThresholds,
    pub profiles: PostureProfileTable,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            hysteresis_ticks: 0,
            stages: StageThresholds::default(),
            posture_thresholds: PostureThresholds::default(),
            profiles: PostureProfileTable::default(),
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stages.validate()?;
        self.posture_thresholds.validate()?;
        self.profiles.validate()
    }

    /// Stage classifier built from this configuration
    pub fn classifier(&self) -> EvolutionClassifier {
        EvolutionClassifier::new(self.stages.clone(), self.hysteresis_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_deserializes_partially() {
        let cfg: EvolutionConfig = serde_json::from_str(r#"{"hysteresis_ticks":25}"#).unwrap();
        assert_eq!(cfg.hysteresis_ticks, 25);
        assert_eq!(cfg.stages, StageThresholds::default());
    }
}
