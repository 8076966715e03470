//! Pheromone engine
//!
//! Three ways a room's signals change:
//! - periodic: gated decay plus observation-driven contributions
//! - events: immediate additive bumps, deduplicated per tick
//! - diffusion: two-phase spread of combat and expansion signals to neighbors

pub mod diffusion;
pub mod events;
pub mod periodic;

use swarm_common::ConfigError;
use tracing::info;

use crate::config::PheromoneConfig;
use events::EventDeduplicator;

pub use diffusion::{apply_diffusion, DiffusionEdge, NEIGHBOR_SHARE};
pub use events::{EventKey, EventOutcome, RoomEvent};
pub use periodic::contributions;

/// Owns the validated configuration and the per-tick event dedup set
#[derive(Debug)]
pub struct PheromoneEngine {
    config: PheromoneConfig,
    dedup: EventDeduplicator,
}

impl PheromoneEngine {
    pub fn new(config: PheromoneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            update_interval = config.update_interval,
            diffusion_interval = config.diffusion_interval,
            dedup = config.dedup_events,
            "Pheromone engine configured"
        );
        Ok(Self {
            config,
            dedup: EventDeduplicator::new(),
        })
    }

    pub fn config(&self) -> &PheromoneConfig {
        &self.config
    }

    /// Start a new tick; clears the event dedup set if the tick advanced
    pub fn begin_tick(&mut self, tick: u64) {
        self.dedup.begin_tick(tick);
    }

    /// Whether a diffusion pass is scheduled for `tick`
    pub fn diffusion_due(&self, tick: u64) -> bool {
        tick % self.config.diffusion_interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected() {
        let config = PheromoneConfig {
            update_interval: 0,
            ..Default::default()
        };
        assert!(matches!(
            PheromoneEngine::new(config),
            Err(ConfigError::ZeroInterval { .. })
        ));
    }

    #[test]
    fn test_diffusion_schedule() {
        let engine = PheromoneEngine::new(PheromoneConfig::default()).unwrap();
        assert!(engine.diffusion_due(0));
        assert!(!engine.diffusion_due(3));
        assert!(engine.diffusion_due(10));
    }
}
