//! Pheromone and metrics configuration
//!
//! Loaded once at startup and validated with [`PheromoneConfig::validate`];
//! a violation is a fatal [`ConfigError`], never a per-tick condition.

use serde::{Deserialize, Serialize};
use swarm_common::{ConfigError, PheromoneKind, PheromoneVector};

/// Default ticks between periodic pheromone updates
pub const DEFAULT_UPDATE_INTERVAL: u64 = 5;

/// Default ticks between diffusion passes
pub const DEFAULT_DIFFUSION_INTERVAL: u64 = 5;

/// Default sanity bound on a single controller progress delta
pub const DEFAULT_MAX_PROGRESS_DELTA: f64 = 100_000.0;

/// Pheromone engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PheromoneConfig {
    /// Ticks between periodic decay/contribution passes
    pub update_interval: u64,
    /// Ticks between diffusion passes
    pub diffusion_interval: u64,
    /// Per-signal multiplicative decay, strictly inside (0, 1)
    pub decay_factors: PheromoneVector,
    /// Per-signal diffusion rate, inside [0, 1]
    pub diffusion_rates: PheromoneVector,
    /// Apply each (room, event) at most once per tick
    pub dedup_events: bool,
    /// How long a critical structure loss holds the raised danger level
    pub structure_alert_ticks: u64,
    /// How long a detected nuke holds danger at its maximum
    pub nuke_alert_ticks: u64,
}

impl Default for PheromoneConfig {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            diffusion_interval: DEFAULT_DIFFUSION_INTERVAL,
            decay_factors: PheromoneVector {
                expand: 0.95,
                harvest: 0.90,
                build: 0.92,
                upgrade: 0.93,
                defense: 0.97,
                war: 0.98,
                siege: 0.99,
                logistics: 0.91,
                nuke_target: 0.99,
            },
            diffusion_rates: PheromoneVector {
                expand: 0.3,
                harvest: 0.1,
                build: 0.15,
                upgrade: 0.1,
                defense: 0.4,
                war: 0.5,
                siege: 0.6,
                logistics: 0.2,
                nuke_target: 0.1,
            },
            dedup_events: true,
            structure_alert_ticks: 100,
            nuke_alert_ticks: 50_000,
        }
    }
}

impl PheromoneConfig {
    /// Check the static invariants: decay factors in (0,1), diffusion rates
    /// in [0,1], positive intervals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_interval == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "update_interval",
            });
        }
        if self.diffusion_interval == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "diffusion_interval",
            });
        }
        for kind in PheromoneKind::ALL {
            let decay = self.decay_factors.get(kind);
            if !(decay > 0.0 && decay < 1.0) {
                return Err(ConfigError::DecayOutOfRange {
                    signal: kind.as_str(),
                    value: decay,
                });
            }
            let rate = self.diffusion_rates.get(kind);
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::DiffusionOutOfRange {
                    signal: kind.as_str(),
                    value: rate,
                });
            }
        }
        Ok(())
    }
}

/// Metrics tracking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Controller progress deltas above this are treated as a skipped
    /// observation and discarded
    pub max_progress_delta: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            max_progress_delta: DEFAULT_MAX_PROGRESS_DELTA,
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_progress_delta.is_finite() && self.max_progress_delta > 0.0) {
            return Err(ConfigError::Invalid {
                name: "max_progress_delta",
                reason: format!("must be positive and finite, got {}", self.max_progress_delta),
            });
        }
        Ok(())
    }
}
