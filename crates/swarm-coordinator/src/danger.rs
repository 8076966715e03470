//! Danger assessment from hostile presence

use serde::{Deserialize, Serialize};
use swarm_common::{ConfigError, HostileSummary, MAX_DANGER};

/// Hostile count and damage cut-offs per danger level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DangerThresholds {
    pub elevated_count: u32,
    pub elevated_damage: f64,
    pub critical_count: u32,
    pub critical_damage: f64,
}

impl Default for DangerThresholds {
    fn default() -> Self {
        Self {
            elevated_count: 3,
            elevated_damage: 450.0,
            critical_count: 8,
            critical_damage: 1500.0,
        }
    }
}

impl DangerThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elevated_count == 0 || self.critical_count < self.elevated_count {
            return Err(ConfigError::Invalid {
                name: "danger",
                reason: format!(
                    "counts must satisfy 0 < elevated ({}) <= critical ({})",
                    self.elevated_count, self.critical_count
                ),
            });
        }
        if !(self.elevated_damage > 0.0 && self.critical_damage >= self.elevated_damage) {
            return Err(ConfigError::Invalid {
                name: "danger",
                reason: format!(
                    "damage must satisfy 0 < elevated ({}) <= critical ({})",
                    self.elevated_damage, self.critical_damage
                ),
            });
        }
        Ok(())
    }
}

/// Maps the live hostile summary to a 0-3 danger level
#[derive(Debug, Clone, Default)]
pub struct DangerAssessor {
    thresholds: DangerThresholds,
}

impl DangerAssessor {
    pub fn new(thresholds: DangerThresholds) -> Self {
        Self { thresholds }
    }

    /// Observed danger, before any event-raised floor
    pub fn observed(&self, hostiles: &HostileSummary) -> u8 {
        let damage = hostiles.potential_damage();
        let t = &self.thresholds;
        if hostiles.is_empty() && damage <= 0.0 {
            0
        } else if hostiles.count >= t.critical_count || damage >= t.critical_damage {
            MAX_DANGER
        } else if hostiles.count >= t.elevated_count || damage >= t.elevated_damage {
            2
        } else {
            1
        }
    }

    /// Observed danger raised to the active floor
    pub fn assess(&self, hostiles: &HostileSummary, floor: u8) -> u8 {
        self.observed(hostiles).max(floor).min(MAX_DANGER)
    }
}
