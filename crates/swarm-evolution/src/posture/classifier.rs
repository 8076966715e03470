//! Posture classification
//!
//! ```text
//! override present        -> override
//! danger >= 3             -> siege
//! danger >= 2             -> war
//! siege > 30              -> siege
//! war > 25                -> war
//! defense > 20            -> defensive
//! nuke_target > 40        -> nukePrep
//! expand > 30, danger 0   -> expand
//! danger >= 1             -> defensive
//! otherwise               -> eco
//! ```

use serde::{Deserialize, Serialize};
use swarm_common::{ConfigError, EventKind, PheromoneVector, Posture, SwarmState, MAX_PHEROMONE};
use tracing::info;

/// Pheromone levels above which a posture is selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostureThresholds {
    pub siege: f64,
    pub war: f64,
    pub defense: f64,
    pub nuke_target: f64,
    pub expand: f64,
}

impl Default for PostureThresholds {
    fn default() -> Self {
        Self {
            siege: 30.0,
            war: 25.0,
            defense: 20.0,
            nuke_target: 40.0,
            expand: 30.0,
        }
    }
}

impl PostureThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("siege", self.siege),
            ("war", self.war),
            ("defense", self.defense),
            ("nuke_target", self.nuke_target),
            ("expand", self.expand),
        ];
        for (name, value) in fields {
            if !(0.0..=MAX_PHEROMONE).contains(&value) {
                return Err(ConfigError::Invalid {
                    name: "posture_thresholds",
                    reason: format!("{name} threshold {value} outside signal range"),
                });
            }
        }
        Ok(())
    }
}

/// Pure posture decision for one room
pub fn classify_posture(
    pheromones: &PheromoneVector,
    danger: u8,
    override_posture: Option<Posture>,
    thresholds: &PostureThresholds,
) -> Posture {
    if let Some(posture) = override_posture {
        return posture;
    }

    if danger >= 3 {
        return Posture::Siege;
    }
    if danger >= 2 {
        return Posture::War;
    }

    if pheromones.siege > thresholds.siege {
        Posture::Siege
    } else if pheromones.war > thresholds.war {
        Posture::War
    } else if pheromones.defense > thresholds.defense {
        Posture::Defensive
    } else if pheromones.nuke_target > thresholds.nuke_target {
        Posture::NukePrep
    } else if pheromones.expand > thresholds.expand && danger == 0 {
        Posture::Expand
    } else if danger >= 1 {
        Posture::Defensive
    } else {
        Posture::Eco
    }
}

/// A committed posture transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostureChange {
    pub from: Posture,
    pub to: Posture,
}

/// Write the classified posture into `state`, logging only real changes
pub fn apply_posture(
    room: &str,
    state: &mut SwarmState,
    override_posture: Option<Posture>,
    thresholds: &PostureThresholds,
    tick: u64,
) -> Option<PostureChange> {
    let next = classify_posture(&state.pheromones, state.danger, override_posture, thresholds);
    if next == state.posture {
        return None;
    }
    let change = PostureChange {
        from: state.posture,
        to: next,
    };
    state.posture = next;
    state.event_log.push(
        tick,
        EventKind::PostureChanged,
        format!("posture {} -> {}", change.from, change.to),
    );
    info!(
        room,
        tick,
        from = %change.from,
        to = %change.to,
        overridden = override_posture.is_some(),
        "Posture changed"
    );
    Some(change)
}
