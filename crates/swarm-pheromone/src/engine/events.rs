//! Event path: instantaneous bumps that bypass the update gate
//!
//! Each event is additive. With deduplication enabled a given
//! `(room, event key)` pair applies at most once per tick, so a collaborator
//! firing the same hook twice cannot double the effect.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use swarm_common::{EventKind, PheromoneKind, RoomName, StructureKind, SwarmState, MAX_DANGER};
use tracing::{debug, info, warn};

use super::PheromoneEngine;

pub const HOSTILE_DEFENSE_PER_UNIT: f64 = 5.0;
pub const HOSTILE_WAR_BUMP: f64 = 10.0;
pub const HOSTILE_SIEGE_BUMP: f64 = 15.0;
pub const DESTROYED_DEFENSE_BUMP: f64 = 5.0;
pub const DESTROYED_BUILD_BUMP: f64 = 10.0;
pub const CRITICAL_SIEGE_BUMP: f64 = 10.0;
pub const NUKE_SIEGE_BUMP: f64 = 50.0;
pub const NUKE_DEFENSE_BUMP: f64 = 30.0;
pub const REMOTE_LOST_EXPAND_DROP: f64 = 10.0;
pub const REMOTE_LOST_DEFENSE_BUMP: f64 = 5.0;

/// Something that happened to a room outside the periodic cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RoomEvent {
    /// Hostiles entered the room
    HostilesDetected { count: u32, danger: u8 },
    /// One of our structures was destroyed
    StructureDestroyed { structure: StructureKind },
    /// An incoming nuke was spotted
    NukeDetected,
    /// A remote harvesting source was lost
    RemoteSourceLost,
    /// Strategic layer marked this room as a nuke launch candidate
    NukeTargetMarked { weight: f64 },
}

impl RoomEvent {
    pub fn log_kind(&self) -> EventKind {
        match self {
            RoomEvent::HostilesDetected { .. } => EventKind::HostilesDetected,
            RoomEvent::StructureDestroyed { .. } => EventKind::StructureDestroyed,
            RoomEvent::NukeDetected => EventKind::NukeDetected,
            RoomEvent::RemoteSourceLost => EventKind::RemoteSourceLost,
            RoomEvent::NukeTargetMarked { .. } => EventKind::NukeTargetMarked,
        }
    }

    /// Identity used for per-tick deduplication
    pub fn dedup_key(&self) -> EventKey {
        EventKey {
            kind: self.log_kind(),
            structure: match self {
                RoomEvent::StructureDestroyed { structure } => Some(*structure),
                _ => None,
            },
        }
    }

    fn describe(&self) -> String {
        match self {
            RoomEvent::HostilesDetected { count, danger } => {
                format!("{count} hostiles detected (danger {danger})")
            }
            RoomEvent::StructureDestroyed { structure } => {
                format!("{} destroyed", structure.as_str())
            }
            RoomEvent::NukeDetected => "incoming nuke detected".to_string(),
            RoomEvent::RemoteSourceLost => "remote source lost".to_string(),
            RoomEvent::NukeTargetMarked { weight } => format!("marked as nuke target ({weight:.1})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub kind: EventKind,
    pub structure: Option<StructureKind>,
}

/// Outcome of [`PheromoneEngine::apply_event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    /// Same event already applied to this room this tick
    Duplicate,
    /// Malformed payload, state left untouched
    Ignored,
}

/// Per-tick set of (room, event) pairs already applied
#[derive(Debug, Default)]
pub struct EventDeduplicator {
    tick: Option<u64>,
    seen: HashSet<(RoomName, EventKey)>,
}

impl EventDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset when the tick advances
    pub fn begin_tick(&mut self, tick: u64) {
        if self.tick != Some(tick) {
            self.seen.clear();
            self.tick = Some(tick);
        }
    }

    /// Record the pair; `false` if it was already seen this tick
    pub fn first_occurrence(&mut self, room: &RoomName, key: EventKey, tick: u64) -> bool {
        self.begin_tick(tick);
        self.seen.insert((room.clone(), key))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl PheromoneEngine {
    /// Apply an event to `state` immediately, ignoring the update gate.
    pub fn apply_event(
        &mut self,
        room: &RoomName,
        state: &mut SwarmState,
        event: RoomEvent,
        tick: u64,
    ) -> EventOutcome {
        if let RoomEvent::NukeTargetMarked { weight } = event {
            if !weight.is_finite() {
                warn!(%room, tick, weight, "Ignoring non-finite nuke target weight");
                return EventOutcome::Ignored;
            }
        }
        if self.config.dedup_events
            && !self.dedup.first_occurrence(room, event.dedup_key(), tick)
        {
            debug!(%room, tick, ?event, "Dropping duplicate event");
            return EventOutcome::Duplicate;
        }

        let p = &mut state.pheromones;
        match event {
            RoomEvent::HostilesDetected { count, danger } => {
                p.add(PheromoneKind::Defense, count as f64 * HOSTILE_DEFENSE_PER_UNIT);
                if danger >= 2 {
                    p.add(PheromoneKind::War, HOSTILE_WAR_BUMP);
                }
                if danger >= 3 {
                    p.add(PheromoneKind::Siege, HOSTILE_SIEGE_BUMP);
                }
            }
            RoomEvent::StructureDestroyed { structure } => {
                p.add(PheromoneKind::Defense, DESTROYED_DEFENSE_BUMP);
                p.add(PheromoneKind::Build, DESTROYED_BUILD_BUMP);
                if structure.is_critical() {
                    p.add(PheromoneKind::Siege, CRITICAL_SIEGE_BUMP);
                    let raised = state.danger.saturating_add(1).min(MAX_DANGER);
                    state.set_danger(tick, raised);
                    state.raise_danger_floor(tick, raised, tick + self.config.structure_alert_ticks);
                }
            }
            RoomEvent::NukeDetected => {
                p.add(PheromoneKind::Siege, NUKE_SIEGE_BUMP);
                p.add(PheromoneKind::Defense, NUKE_DEFENSE_BUMP);
                state.set_danger(tick, MAX_DANGER);
                state.raise_danger_floor(tick, MAX_DANGER, tick + self.config.nuke_alert_ticks);
            }
            RoomEvent::RemoteSourceLost => {
                p.add(PheromoneKind::Expand, -REMOTE_LOST_EXPAND_DROP);
                p.add(PheromoneKind::Defense, REMOTE_LOST_DEFENSE_BUMP);
            }
            RoomEvent::NukeTargetMarked { weight } => {
                p.add(PheromoneKind::NukeTarget, weight);
            }
        }

        let message = event.describe();
        info!(%room, tick, event = %message, "Room event applied");
        state.event_log.push(tick, event.log_kind(), message);
        EventOutcome::Applied
    }
}
