//! SwarmState - durable per-room coordination record
//!
//! One record per controlled room. Created lazily on first control, mutated
//! only by the coordination core, never explicitly destroyed: once a room is
//! no longer controlled its record is simply ignored.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::colony_level::ColonyLevel;
use super::observation::StructureKind;
use super::pheromone::PheromoneVector;
use super::posture::Posture;

/// Capacity of the per-room diagnostic event log
pub const EVENT_LOG_CAPACITY: usize = 20;

/// Highest danger level
pub const MAX_DANGER: u8 = 3;

/// Category of an event log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    PostureChanged,
    LevelChanged,
    DangerChanged,
    HostilesDetected,
    StructureDestroyed,
    NukeDetected,
    RemoteSourceLost,
    NukeTargetMarked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub tick: u64,
    pub kind: EventKind,
    pub message: String,
}

/// Append-only ring buffer keeping the most recent entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: VecDeque<EventLogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, evicting the oldest past capacity
    pub fn push(&mut self, tick: u64, kind: EventKind, message: impl Into<String>) {
        self.entries.push_back(EventLogEntry {
            tick,
            kind,
            message: message.into(),
        });
        while self.entries.len() > EVENT_LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest first
    pub fn iter(&self) -> impl Iterator<Item = &EventLogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&EventLogEntry> {
        self.entries.back()
    }
}

/// Structures the room could have at its controller level but does not
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissingStructures {
    pub spawn: bool,
    pub extension: bool,
    pub tower: bool,
    pub storage: bool,
    pub link: bool,
    pub terminal: bool,
    pub extractor: bool,
    pub lab: bool,
    pub factory: bool,
    pub power_spawn: bool,
    pub nuker: bool,
    pub observer: bool,
}

impl MissingStructures {
    /// Structure types tracked by the checklist
    pub const CHECKLIST: [StructureKind; 12] = [
        StructureKind::Spawn,
        StructureKind::Extension,
        StructureKind::Tower,
        StructureKind::Storage,
        StructureKind::Link,
        StructureKind::Terminal,
        StructureKind::Extractor,
        StructureKind::Lab,
        StructureKind::Factory,
        StructureKind::PowerSpawn,
        StructureKind::Nuker,
        StructureKind::Observer,
    ];

    fn slot_mut(&mut self, kind: StructureKind) -> Option<&mut bool> {
        match kind {
            StructureKind::Spawn => Some(&mut self.spawn),
            StructureKind::Extension => Some(&mut self.extension),
            StructureKind::Tower => Some(&mut self.tower),
            StructureKind::Storage => Some(&mut self.storage),
            StructureKind::Link => Some(&mut self.link),
            StructureKind::Terminal => Some(&mut self.terminal),
            StructureKind::Extractor => Some(&mut self.extractor),
            StructureKind::Lab => Some(&mut self.lab),
            StructureKind::Factory => Some(&mut self.factory),
            StructureKind::PowerSpawn => Some(&mut self.power_spawn),
            StructureKind::Nuker => Some(&mut self.nuker),
            StructureKind::Observer => Some(&mut self.observer),
            _ => None,
        }
    }

    /// Whether `kind` is flagged missing; kinds off the checklist never are
    pub fn is_missing(&self, kind: StructureKind) -> bool {
        match kind {
            StructureKind::Spawn => self.spawn,
            StructureKind::Extension => self.extension,
            StructureKind::Tower => self.tower,
            StructureKind::Storage => self.storage,
            StructureKind::Link => self.link,
            StructureKind::Terminal => self.terminal,
            StructureKind::Extractor => self.extractor,
            StructureKind::Lab => self.lab,
            StructureKind::Factory => self.factory,
            StructureKind::PowerSpawn => self.power_spawn,
            StructureKind::Nuker => self.nuker,
            StructureKind::Observer => self.observer,
            _ => false,
        }
    }

    /// Flag `kind`; ignored for kinds off the checklist
    pub fn set(&mut self, kind: StructureKind, missing: bool) {
        if let Some(slot) = self.slot_mut(kind) {
            *slot = missing;
        }
    }

    pub fn any(&self) -> bool {
        Self::CHECKLIST.iter().any(|k| self.is_missing(*k))
    }
}

/// Current values of the room's rolling metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsSnapshot {
    pub energy_harvested: f64,
    pub energy_spawning: f64,
    pub energy_construction: f64,
    pub energy_repair: f64,
    pub energy_tower: f64,
    pub controller_progress: f64,
    pub hostile_count: f64,
    pub damage_potential: f64,
    pub idle_workers: f64,
}

impl MetricsSnapshot {
    /// Harvest income minus all tracked spending
    pub fn energy_balance(&self) -> f64 {
        self.energy_harvested
            - (self.energy_spawning + self.energy_construction + self.energy_repair + self.energy_tower)
    }
}

/// Stage candidate waiting out the evolution hysteresis window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLevel {
    pub level: ColonyLevel,
    pub since_tick: u64,
}

/// Per-room coordination record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwarmState {
    pub colony_level: ColonyLevel,
    pub posture: Posture,
    pub danger: u8,
    pub pheromones: PheromoneVector,
    pub next_update_tick: u64,
    pub last_update_tick: u64,
    pub event_log: EventLog,
    pub missing_structures: MissingStructures,
    pub metrics: MetricsSnapshot,
    /// Minimum danger held after a critical event
    pub danger_floor: u8,
    /// Tick at which `danger_floor` lapses
    pub danger_floor_until: u64,
    pub pending_level: Option<PendingLevel>,
}

impl Default for SwarmState {
    fn default() -> Self {
        Self::new()
    }
}

impl SwarmState {
    /// Fresh record for a room seen for the first time
    pub fn new() -> Self {
        Self {
            colony_level: ColonyLevel::LOWEST,
            posture: Posture::Eco,
            danger: 0,
            pheromones: PheromoneVector::default(),
            next_update_tick: 0,
            last_update_tick: 0,
            event_log: EventLog::new(),
            missing_structures: MissingStructures::default(),
            metrics: MetricsSnapshot::default(),
            danger_floor: 0,
            danger_floor_until: 0,
            pending_level: None,
        }
    }

    /// Active event-raised danger floor at `tick`
    pub fn active_danger_floor(&self, tick: u64) -> u8 {
        if tick < self.danger_floor_until {
            self.danger_floor
        } else {
            0
        }
    }

    /// Hold danger at `level` or above until `until`. An active hold is
    /// only ever strengthened or extended, never weakened.
    pub fn raise_danger_floor(&mut self, tick: u64, level: u8, until: u64) {
        let level = level.min(MAX_DANGER);
        if self.active_danger_floor(tick) == 0 {
            self.danger_floor = level;
            self.danger_floor_until = until;
        } else {
            self.danger_floor = self.danger_floor.max(level);
            self.danger_floor_until = self.danger_floor_until.max(until);
        }
    }

    /// Set the danger level, logging a change
    pub fn set_danger(&mut self, tick: u64, danger: u8) {
        let danger = danger.min(MAX_DANGER);
        if danger != self.danger {
            self.event_log.push(
                tick,
                EventKind::DangerChanged,
                format!("danger {} -> {}", self.danger, danger),
            );
            self.danger = danger;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_ring_buffer() {
        let mut log = EventLog::new();
        for tick in 0..25 {
            log.push(tick, EventKind::HostilesDetected, format!("tick {tick}"));
        }
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(log.iter().next().unwrap().tick, 5);
        assert_eq!(log.latest().unwrap().tick, 24);
    }

    #[test]
    fn test_missing_structures_flags() {
        let mut missing = MissingStructures::default();
        missing.set(StructureKind::Lab, true);
        missing.set(StructureKind::Road, true);
        assert!(missing.is_missing(StructureKind::Lab));
        assert!(!missing.is_missing(StructureKind::Road));
        assert!(missing.any());
    }

    #[test]
    fn test_danger_floor_expires() {
        let mut state = SwarmState::new();
        state.raise_danger_floor(0, 3, 100);
        assert_eq!(state.active_danger_floor(99), 3);
        assert_eq!(state.active_danger_floor(100), 0);

        state.raise_danger_floor(150, 1, 200);
        assert_eq!(state.active_danger_floor(150), 1);
    }

    #[test]
    fn test_danger_floor_never_weakens() {
        let mut state = SwarmState::new();
        state.raise_danger_floor(0, 3, 500);
        state.raise_danger_floor(10, 1, 200);
        assert_eq!(state.danger_floor, 3);
        assert_eq!(state.danger_floor_until, 500);
    }

    #[test]
    fn test_set_danger_logs_change_once() {
        let mut state = SwarmState::new();
        state.set_danger(10, 2);
        state.set_danger(11, 2);
        state.set_danger(12, 9);
        assert_eq!(state.danger, MAX_DANGER);
        assert_eq!(state.event_log.len(), 2);
    }

    #[test]
    fn test_missing_record_fields_default() {
        let state: SwarmState = serde_json::from_str(r#"{"posture":"war","danger":2}"#).unwrap();
        assert_eq!(state.posture, Posture::War);
        assert_eq!(state.colony_level, ColonyLevel::Seed);
        assert!(state.event_log.is_empty());
    }
}
