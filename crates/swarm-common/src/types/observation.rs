//! Observation snapshots supplied by telemetry collaborators
//!
//! Snapshots are read-only inputs for a single tick. Anything the host could
//! not see is expressed as `None`/empty and degrades the dependent
//! contribution to zero rather than failing the room update.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::room_name::RoomName;

/// Structure types the core reasons about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StructureKind {
    Spawn,
    Extension,
    Tower,
    Storage,
    Link,
    Terminal,
    Extractor,
    Lab,
    Factory,
    PowerSpawn,
    Nuker,
    Observer,
    Rampart,
    Wall,
    Road,
    Container,
}

impl StructureKind {
    /// Losing one of these raises the room's danger level
    pub fn is_critical(self) -> bool {
        matches!(
            self,
            StructureKind::Spawn | StructureKind::Storage | StructureKind::Tower
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StructureKind::Spawn => "spawn",
            StructureKind::Extension => "extension",
            StructureKind::Tower => "tower",
            StructureKind::Storage => "storage",
            StructureKind::Link => "link",
            StructureKind::Terminal => "terminal",
            StructureKind::Extractor => "extractor",
            StructureKind::Lab => "lab",
            StructureKind::Factory => "factory",
            StructureKind::PowerSpawn => "powerSpawn",
            StructureKind::Nuker => "nuker",
            StructureKind::Observer => "observer",
            StructureKind::Rampart => "rampart",
            StructureKind::Wall => "wall",
            StructureKind::Road => "road",
            StructureKind::Container => "container",
        }
    }
}

/// Count of each structure type present in a room
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureCounts(BTreeMap<StructureKind, u32>);

impl StructureCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: StructureKind, count: u32) -> Self {
        self.set(kind, count);
        self
    }

    pub fn set(&mut self, kind: StructureKind, count: u32) {
        if count == 0 {
            self.0.remove(&kind);
        } else {
            self.0.insert(kind, count);
        }
    }

    #[inline]
    pub fn count(&self, kind: StructureKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    #[inline]
    pub fn has(&self, kind: StructureKind) -> bool {
        self.count(kind) > 0
    }
}

/// One energy source in the room
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceObservation {
    pub energy: u32,
    pub capacity: u32,
}

/// Damage per tick of one ATTACK part
pub const ATTACK_POWER: f64 = 30.0;

/// Damage per tick of one RANGED_ATTACK part
pub const RANGED_ATTACK_POWER: f64 = 10.0;

/// Structure damage per tick of one WORK part dismantling
pub const DISMANTLE_POWER: f64 = 50.0;

/// Multiplier applied when hostiles carry boosted parts
pub const BOOST_MULTIPLIER: f64 = 4.0;

/// Hostile presence and offensive body composition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostileSummary {
    pub count: u32,
    pub attack_parts: u32,
    pub ranged_attack_parts: u32,
    pub work_parts: u32,
    pub heal_parts: u32,
    /// Any hostile carries boosted parts
    pub boosted: bool,
}

impl HostileSummary {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Worst-case damage per tick the hostiles could deal
    pub fn potential_damage(&self) -> f64 {
        let raw = self.attack_parts as f64 * ATTACK_POWER
            + self.ranged_attack_parts as f64 * RANGED_ATTACK_POWER
            + self.work_parts as f64 * DISMANTLE_POWER;
        if self.boosted {
            raw * BOOST_MULTIPLIER
        } else {
            raw
        }
    }
}

/// Visible controller state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerObservation {
    /// Room controller level (1-8)
    pub level: u8,
    /// Progress toward the next level
    pub progress: u64,
    /// Progress required for the next level (0 at max level)
    pub progress_total: u64,
}

impl ControllerObservation {
    /// Fraction of the way to the next level. `None` when the controller has
    /// no next level.
    pub fn progress_fraction(&self) -> Option<f64> {
        if self.progress_total == 0 {
            return None;
        }
        Some((self.progress as f64 / self.progress_total as f64).clamp(0.0, 1.0))
    }
}

/// Energy moved through the room this tick, by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyFlows {
    pub harvested: f64,
    pub spawning: f64,
    pub construction: f64,
    pub repair: f64,
    pub tower: f64,
}

/// Everything observed about one room in one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub name: RoomName,
    #[serde(default)]
    pub sources: Vec<SourceObservation>,
    #[serde(default)]
    pub hostiles: HostileSummary,
    #[serde(default)]
    pub construction_sites: u32,
    #[serde(default)]
    pub controller: Option<ControllerObservation>,
    #[serde(default)]
    pub energy_available: u32,
    #[serde(default)]
    pub energy_capacity: u32,
    #[serde(default)]
    pub storage_energy: Option<u32>,
    #[serde(default)]
    pub structures: StructureCounts,
    #[serde(default)]
    pub flows: EnergyFlows,
    #[serde(default)]
    pub idle_workers: u32,
}

impl RoomSnapshot {
    /// A room with nothing visible: no sources, hostiles or controller
    pub fn empty(name: RoomName) -> Self {
        Self {
            name,
            sources: Vec::new(),
            hostiles: HostileSummary::default(),
            construction_sites: 0,
            controller: None,
            energy_available: 0,
            energy_capacity: 0,
            storage_energy: None,
            structures: StructureCounts::default(),
            flows: EnergyFlows::default(),
            idle_workers: 0,
        }
    }

    /// Mean remaining energy across sources, 0 when there are none
    pub fn avg_source_energy(&self) -> f64 {
        if self.sources.is_empty() {
            return 0.0;
        }
        let total: f64 = self.sources.iter().map(|s| s.energy as f64).sum();
        total / self.sources.len() as f64
    }

    /// Controller level, 0 when no controller is visible
    pub fn controller_level(&self) -> u8 {
        self.controller.map(|c| c.level).unwrap_or(0)
    }
}

/// Empire-wide progression inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmpireSnapshot {
    /// Global control level
    pub gcl: u32,
    /// Number of rooms currently owned
    pub owned_rooms: u32,
}
