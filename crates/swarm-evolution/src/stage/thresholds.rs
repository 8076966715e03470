//! Stage threshold table
//!
//! One record per stage. A room reaches a stage when every requirement on
//! that record holds; unset optional requirements always hold.

use serde::{Deserialize, Serialize};
use swarm_common::{ColonyLevel, ConfigError, EmpireSnapshot, RoomSnapshot, StructureKind};

/// Highest room controller level
pub const MAX_CONTROLLER_LEVEL: u8 = 8;

/// Requirements to reach one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageThreshold {
    pub stage: ColonyLevel,
    pub controller_level: u8,
    #[serde(default)]
    pub min_rooms: Option<u32>,
    #[serde(default)]
    pub min_gcl: Option<u32>,
    #[serde(default)]
    pub requires_storage: bool,
    #[serde(default)]
    pub min_labs: Option<u32>,
    #[serde(default)]
    pub min_nukers: Option<u32>,
}

impl StageThreshold {
    fn base(stage: ColonyLevel, controller_level: u8) -> Self {
        Self {
            stage,
            controller_level,
            min_rooms: None,
            min_gcl: None,
            requires_storage: false,
            min_labs: None,
            min_nukers: None,
        }
    }

    /// Whether `snapshot` and `empire` satisfy every requirement
    pub fn is_met(&self, snapshot: &RoomSnapshot, empire: &EmpireSnapshot) -> bool {
        let structures = &snapshot.structures;
        snapshot.controller_level() >= self.controller_level
            && self.min_rooms.map_or(true, |n| empire.owned_rooms >= n)
            && self.min_gcl.map_or(true, |n| empire.gcl >= n)
            && (!self.requires_storage || structures.has(StructureKind::Storage))
            && self
                .min_labs
                .map_or(true, |n| structures.count(StructureKind::Lab) >= n)
            && self
                .min_nukers
                .map_or(true, |n| structures.count(StructureKind::Nuker) >= n)
    }
}

/// Ordered threshold table, lowest stage first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageThresholds(Vec<StageThreshold>);

impl Default for StageThresholds {
    fn default() -> Self {
        Self(vec![
            StageThreshold::base(ColonyLevel::Seed, 1),
            StageThreshold::base(ColonyLevel::EarlyExpansion, 3),
            StageThreshold {
                requires_storage: true,
                min_labs: Some(1),
                ..StageThreshold::base(ColonyLevel::EconomicMaturity, 6)
            },
            StageThreshold {
                requires_storage: true,
                min_labs: Some(3),
                ..StageThreshold::base(ColonyLevel::Fortification, 7)
            },
            StageThreshold {
                min_rooms: Some(3),
                min_gcl: Some(5),
                requires_storage: true,
                min_labs: Some(3),
                min_nukers: Some(1),
                ..StageThreshold::base(ColonyLevel::EndGame, 8)
            },
        ])
    }
}

impl StageThresholds {
    pub fn new(records: Vec<StageThreshold>) -> Result<Self, ConfigError> {
        let mut table = Self(records);
        table.0.sort_by_key(|r| r.stage);
        table.validate()?;
        Ok(table)
    }

    /// Exactly one record per stage, controller levels within 1-8 and
    /// non-decreasing along stage order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.0.len() != ColonyLevel::ASCENDING.len() {
            return Err(ConfigError::Thresholds(format!(
                "expected {} records, got {}",
                ColonyLevel::ASCENDING.len(),
                self.0.len()
            )));
        }
        let mut previous = 0u8;
        for (record, expected) in self.0.iter().zip(ColonyLevel::ASCENDING) {
            if record.stage != expected {
                return Err(ConfigError::Thresholds(format!(
                    "missing or duplicate record for {}",
                    expected.as_str()
                )));
            }
            if !(1..=MAX_CONTROLLER_LEVEL).contains(&record.controller_level) {
                return Err(ConfigError::Thresholds(format!(
                    "{} controller level {} outside 1..={}",
                    expected.as_str(),
                    record.controller_level,
                    MAX_CONTROLLER_LEVEL
                )));
            }
            if record.controller_level < previous {
                return Err(ConfigError::Thresholds(format!(
                    "{} controller level {} below previous stage ({})",
                    expected.as_str(),
                    record.controller_level,
                    previous
                )));
            }
            previous = record.controller_level;
        }
        Ok(())
    }

    /// Records from the highest stage down
    pub fn descending(&self) -> impl Iterator<Item = &StageThreshold> {
        self.0.iter().rev()
    }

    pub fn get(&self, stage: ColonyLevel) -> Option<&StageThreshold> {
        self.0.iter().find(|r| r.stage == stage)
    }
}
