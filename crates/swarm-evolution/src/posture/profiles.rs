//! Static per-posture lookup tables

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use swarm_common::{ConfigError, Posture};

/// Allowed deviation of a spawn profile's sum from 1.0
pub const PROFILE_SUM_TOLERANCE: f64 = 1e-6;

/// Upper bound for a resource priority
pub const MAX_PRIORITY: f64 = 100.0;

/// Share of spawn capacity per creep family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnProfile {
    pub economy: f64,
    pub military: f64,
    pub utility: f64,
    pub power: f64,
}

impl SpawnProfile {
    pub const fn new(economy: f64, military: f64, utility: f64, power: f64) -> Self {
        Self {
            economy,
            military,
            utility,
            power,
        }
    }

    pub fn sum(&self) -> f64 {
        self.economy + self.military + self.utility + self.power
    }

    fn weights(&self) -> [f64; 4] {
        [self.economy, self.military, self.utility, self.power]
    }
}

/// Independent 0-100 priorities for where energy goes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourcePriorities {
    pub upgrade: f64,
    pub build: f64,
    pub repair: f64,
    pub defense: f64,
    pub logistics: f64,
    pub power: f64,
}

impl ResourcePriorities {
    pub const fn new(
        upgrade: f64,
        build: f64,
        repair: f64,
        defense: f64,
        logistics: f64,
        power: f64,
    ) -> Self {
        Self {
            upgrade,
            build,
            repair,
            defense,
            logistics,
            power,
        }
    }

    fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("upgrade", self.upgrade),
            ("build", self.build),
            ("repair", self.repair),
            ("defense", self.defense),
            ("logistics", self.logistics),
            ("power", self.power),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureProfile {
    pub spawn: SpawnProfile,
    pub priorities: ResourcePriorities,
}

/// Posture-keyed spawn weights and resource priorities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostureProfileTable(HashMap<Posture, PostureProfile>);

impl Default for PostureProfileTable {
    fn default() -> Self {
        let rows = [
            (
                Posture::Eco,
                SpawnProfile::new(0.75, 0.05, 0.15, 0.05),
                ResourcePriorities::new(70.0, 60.0, 40.0, 20.0, 50.0, 30.0),
            ),
            (
                Posture::Expand,
                SpawnProfile::new(0.55, 0.15, 0.25, 0.05),
                ResourcePriorities::new(50.0, 70.0, 30.0, 30.0, 60.0, 20.0),
            ),
            (
                Posture::Defensive,
                SpawnProfile::new(0.45, 0.35, 0.15, 0.05),
                ResourcePriorities::new(30.0, 40.0, 70.0, 80.0, 50.0, 10.0),
            ),
            (
                Posture::War,
                SpawnProfile::new(0.30, 0.50, 0.15, 0.05),
                ResourcePriorities::new(10.0, 30.0, 60.0, 90.0, 60.0, 10.0),
            ),
            (
                Posture::Siege,
                SpawnProfile::new(0.20, 0.60, 0.15, 0.05),
                ResourcePriorities::new(0.0, 10.0, 90.0, 100.0, 70.0, 0.0),
            ),
            (
                Posture::Evacuate,
                SpawnProfile::new(0.10, 0.10, 0.80, 0.00),
                ResourcePriorities::new(0.0, 0.0, 10.0, 30.0, 100.0, 0.0),
            ),
            (
                Posture::NukePrep,
                SpawnProfile::new(0.40, 0.30, 0.25, 0.05),
                ResourcePriorities::new(30.0, 50.0, 60.0, 70.0, 80.0, 40.0),
            ),
        ];
        Self(
            rows.into_iter()
                .map(|(posture, spawn, priorities)| (posture, PostureProfile { spawn, priorities }))
                .collect(),
        )
    }
}

impl PostureProfileTable {
    /// Every posture present, weights non-negative and summing to 1.0,
    /// priorities within 0-100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for posture in Posture::ALL {
            let name = posture.as_str();
            let profile = self.0.get(&posture).ok_or_else(|| ConfigError::Invalid {
                name: "posture_profiles",
                reason: format!("no profile for {name}"),
            })?;

            if let Some(value) = profile.spawn.weights().into_iter().find(|w| *w < 0.0) {
                return Err(ConfigError::NegativeSpawnWeight {
                    posture: name,
                    value,
                });
            }
            let sum = profile.spawn.sum();
            if !((sum - 1.0).abs() <= PROFILE_SUM_TOLERANCE) {
                return Err(ConfigError::SpawnProfileSum { posture: name, sum });
            }

            for (field, value) in profile.priorities.fields() {
                if !(0.0..=MAX_PRIORITY).contains(&value) {
                    return Err(ConfigError::PriorityOutOfRange {
                        posture: name,
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// Profile for `posture`; a validated table always has one
    pub fn get(&self, posture: Posture) -> Option<&PostureProfile> {
        self.0.get(&posture)
    }

    pub fn spawn_profile(&self, posture: Posture) -> Option<SpawnProfile> {
        self.get(posture).map(|p| p.spawn)
    }

    pub fn resource_priorities(&self, posture: Posture) -> Option<ResourcePriorities> {
        self.get(posture).map(|p| p.priorities)
    }

    /// Replace one posture's profile
    pub fn set(&mut self, posture: Posture, profile: PostureProfile) {
        self.0.insert(posture, profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_valid() {
        let table = PostureProfileTable::default();
        assert!(table.validate().is_ok());
        for posture in Posture::ALL {
            assert!(table.get(posture).is_some());
        }
    }

    #[test]
    fn test_eco_weights() {
        let table = PostureProfileTable::default();
        assert_eq!(
            table.spawn_profile(Posture::Eco),
            Some(SpawnProfile::new(0.75, 0.05, 0.15, 0.05))
        );
        assert_eq!(table.spawn_profile(Posture::Evacuate).map(|p| p.power), Some(0.0));
    }

    #[test]
    fn test_bad_sum_rejected() {
        let mut table = PostureProfileTable::default();
        let mut profile = *table.get(Posture::War).unwrap();
        profile.spawn.military = 0.6;
        table.set(Posture::War, profile);
        assert!(matches!(
            table.validate(),
            Err(ConfigError::SpawnProfileSum { posture: "war", .. })
        ));
    }

    #[test]
    fn test_priority_range_checked() {
        let mut table = PostureProfileTable::default();
        let mut profile = *table.get(Posture::Eco).unwrap();
        profile.priorities.repair = 101.0;
        table.set(Posture::Eco, profile);
        assert_eq!(
            table.validate(),
            Err(ConfigError::PriorityOutOfRange {
                posture: "eco",
                field: "repair",
                value: 101.0
            })
        );
    }

    #[test]
    fn test_missing_posture_rejected() {
        let mut table = PostureProfileTable::default();
        table.0.remove(&Posture::NukePrep);
        assert!(matches!(table.validate(), Err(ConfigError::Invalid { .. })));
    }
}
