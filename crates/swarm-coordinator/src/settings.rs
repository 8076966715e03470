//! Coordinator settings
//!
//! Layered: built-in defaults, then an optional `swarm.toml`, then
//! `SWARM__<SECTION>__<KEY>` environment variables (after `.env` is read).
//! Only scalar knobs are overridable from outside; the stage and posture
//! tables are set in code.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use swarm_evolution::EvolutionConfig;
use swarm_pheromone::{MetricsConfig, PheromoneConfig};
use thiserror::Error;
use tracing::debug;

use crate::danger::DangerThresholds;

/// Settings file looked up in the working directory (extension optional)
pub const SETTINGS_FILE: &str = "swarm";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "SWARM";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Source(#[from] config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] swarm_common::ConfigError),
}

/// Simulator driver knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Ticks to simulate
    pub ticks: u64,
    /// Rooms per side of the simulated square
    pub grid_size: u32,
    /// Rooms processed per tick; 0 means unlimited
    pub room_limit: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            ticks: 200,
            grid_size: 3,
            room_limit: 0,
        }
    }
}

/// Full coordinator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmSettings {
    pub pheromone: PheromoneConfig,
    pub metrics: MetricsConfig,
    pub evolution: EvolutionConfig,
    pub danger: DangerThresholds,
    pub simulation: SimulationSettings,
}

impl SwarmSettings {
    /// Load from `.env`, `swarm.toml` and the environment, then validate
    pub fn load() -> Result<Self, SettingsError> {
        let _ = dotenvy::dotenv();

        let cfg = config::Config::builder()
            .add_source(config::File::with_name(SETTINGS_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::from_config(&cfg)
    }

    /// Apply overrides found in `cfg` on top of the defaults, then validate
    pub fn from_config(cfg: &config::Config) -> Result<Self, SettingsError> {
        let mut s = Self::default();

        override_value(cfg, "pheromone.update_interval", &mut s.pheromone.update_interval)?;
        override_value(cfg, "pheromone.diffusion_interval", &mut s.pheromone.diffusion_interval)?;
        override_value(cfg, "pheromone.dedup_events", &mut s.pheromone.dedup_events)?;
        override_value(
            cfg,
            "pheromone.structure_alert_ticks",
            &mut s.pheromone.structure_alert_ticks,
        )?;
        override_value(cfg, "pheromone.nuke_alert_ticks", &mut s.pheromone.nuke_alert_ticks)?;

        override_value(cfg, "metrics.max_progress_delta", &mut s.metrics.max_progress_delta)?;

        override_value(cfg, "evolution.hysteresis_ticks", &mut s.evolution.hysteresis_ticks)?;
        let thresholds = &mut s.evolution.posture_thresholds;
        override_value(cfg, "posture.siege", &mut thresholds.siege)?;
        override_value(cfg, "posture.war", &mut thresholds.war)?;
        override_value(cfg, "posture.defense", &mut thresholds.defense)?;
        override_value(cfg, "posture.nuke_target", &mut thresholds.nuke_target)?;
        override_value(cfg, "posture.expand", &mut thresholds.expand)?;

        override_value(cfg, "danger.elevated_count", &mut s.danger.elevated_count)?;
        override_value(cfg, "danger.elevated_damage", &mut s.danger.elevated_damage)?;
        override_value(cfg, "danger.critical_count", &mut s.danger.critical_count)?;
        override_value(cfg, "danger.critical_damage", &mut s.danger.critical_damage)?;

        override_value(cfg, "simulation.ticks", &mut s.simulation.ticks)?;
        override_value(cfg, "simulation.grid_size", &mut s.simulation.grid_size)?;
        override_value(cfg, "simulation.room_limit", &mut s.simulation.room_limit)?;

        s.validate()?;
        Ok(s)
    }

    pub fn validate(&self) -> Result<(), swarm_common::ConfigError> {
        self.pheromone.validate()?;
        self.metrics.validate()?;
        self.evolution.validate()?;
        self.danger.validate()?;
        if self.simulation.grid_size == 0 {
            return Err(swarm_common::ConfigError::Invalid {
                name: "simulation.grid_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn override_value<T>(cfg: &config::Config, key: &str, slot: &mut T) -> Result<(), config::ConfigError>
where
    T: DeserializeOwned + std::fmt::Debug,
{
    match cfg.get::<T>(key) {
        Ok(value) => {
            debug!(key, ?value, "Setting overridden");
            *slot = value;
            Ok(())
        }
        Err(config::ConfigError::NotFound(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_toml(toml: &str) -> Result<SwarmSettings, SettingsError> {
        let cfg = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();
        SwarmSettings::from_config(&cfg)
    }

    #[test]
    fn test_empty_source_gives_defaults() {
        assert_eq!(from_toml("").unwrap(), SwarmSettings::default());
    }

    #[test]
    fn test_scalar_overrides() {
        let settings = from_toml(
            r#"
            [pheromone]
            update_interval = 10
            dedup_events = false

            [evolution]
            hysteresis_ticks = 50

            [posture]
            war = 40.0

            [simulation]
            ticks = 12
            "#,
        )
        .unwrap();
        assert_eq!(settings.pheromone.update_interval, 10);
        assert!(!settings.pheromone.dedup_events);
        assert_eq!(settings.evolution.hysteresis_ticks, 50);
        assert_eq!(settings.evolution.posture_thresholds.war, 40.0);
        assert_eq!(settings.simulation.ticks, 12);
        assert_eq!(settings.pheromone.diffusion_interval, 5);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = from_toml("[pheromone]\nupdate_interval = 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = from_toml("[simulation]\nticks = \"many\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::Source(_)));
    }
}
