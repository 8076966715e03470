//! Per-room bundle of rolling metrics

use serde::{Deserialize, Serialize};
use swarm_common::{MetricsSnapshot, RoomSnapshot};
use tracing::debug;

use super::rolling::RollingAverage;
use crate::config::MetricsConfig;

/// Window for energy and controller streams
pub const ECONOMY_WINDOW: usize = 10;

/// Window for threat and workforce streams
pub const THREAT_WINDOW: usize = 5;

/// Smoothed view of one room's recent activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsTracker {
    energy_harvested: RollingAverage,
    energy_spawning: RollingAverage,
    energy_construction: RollingAverage,
    energy_repair: RollingAverage,
    energy_tower: RollingAverage,
    controller_progress: RollingAverage,
    hostile_count: RollingAverage,
    damage_potential: RollingAverage,
    idle_workers: RollingAverage,
    /// Controller progress seen on the previous observation
    last_controller_progress: Option<u64>,
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            energy_harvested: RollingAverage::new(ECONOMY_WINDOW),
            energy_spawning: RollingAverage::new(ECONOMY_WINDOW),
            energy_construction: RollingAverage::new(ECONOMY_WINDOW),
            energy_repair: RollingAverage::new(ECONOMY_WINDOW),
            energy_tower: RollingAverage::new(ECONOMY_WINDOW),
            controller_progress: RollingAverage::new(ECONOMY_WINDOW),
            hostile_count: RollingAverage::new(THREAT_WINDOW),
            damage_potential: RollingAverage::new(THREAT_WINDOW),
            idle_workers: RollingAverage::new(THREAT_WINDOW),
            last_controller_progress: None,
        }
    }

    /// Feed one tick of observations and return the updated means
    pub fn update(&mut self, snapshot: &RoomSnapshot, config: &MetricsConfig) -> MetricsSnapshot {
        let flows = &snapshot.flows;
        self.energy_harvested.add(flows.harvested);
        self.energy_spawning.add(flows.spawning);
        self.energy_construction.add(flows.construction);
        self.energy_repair.add(flows.repair);
        self.energy_tower.add(flows.tower);
        self.hostile_count.add(snapshot.hostiles.count as f64);
        self.damage_potential.add(snapshot.hostiles.potential_damage());
        self.idle_workers.add(snapshot.idle_workers as f64);

        if let Some(controller) = snapshot.controller {
            if let Some(delta) = self.progress_delta(controller.progress, config) {
                self.controller_progress.add(delta);
            }
            self.last_controller_progress = Some(controller.progress);
        }

        self.snapshot()
    }

    /// Delta against the baseline, or `None` when there is no baseline or
    /// the delta is negative (level-up reset) or implausibly large.
    fn progress_delta(&self, progress: u64, config: &MetricsConfig) -> Option<f64> {
        let last = self.last_controller_progress?;
        let delta = progress as f64 - last as f64;
        if delta < 0.0 || delta > config.max_progress_delta {
            debug!(delta, "Discarding controller progress delta");
            return None;
        }
        Some(delta)
    }

    /// Current means without feeding a sample
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            energy_harvested: self.energy_harvested.mean(),
            energy_spawning: self.energy_spawning.mean(),
            energy_construction: self.energy_construction.mean(),
            energy_repair: self.energy_repair.mean(),
            energy_tower: self.energy_tower.mean(),
            controller_progress: self.controller_progress.mean(),
            hostile_count: self.hostile_count.mean(),
            damage_potential: self.damage_potential.mean(),
            idle_workers: self.idle_workers.mean(),
        }
    }

    pub fn last_controller_progress(&self) -> Option<u64> {
        self.last_controller_progress
    }
}
