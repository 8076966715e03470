//! Periodic path: gated decay followed by observation-driven contribution
//!
//! ```text
//! harvest   += (avg_source_energy / 3000) * 10
//! build     += min(sites * 2, 20)
//! upgrade   += (1 - fraction) * 15          when fraction < 0.5
//! defense   += rolling_hostiles * 10
//! war       += danger * 10                  when danger >= 2
//! siege     += 20                           when danger >= 3
//! logistics += 10                           when spawn energy < 50%
//! expand    += min(balance / 100, 10)       when danger == 0, balance > 0
//! ```

use swarm_common::{MetricsSnapshot, PheromoneKind, PheromoneVector, RoomSnapshot, SwarmState};
use tracing::trace;

use super::PheromoneEngine;

/// Source energy that yields the full harvest weight
pub const HARVEST_REFERENCE_ENERGY: f64 = 3000.0;
pub const HARVEST_WEIGHT: f64 = 10.0;
pub const BUILD_PER_SITE: f64 = 2.0;
pub const BUILD_CAP: f64 = 20.0;
pub const UPGRADE_WEIGHT: f64 = 15.0;
/// Controller progress fraction below which upgrading is reinforced
pub const UPGRADE_THRESHOLD: f64 = 0.5;
pub const DEFENSE_PER_HOSTILE: f64 = 10.0;
pub const WAR_PER_DANGER: f64 = 10.0;
pub const SIEGE_BONUS: f64 = 20.0;
pub const LOGISTICS_BONUS: f64 = 10.0;
/// Spawn fill fraction below which logistics is reinforced
pub const LOGISTICS_FILL_THRESHOLD: f64 = 0.5;
pub const EXPAND_DIVISOR: f64 = 100.0;
pub const EXPAND_CAP: f64 = 10.0;

/// Signal additions derived from one room's current observations.
///
/// Pure: reads only its arguments. Terms whose inputs are unavailable
/// (no sources, no controller, zero spawn capacity) are simply absent.
pub fn contributions(
    snapshot: &RoomSnapshot,
    metrics: &MetricsSnapshot,
    danger: u8,
) -> Vec<(PheromoneKind, f64)> {
    let mut out = Vec::with_capacity(8);

    let avg_energy = snapshot.avg_source_energy();
    if avg_energy > 0.0 {
        out.push((
            PheromoneKind::Harvest,
            (avg_energy / HARVEST_REFERENCE_ENERGY) * HARVEST_WEIGHT,
        ));
    }

    if snapshot.construction_sites > 0 {
        out.push((
            PheromoneKind::Build,
            (snapshot.construction_sites as f64 * BUILD_PER_SITE).min(BUILD_CAP),
        ));
    }

    if let Some(fraction) = snapshot.controller.and_then(|c| c.progress_fraction()) {
        if fraction < UPGRADE_THRESHOLD {
            out.push((PheromoneKind::Upgrade, (1.0 - fraction) * UPGRADE_WEIGHT));
        }
    }

    if metrics.hostile_count > 0.0 {
        out.push((
            PheromoneKind::Defense,
            metrics.hostile_count * DEFENSE_PER_HOSTILE,
        ));
    }

    if danger >= 2 {
        out.push((PheromoneKind::War, danger as f64 * WAR_PER_DANGER));
    }
    if danger >= 3 {
        out.push((PheromoneKind::Siege, SIEGE_BONUS));
    }

    if snapshot.energy_capacity > 0 {
        let fill = snapshot.energy_available as f64 / snapshot.energy_capacity as f64;
        if fill < LOGISTICS_FILL_THRESHOLD {
            out.push((PheromoneKind::Logistics, LOGISTICS_BONUS));
        }
    }

    let balance = metrics.energy_balance();
    if danger == 0 && balance > 0.0 {
        out.push((
            PheromoneKind::Expand,
            (balance / EXPAND_DIVISOR).min(EXPAND_CAP),
        ));
    }

    out
}

impl PheromoneEngine {
    /// Whether the room's periodic update gate is open at `tick`
    #[inline]
    pub fn is_due(&self, state: &SwarmState, tick: u64) -> bool {
        tick >= state.next_update_tick
    }

    /// Multiply every signal by its decay factor, clamping each
    pub fn decay(&self, pheromones: &mut PheromoneVector) {
        for kind in PheromoneKind::ALL {
            pheromones.scale(kind, self.config.decay_factors.get(kind));
        }
    }

    /// Run the gated periodic update. Returns `false` when the gate was
    /// closed and nothing changed.
    ///
    /// Expects `state.metrics` and `state.danger` to already reflect this
    /// tick.
    pub fn update_periodic(&self, state: &mut SwarmState, snapshot: &RoomSnapshot, tick: u64) -> bool {
        if !self.is_due(state, tick) {
            trace!(room = %snapshot.name, tick, next = state.next_update_tick, "Pheromone update gated");
            return false;
        }

        self.decay(&mut state.pheromones);
        for (kind, amount) in contributions(snapshot, &state.metrics, state.danger) {
            state.pheromones.add(kind, amount);
        }

        state.last_update_tick = tick;
        state.next_update_tick = tick + self.config.update_interval;
        trace!(room = %snapshot.name, tick, pheromones = ?state.pheromones, "Pheromones updated");
        true
    }
}
