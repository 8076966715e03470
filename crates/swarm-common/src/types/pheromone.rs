//! PheromoneVector - the nine bounded signals a room carries
//!
//! Every signal lives in `[MIN_PHEROMONE, MAX_PHEROMONE]`. All mutation goes
//! through [`PheromoneVector::set`] / [`PheromoneVector::add`], which clamp,
//! so the bound holds after every single write.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound of every pheromone signal
pub const MAX_PHEROMONE: f64 = 100.0;

/// Lower bound of every pheromone signal
pub const MIN_PHEROMONE: f64 = 0.0;

/// Named pheromone signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PheromoneKind {
    Expand,
    Harvest,
    Build,
    Upgrade,
    Defense,
    War,
    Siege,
    Logistics,
    NukeTarget,
}

impl PheromoneKind {
    /// All signals, in canonical order
    pub const ALL: [PheromoneKind; 9] = [
        PheromoneKind::Expand,
        PheromoneKind::Harvest,
        PheromoneKind::Build,
        PheromoneKind::Upgrade,
        PheromoneKind::Defense,
        PheromoneKind::War,
        PheromoneKind::Siege,
        PheromoneKind::Logistics,
        PheromoneKind::NukeTarget,
    ];

    /// Signals that leak into neighboring rooms
    pub const DIFFUSIBLE: [PheromoneKind; 4] = [
        PheromoneKind::Defense,
        PheromoneKind::War,
        PheromoneKind::Expand,
        PheromoneKind::Siege,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PheromoneKind::Expand => "expand",
            PheromoneKind::Harvest => "harvest",
            PheromoneKind::Build => "build",
            PheromoneKind::Upgrade => "upgrade",
            PheromoneKind::Defense => "defense",
            PheromoneKind::War => "war",
            PheromoneKind::Siege => "siege",
            PheromoneKind::Logistics => "logistics",
            PheromoneKind::NukeTarget => "nukeTarget",
        }
    }
}

impl fmt::Display for PheromoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per [`PheromoneKind`].
///
/// Also reused as a per-signal rate table (decay factors, diffusion rates),
/// where the clamping helpers are simply not used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PheromoneVector {
    pub expand: f64,
    pub harvest: f64,
    pub build: f64,
    pub upgrade: f64,
    pub defense: f64,
    pub war: f64,
    pub siege: f64,
    pub logistics: f64,
    pub nuke_target: f64,
}

impl PheromoneVector {
    /// Vector with every signal at `value`
    pub fn splat(value: f64) -> Self {
        Self {
            expand: value,
            harvest: value,
            build: value,
            upgrade: value,
            defense: value,
            war: value,
            siege: value,
            logistics: value,
            nuke_target: value,
        }
    }

    #[inline]
    pub fn get(&self, kind: PheromoneKind) -> f64 {
        match kind {
            PheromoneKind::Expand => self.expand,
            PheromoneKind::Harvest => self.harvest,
            PheromoneKind::Build => self.build,
            PheromoneKind::Upgrade => self.upgrade,
            PheromoneKind::Defense => self.defense,
            PheromoneKind::War => self.war,
            PheromoneKind::Siege => self.siege,
            PheromoneKind::Logistics => self.logistics,
            PheromoneKind::NukeTarget => self.nuke_target,
        }
    }

    fn slot_mut(&mut self, kind: PheromoneKind) -> &mut f64 {
        match kind {
            PheromoneKind::Expand => &mut self.expand,
            PheromoneKind::Harvest => &mut self.harvest,
            PheromoneKind::Build => &mut self.build,
            PheromoneKind::Upgrade => &mut self.upgrade,
            PheromoneKind::Defense => &mut self.defense,
            PheromoneKind::War => &mut self.war,
            PheromoneKind::Siege => &mut self.siege,
            PheromoneKind::Logistics => &mut self.logistics,
            PheromoneKind::NukeTarget => &mut self.nuke_target,
        }
    }

    /// Set a signal, clamped into range. Non-finite values collapse to the
    /// lower bound.
    pub fn set(&mut self, kind: PheromoneKind, value: f64) {
        *self.slot_mut(kind) = clamp_signal(value);
    }

    /// Add `amount` (may be negative) to a signal and clamp.
    pub fn add(&mut self, kind: PheromoneKind, amount: f64) {
        let current = self.get(kind);
        self.set(kind, current + amount);
    }

    /// Multiply a signal by `factor` and clamp.
    pub fn scale(&mut self, kind: PheromoneKind, factor: f64) {
        let current = self.get(kind);
        self.set(kind, current * factor);
    }

    /// Set a raw value without clamping (rate tables only)
    pub fn with(mut self, kind: PheromoneKind, value: f64) -> Self {
        *self.slot_mut(kind) = value;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (PheromoneKind, f64)> + '_ {
        PheromoneKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// Whether every signal lies in `[MIN_PHEROMONE, MAX_PHEROMONE]`
    pub fn is_bounded(&self) -> bool {
        self.iter()
            .all(|(_, v)| v.is_finite() && (MIN_PHEROMONE..=MAX_PHEROMONE).contains(&v))
    }
}

/// Clamp a signal value into `[MIN_PHEROMONE, MAX_PHEROMONE]`
#[inline]
pub fn clamp_signal(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_PHEROMONE;
    }
    value.clamp(MIN_PHEROMONE, MAX_PHEROMONE)
}
