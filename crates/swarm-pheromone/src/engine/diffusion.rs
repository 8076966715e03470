//! Inter-room diffusion
//!
//! Two phases so the result does not depend on room iteration order:
//! [`PheromoneEngine::plan_diffusion`] reads every source value and emits
//! edges, then [`apply_diffusion`] sums the deltas per target and adds them.
//! Sources are not reduced; diffusion only spreads awareness outward.

use std::collections::BTreeMap;

use swarm_common::{PheromoneKind, PheromoneVector, RoomName};
use tracing::debug;

use super::PheromoneEngine;

/// Fraction of `value * rate` delivered to each neighbor
pub const NEIGHBOR_SHARE: f64 = 0.5;

/// One planned transfer of a signal into a neighboring room
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionEdge<'a> {
    pub source: &'a RoomName,
    pub target: &'a RoomName,
    pub kind: PheromoneKind,
    pub amount: f64,
}

impl PheromoneEngine {
    /// Compute every transfer for the current values. Only neighbors present
    /// in `rooms` receive anything; zero-valued sources emit nothing.
    pub fn plan_diffusion<'a>(
        &self,
        rooms: &'a BTreeMap<RoomName, PheromoneVector>,
    ) -> Vec<DiffusionEdge<'a>> {
        let mut edges = Vec::new();
        for (source, pheromones) in rooms {
            for kind in PheromoneKind::DIFFUSIBLE {
                let amount =
                    pheromones.get(kind) * self.config.diffusion_rates.get(kind) * NEIGHBOR_SHARE;
                if amount <= 0.0 {
                    continue;
                }
                for neighbor in source.neighbors() {
                    if let Some((target, _)) = rooms.get_key_value(&neighbor) {
                        edges.push(DiffusionEdge {
                            source,
                            target,
                            kind,
                            amount,
                        });
                    }
                }
            }
        }
        edges
    }

    /// Plan and apply one diffusion pass. Returns the number of edges.
    pub fn diffuse(&self, rooms: &mut BTreeMap<RoomName, PheromoneVector>) -> usize {
        let deltas = {
            let edges = self.plan_diffusion(rooms);
            let count = edges.len();
            let deltas = aggregate(&edges);
            debug!(edges = count, targets = deltas.len(), "Diffusion planned");
            deltas
        };
        let edge_count = deltas.values().map(|d| d.edges).sum();
        apply_deltas(rooms, deltas);
        edge_count
    }
}

/// Summed incoming amounts for one target room
#[derive(Debug, Default)]
struct TargetDelta {
    incoming: PheromoneVector,
    edges: usize,
}

fn aggregate(edges: &[DiffusionEdge<'_>]) -> BTreeMap<RoomName, TargetDelta> {
    let mut deltas: BTreeMap<RoomName, TargetDelta> = BTreeMap::new();
    for edge in edges {
        let entry = deltas.entry(edge.target.clone()).or_default();
        // raw sum; clamping happens once on apply
        let summed = entry.incoming.get(edge.kind) + edge.amount;
        entry.incoming = entry.incoming.with(edge.kind, summed);
        entry.edges += 1;
    }
    deltas
}

fn apply_deltas(
    rooms: &mut BTreeMap<RoomName, PheromoneVector>,
    deltas: BTreeMap<RoomName, TargetDelta>,
) {
    for (target, delta) in deltas {
        if let Some(pheromones) = rooms.get_mut(&target) {
            for kind in PheromoneKind::DIFFUSIBLE {
                let amount = delta.incoming.get(kind);
                if amount > 0.0 {
                    pheromones.add(kind, amount);
                }
            }
        }
    }
}

/// Apply precomputed edges to `rooms`. Edges must have been planned against
/// a snapshot of the same rooms; this function never reads source values.
pub fn apply_diffusion(
    rooms: &mut BTreeMap<RoomName, PheromoneVector>,
    edges: &[DiffusionEdge<'_>],
) {
    apply_deltas(rooms, aggregate(edges));
}
