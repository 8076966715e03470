//! Swarm Simulator Binary
//!
//! Drives a synthetic grid of rooms through the coordinator and prints the
//! final store as JSON.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use prometheus::Registry;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swarm_common::{
    ControllerObservation, EmpireSnapshot, EnergyFlows, HostileSummary, RoomCoord, RoomName,
    RoomSnapshot, SourceObservation, StructureCounts, StructureKind,
};
use swarm_coordinator::{
    InMemorySwarmStore, RoomCoordinator, RoomLimit, SwarmMetrics, SwarmSettings, TickBudget,
    Unlimited, COORDINATOR_VERSION,
};
use swarm_pheromone::RoomEvent;

/// Ticks between controller level gains in the synthetic scenario
const TICKS_PER_LEVEL: u64 = 25;

/// Hostile raid window on the first room
const RAID_START: u64 = 50;
const RAID_END: u64 = 80;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Swarm simulator v{}", COORDINATOR_VERSION);

    let settings = SwarmSettings::load().context("loading settings")?;
    info!("Loaded configuration: {:?}", settings.simulation);

    let registry = Registry::new();
    let metrics = SwarmMetrics::new()?;
    metrics.register(&registry)?;

    let mut coordinator = RoomCoordinator::new(&settings, InMemorySwarmStore::new())?
        .with_telemetry(metrics.clone());

    let rooms = grid(settings.simulation.grid_size)?;
    let mut budget: Box<dyn TickBudget> = match settings.simulation.room_limit {
        0 => Box::new(Unlimited),
        n => Box::new(RoomLimit(n)),
    };
    let overrides = BTreeMap::new();

    for tick in 0..settings.simulation.ticks {
        let empire = EmpireSnapshot {
            gcl: 1 + (tick / (TICKS_PER_LEVEL * 4)) as u32,
            owned_rooms: rooms.len() as u32,
        };
        let snapshots: Vec<_> = rooms
            .iter()
            .enumerate()
            .map(|(i, name)| synthetic_snapshot(name, i, tick))
            .collect();

        if let Some(first) = rooms.first() {
            if tick == RAID_START + 10 {
                coordinator.apply_event(
                    first,
                    tick,
                    RoomEvent::StructureDestroyed {
                        structure: StructureKind::Tower,
                    },
                );
            }
        }

        let report = coordinator.run_tick(tick, &empire, &snapshots, &overrides, budget.as_mut());
        for (room, change) in &report.posture_changes {
            info!(tick, %room, from = %change.from, to = %change.to, "posture");
        }
        for (room, change) in &report.level_changes {
            info!(tick, %room, from = %change.from, to = %change.to, "level");
        }
    }

    info!(
        processed = metrics.rooms_processed.get(),
        deferred = metrics.rooms_deferred.get(),
        posture_changes = metrics.posture_changes.get(),
        level_changes = metrics.level_changes.get(),
        diffusion_edges = metrics.diffusion_edges.get(),
        "Simulation finished"
    );

    println!("{}", coordinator.store().to_json()?);
    Ok(())
}

/// `size` x `size` square of rooms starting at W1N1
fn grid(size: u32) -> Result<Vec<RoomName>> {
    let origin = RoomName::parse("W1N1")?.coord();
    let mut rooms = Vec::with_capacity((size * size) as usize);
    for dy in 0..size as i32 {
        for dx in 0..size as i32 {
            rooms.push(RoomName::from_coord(RoomCoord::new(origin.x + dx, origin.y + dy))?);
        }
    }
    Ok(rooms)
}

/// Deterministic observations: steady growth, with a raid on room 0
fn synthetic_snapshot(name: &RoomName, index: usize, tick: u64) -> RoomSnapshot {
    let level = (1 + tick / TICKS_PER_LEVEL).min(8) as u8;
    let progress_total = if level == 8 { 0 } else { 1_000 * level as u64 };
    let progress = (tick % TICKS_PER_LEVEL) * progress_total / TICKS_PER_LEVEL;

    let mut structures = StructureCounts::new()
        .with(StructureKind::Spawn, 1)
        .with(StructureKind::Extension, 5 * level.saturating_sub(1) as u32);
    if level >= 3 {
        structures.set(StructureKind::Tower, 1);
    }
    if level >= 4 {
        structures.set(StructureKind::Storage, 1);
    }
    if level >= 6 {
        structures.set(StructureKind::Lab, (level as u32 - 5) * 2);
    }

    let raided = index == 0 && (RAID_START..RAID_END).contains(&tick);
    let hostiles = if raided {
        HostileSummary {
            count: 2 + ((tick - RAID_START) / 5) as u32,
            attack_parts: 10,
            ranged_attack_parts: 5,
            heal_parts: 5,
            ..Default::default()
        }
    } else {
        HostileSummary::default()
    };

    let energy_capacity = 300 + 50 * structures.count(StructureKind::Extension);
    let harvested = 10.0 + index as f64;
    RoomSnapshot {
        name: name.clone(),
        sources: vec![
            SourceObservation {
                energy: 3_000 - ((tick * 10) % 3_000) as u32,
                capacity: 3_000,
            };
            2
        ],
        hostiles,
        construction_sites: (level as u32 * 2).saturating_sub((tick % TICKS_PER_LEVEL) as u32 / 3),
        controller: Some(ControllerObservation {
            level,
            progress,
            progress_total,
        }),
        energy_available: (100 + (tick % 7) as u32 * 50).min(energy_capacity),
        energy_capacity,
        storage_energy: structures.has(StructureKind::Storage).then_some(10_000),
        structures,
        flows: EnergyFlows {
            harvested,
            spawning: harvested * 0.4,
            construction: 2.0,
            repair: if raided { 3.0 } else { 0.5 },
            tower: if raided { 5.0 } else { 0.0 },
        },
        idle_workers: (tick % 3) as u32,
    }
}
