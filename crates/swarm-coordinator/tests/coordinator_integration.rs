//! Integration Tests for the Swarm coordinator
//!
//! This module drives full ticks through the public API:
//! - Quiescent decay, hostile escalation and diffusion scenarios
//! - Evolution gating and hysteresis
//! - Event deduplication and danger floors
//! - Budget deferral and order independence

use std::collections::BTreeMap;

use swarm_common::{
    ColonyLevel, ControllerObservation, EmpireSnapshot, HostileSummary, PheromoneKind,
    PheromoneVector, Posture, RoomName, RoomSnapshot, StructureCounts, StructureKind, SwarmState,
};
use swarm_coordinator::{
    InMemorySwarmStore, RoomCoordinator, RoomLimit, SwarmMetrics, SwarmSettings, SwarmStore,
    Unlimited,
};
use swarm_pheromone::{EventOutcome, PheromoneConfig, RoomEvent};

/// Test harness wrapping a coordinator over an in-memory store
pub struct TestHarness {
    coordinator: RoomCoordinator<InMemorySwarmStore>,
    empire: EmpireSnapshot,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_settings(SwarmSettings::default(), InMemorySwarmStore::new())
    }

    pub fn with_settings(settings: SwarmSettings, store: InMemorySwarmStore) -> Self {
        Self {
            coordinator: RoomCoordinator::new(&settings, store).unwrap(),
            empire: EmpireSnapshot {
                gcl: 1,
                owned_rooms: 1,
            },
        }
    }

    pub fn tick(&mut self, tick: u64, rooms: &[RoomSnapshot]) -> swarm_coordinator::TickReport {
        self.coordinator
            .run_tick(tick, &self.empire, rooms, &BTreeMap::new(), &mut Unlimited)
    }

    pub fn state(&self, name: &str) -> &SwarmState {
        self.coordinator.state(&room(name)).unwrap()
    }
}

fn room(name: &str) -> RoomName {
    RoomName::parse(name).unwrap()
}

fn quiet(name: &str) -> RoomSnapshot {
    RoomSnapshot::empty(room(name))
}

fn with_hostiles(name: &str, count: u32) -> RoomSnapshot {
    let mut snap = quiet(name);
    snap.hostiles = HostileSummary {
        count,
        ..Default::default()
    };
    snap
}

fn with_controller(name: &str, level: u8, structures: StructureCounts) -> RoomSnapshot {
    let mut snap = quiet(name);
    snap.controller = Some(ControllerObservation {
        level,
        progress: 0,
        progress_total: 10_000,
    });
    snap.structures = structures;
    snap
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    /// Quiescent room: decay only, posture stays eco
    #[test]
    fn test_quiescent_room_decays() {
        let mut store = InMemorySwarmStore::new();
        let mut seeded = SwarmState::new();
        seeded.pheromones = PheromoneVector::splat(10.0);
        store.put(room("W1N1"), seeded);

        let mut harness = TestHarness::with_settings(SwarmSettings::default(), store);
        harness.tick(1, &[quiet("W1N1")]);

        let state = harness.state("W1N1");
        let decay = PheromoneConfig::default().decay_factors;
        for kind in PheromoneKind::ALL {
            assert_eq!(state.pheromones.get(kind), 10.0 * decay.get(kind));
        }
        assert_eq!(state.posture, Posture::Eco);
        assert_eq!(state.danger, 0);
    }

    /// Hostiles 0 -> 12 escalates to siege within the tick
    #[test]
    fn test_hostile_escalation_to_siege() {
        let mut harness = TestHarness::new();
        harness.tick(0, &[quiet("E2S2")]);
        assert_eq!(harness.state("E2S2").posture, Posture::Eco);

        let report = harness.tick(1, &[with_hostiles("E2S2", 12)]);
        let state = harness.state("E2S2");
        assert_eq!(state.danger, 3);
        assert_eq!(state.posture, Posture::Siege);
        assert_eq!(report.posture_changes.len(), 1);
    }

    /// War signal spreads to the neighbor, source unchanged
    #[test]
    fn test_diffusion_between_neighbors() {
        let mut store = InMemorySwarmStore::new();
        let mut a = SwarmState::new();
        a.pheromones.set(PheromoneKind::War, 80.0);
        // hold the periodic gate closed so only diffusion runs
        a.next_update_tick = 1_000;
        let mut b = SwarmState::new();
        b.next_update_tick = 1_000;
        store.put(room("W1N1"), a);
        store.put(room("W2N1"), b);

        let mut harness = TestHarness::with_settings(SwarmSettings::default(), store);
        let report = harness.tick(5, &[quiet("W1N1"), quiet("W2N1")]);

        assert!(report.diffused);
        assert_eq!(report.diffusion_edges, 1);
        assert_eq!(harness.state("W1N1").pheromones.war, 80.0);
        assert_eq!(harness.state("W2N1").pheromones.war, 20.0);
    }

    /// No diffusion off schedule
    #[test]
    fn test_diffusion_respects_interval() {
        let mut harness = TestHarness::new();
        let report = harness.tick(3, &[quiet("W1N1"), quiet("W2N1")]);
        assert!(!report.diffused);
    }
}

#[cfg(test)]
mod evolution_tests {
    use super::*;

    #[test]
    fn test_rcl6_without_labs_not_economic_maturity() {
        let mut harness = TestHarness::new();
        let structures = StructureCounts::new().with(StructureKind::Storage, 1);
        harness.tick(0, &[with_controller("W4N4", 6, structures)]);
        assert!(harness.state("W4N4").colony_level <= ColonyLevel::EarlyExpansion);
    }

    #[test]
    fn test_rcl8_two_labs_economic_maturity() {
        let mut harness = TestHarness::new();
        let structures = StructureCounts::new()
            .with(StructureKind::Storage, 1)
            .with(StructureKind::Lab, 2);
        let report = harness.tick(0, &[with_controller("W4N4", 8, structures)]);
        assert_eq!(harness.state("W4N4").colony_level, ColonyLevel::EconomicMaturity);
        assert_eq!(report.level_changes.len(), 1);
    }

    #[test]
    fn test_missing_structures_published() {
        let mut harness = TestHarness::new();
        let structures = StructureCounts::new().with(StructureKind::Spawn, 1);
        harness.tick(0, &[with_controller("W4N4", 3, structures)]);
        let missing = harness.state("W4N4").missing_structures;
        assert!(!missing.spawn);
        assert!(missing.extension);
        assert!(missing.tower);
        assert!(!missing.storage);
    }

    #[test]
    fn test_hysteresis_delays_stage_change() {
        let mut settings = SwarmSettings::default();
        settings.evolution.hysteresis_ticks = 10;
        let mut harness = TestHarness::with_settings(settings, InMemorySwarmStore::new());
        let snap = with_controller("E1N1", 3, StructureCounts::new());

        for tick in 0..10 {
            harness.tick(tick, &[snap.clone()]);
            assert_eq!(harness.state("E1N1").colony_level, ColonyLevel::Seed, "tick {tick}");
        }
        harness.tick(10, &[snap]);
        assert_eq!(harness.state("E1N1").colony_level, ColonyLevel::EarlyExpansion);
    }
}

#[cfg(test)]
mod event_tests {
    use super::*;

    #[test]
    fn test_duplicate_event_dropped_within_tick() {
        let mut harness = TestHarness::new();
        let target = room("W9S9");
        let event = RoomEvent::HostilesDetected { count: 2, danger: 1 };

        assert_eq!(harness.coordinator.apply_event(&target, 4, event), EventOutcome::Applied);
        assert_eq!(harness.coordinator.apply_event(&target, 4, event), EventOutcome::Duplicate);
        assert_eq!(harness.state("W9S9").pheromones.defense, 10.0);

        assert_eq!(harness.coordinator.apply_event(&target, 5, event), EventOutcome::Applied);
        assert_eq!(harness.state("W9S9").pheromones.defense, 20.0);
    }

    #[test]
    fn test_structure_loss_floor_expires() {
        let mut harness = TestHarness::new();
        let target = room("E5N5");
        harness.coordinator.apply_event(
            &target,
            0,
            RoomEvent::StructureDestroyed {
                structure: StructureKind::Spawn,
            },
        );

        harness.tick(50, &[quiet("E5N5")]);
        assert_eq!(harness.state("E5N5").danger, 1);
        assert_eq!(harness.state("E5N5").posture, Posture::Defensive);

        harness.tick(100, &[quiet("E5N5")]);
        assert_eq!(harness.state("E5N5").danger, 0);
        assert_eq!(harness.state("E5N5").posture, Posture::Eco);
    }

    #[test]
    fn test_nuke_holds_siege() {
        let mut harness = TestHarness::new();
        harness
            .coordinator
            .apply_event(&room("W1S1"), 10, RoomEvent::NukeDetected);
        for tick in 11..20 {
            harness.tick(tick, &[quiet("W1S1")]);
        }
        assert_eq!(harness.state("W1S1").danger, 3);
        assert_eq!(harness.state("W1S1").posture, Posture::Siege);
    }

    #[test]
    fn test_nuke_target_marking_drives_nuke_prep() {
        let mut harness = TestHarness::new();
        harness
            .coordinator
            .apply_event(&room("W1S1"), 0, RoomEvent::NukeTargetMarked { weight: 60.0 });
        harness.tick(1, &[quiet("W1S1")]);
        assert_eq!(harness.state("W1S1").posture, Posture::NukePrep);
    }
}

#[cfg(test)]
mod scheduling_tests {
    use super::*;
    use prometheus::Registry;

    fn grid() -> Vec<RoomSnapshot> {
        let mut rooms = Vec::new();
        for (i, name) in ["W1N1", "W2N1", "W1N2", "W2N2"].iter().enumerate() {
            let mut snap = with_hostiles(name, i as u32);
            snap.construction_sites = i as u32 * 3;
            rooms.push(snap);
        }
        rooms
    }

    #[test]
    fn test_processing_order_does_not_matter() {
        let forward = grid();
        let mut backward = grid();
        backward.reverse();

        let mut a = TestHarness::new();
        let mut b = TestHarness::new();
        for tick in 0..20 {
            a.tick(tick, &forward);
            b.tick(tick, &backward);
        }
        assert_eq!(a.coordinator.store(), b.coordinator.store());
    }

    #[test]
    fn test_deferred_rooms_run_first() {
        let mut harness = TestHarness::new();
        let rooms = grid();
        let empire = EmpireSnapshot::default();

        let first = harness
            .coordinator
            .run_tick(0, &empire, &rooms, &BTreeMap::new(), &mut RoomLimit(3));
        assert_eq!(first.deferred, vec![room("W2N2")]);
        assert!(harness.coordinator.state(&room("W2N2")).is_none());

        let second = harness
            .coordinator
            .run_tick(1, &empire, &rooms, &BTreeMap::new(), &mut RoomLimit(1));
        assert_eq!(second.processed, vec![room("W2N2")]);
        assert!(harness.coordinator.state(&room("W2N2")).is_some());
    }

    #[test]
    fn test_deferred_room_untouched_by_diffusion() {
        let mut store = InMemorySwarmStore::new();
        let mut source = SwarmState::new();
        source.pheromones.set(PheromoneKind::War, 80.0);
        source.next_update_tick = 1_000;
        let mut neighbor = SwarmState::new();
        neighbor.next_update_tick = 1_000;
        store.put(room("W1N1"), source);
        store.put(room("W2N1"), neighbor.clone());

        let mut harness = TestHarness::with_settings(SwarmSettings::default(), store);
        let rooms = [quiet("W1N1"), quiet("W2N1")];
        let empire = EmpireSnapshot::default();

        let first = harness
            .coordinator
            .run_tick(5, &empire, &rooms, &BTreeMap::new(), &mut RoomLimit(1));
        assert!(first.diffused);
        assert_eq!(first.deferred, vec![room("W2N1")]);
        assert_eq!(first.diffusion_edges, 0);
        assert_eq!(harness.state("W2N1"), &neighbor);

        let second = harness
            .coordinator
            .run_tick(10, &empire, &rooms, &BTreeMap::new(), &mut Unlimited);
        assert!(second.deferred.is_empty());
        assert_eq!(second.diffusion_edges, 1);
        assert_eq!(harness.state("W2N1").pheromones.war, 20.0);
    }

    #[test]
    fn test_store_survives_restart() {
        let mut harness = TestHarness::new();
        for tick in 0..10 {
            harness.tick(tick, &grid());
        }
        let json = harness.coordinator.store().to_json().unwrap();
        let restored = InMemorySwarmStore::from_json(&json).unwrap();
        assert_eq!(&restored, harness.coordinator.store());
        assert_eq!(restored.room_names().len(), 4);
    }

    #[test]
    fn test_telemetry_counts() {
        let metrics = SwarmMetrics::new().unwrap();
        metrics.register(&Registry::new()).unwrap();
        let mut coordinator =
            RoomCoordinator::new(&SwarmSettings::default(), InMemorySwarmStore::new())
                .unwrap()
                .with_telemetry(metrics.clone());

        let rooms = grid();
        coordinator.run_tick(0, &EmpireSnapshot::default(), &rooms, &BTreeMap::new(), &mut RoomLimit(2));
        coordinator.apply_event(&room("W1N1"), 0, RoomEvent::RemoteSourceLost);
        coordinator.apply_event(&room("W1N1"), 0, RoomEvent::RemoteSourceLost);

        assert_eq!(metrics.rooms_processed.get(), 2);
        assert_eq!(metrics.rooms_deferred.get(), 2);
        assert_eq!(metrics.events_applied.get(), 1);
        assert_eq!(metrics.events_deduplicated.get(), 1);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_signals_stay_bounded(
            hostiles in proptest::collection::vec(0u32..40, 1..30),
            sites in 0u32..50,
        ) {
            let mut harness = TestHarness::new();
            for (tick, count) in hostiles.iter().enumerate() {
                let mut a = with_hostiles("E1S1", *count);
                a.construction_sites = sites;
                let b = with_hostiles("E2S1", count / 2);
                harness.tick(tick as u64, &[a, b]);
                for name in ["E1S1", "E2S1"] {
                    prop_assert!(harness.state(name).pheromones.is_bounded());
                    prop_assert!(harness.state(name).danger <= 3);
                }
            }
        }
    }
}
