//! Room coordinator - drives one tick across every controlled room
//!
//! ```text
//! begin tick -> prune metrics -> for each room (deferred first):
//!     metrics -> danger -> missing structures -> evolution -> posture -> pheromones
//!     commit
//! -> diffusion over the rooms processed this tick (on schedule)
//! ```
//!
//! Each room is processed on a copy of its record and committed in one
//! `put`, so a reader never sees a half-updated room.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Instant;

use swarm_common::{
    EmpireSnapshot, PheromoneVector, Posture, Result, RoomName, RoomSnapshot, SwarmState,
};
use swarm_evolution::{
    apply_posture, missing_structures, EvolutionClassifier, LevelChange, PostureChange,
    PostureProfileTable, PostureThresholds, ResourcePriorities, SpawnProfile,
};
use swarm_pheromone::{
    EventOutcome, MetricsConfig, MetricsRegistry, PheromoneEngine, RoomEvent,
};
use tracing::{debug, info, instrument, warn};

use crate::budget::TickBudget;
use crate::danger::DangerAssessor;
use crate::settings::SwarmSettings;
use crate::store::SwarmStore;
use crate::telemetry::SwarmMetrics;

/// What happened during one [`RoomCoordinator::run_tick`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Rooms processed, in processing order
    pub processed: Vec<RoomName>,
    /// Rooms pushed to the next tick by the budget
    pub deferred: Vec<RoomName>,
    pub posture_changes: Vec<(RoomName, PostureChange)>,
    pub level_changes: Vec<(RoomName, LevelChange)>,
    /// Rooms whose periodic pheromone gate was open
    pub pheromone_updates: usize,
    pub diffused: bool,
    pub diffusion_edges: usize,
}

struct RoomOutcome {
    posture_change: Option<PostureChange>,
    level_change: Option<LevelChange>,
    pheromones_updated: bool,
}

/// Owns the per-room store and every subsystem that writes to it
pub struct RoomCoordinator<S: SwarmStore> {
    store: S,
    engine: PheromoneEngine,
    metrics_config: MetricsConfig,
    registry: MetricsRegistry,
    evolution: EvolutionClassifier,
    posture_thresholds: PostureThresholds,
    profiles: PostureProfileTable,
    danger: DangerAssessor,
    /// Rooms the budget cut off last tick, in their original order
    deferred: Vec<RoomName>,
    telemetry: Option<SwarmMetrics>,
}

impl<S: SwarmStore> RoomCoordinator<S> {
    /// Validate `settings` and build a coordinator over `store`
    pub fn new(settings: &SwarmSettings, store: S) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            store,
            engine: PheromoneEngine::new(settings.pheromone.clone())?,
            metrics_config: settings.metrics.clone(),
            registry: MetricsRegistry::new(),
            evolution: settings.evolution.classifier(),
            posture_thresholds: settings.evolution.posture_thresholds.clone(),
            profiles: settings.evolution.profiles.clone(),
            danger: DangerAssessor::new(settings.danger.clone()),
            deferred: Vec::new(),
            telemetry: None,
        })
    }

    /// Record counters and timings into `metrics`
    pub fn with_telemetry(mut self, metrics: SwarmMetrics) -> Self {
        self.telemetry = Some(metrics);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn state(&self, room: &RoomName) -> Option<&SwarmState> {
        self.store.get(room)
    }

    pub fn metrics_registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    /// Rooms waiting from the last budget cut-off
    pub fn deferred(&self) -> &[RoomName] {
        &self.deferred
    }

    /// Spawn weights for the room's current posture
    pub fn spawn_profile(&self, room: &RoomName) -> Option<SpawnProfile> {
        let posture = self.store.get(room).map_or(Posture::default(), |s| s.posture);
        self.profiles.spawn_profile(posture)
    }

    /// Resource priorities for the room's current posture
    pub fn resource_priorities(&self, room: &RoomName) -> Option<ResourcePriorities> {
        let posture = self.store.get(room).map_or(Posture::default(), |s| s.posture);
        self.profiles.resource_priorities(posture)
    }

    /// Apply an event to `room` right away, creating its record if needed
    pub fn apply_event(&mut self, room: &RoomName, tick: u64, event: RoomEvent) -> EventOutcome {
        let state = self.store.get_or_init(room);
        let outcome = self.engine.apply_event(room, state, event, tick);
        if let Some(t) = &self.telemetry {
            match outcome {
                EventOutcome::Applied => t.events_applied.inc(),
                EventOutcome::Duplicate => t.events_deduplicated.inc(),
                EventOutcome::Ignored => {}
            }
        }
        outcome
    }

    /// Run one tick over `rooms`, the snapshots of every controlled room.
    #[instrument(skip_all, fields(tick = tick, rooms = rooms.len()))]
    pub fn run_tick<B: TickBudget + ?Sized>(
        &mut self,
        tick: u64,
        empire: &EmpireSnapshot,
        rooms: &[RoomSnapshot],
        overrides: &BTreeMap<RoomName, Posture>,
        budget: &mut B,
    ) -> TickReport {
        let started = Instant::now();
        let mut report = TickReport {
            tick,
            ..Default::default()
        };

        self.engine.begin_tick(tick);
        let controlled: BTreeSet<RoomName> = rooms.iter().map(|r| r.name.clone()).collect();
        self.registry.retain_controlled(&controlled);

        let order = self.processing_order(rooms);
        let mut remaining = order.into_iter();
        while let Some(snapshot) = remaining.next() {
            if !budget.has_capacity(report.processed.len()) {
                report.deferred.push(snapshot.name.clone());
                report.deferred.extend(remaining.by_ref().map(|s| s.name.clone()));
                break;
            }

            let name = snapshot.name.clone();
            let outcome = self.process_room(snapshot, empire, overrides.get(&name).copied(), tick);
            if let Some(change) = outcome.posture_change {
                report.posture_changes.push((name.clone(), change));
            }
            if let Some(change) = outcome.level_change {
                report.level_changes.push((name.clone(), change));
            }
            if outcome.pheromones_updated {
                report.pheromone_updates += 1;
            }
            report.processed.push(name);
        }

        if !report.deferred.is_empty() {
            warn!(
                tick,
                processed = report.processed.len(),
                deferred = report.deferred.len(),
                "Tick budget exhausted, deferring rooms"
            );
        }
        self.deferred = report.deferred.clone();

        if self.engine.diffusion_due(tick) {
            let processed: BTreeSet<RoomName> = report.processed.iter().cloned().collect();
            report.diffused = true;
            report.diffusion_edges = self.diffuse(&processed);
        }

        if let Some(t) = &self.telemetry {
            t.rooms_processed.inc_by(report.processed.len() as u64);
            t.rooms_deferred.inc_by(report.deferred.len() as u64);
            t.posture_changes.inc_by(report.posture_changes.len() as u64);
            t.level_changes.inc_by(report.level_changes.len() as u64);
            t.diffusion_edges.inc_by(report.diffusion_edges as u64);
            t.tick_duration_seconds.observe(started.elapsed().as_secs_f64());
        }

        debug!(
            tick,
            processed = report.processed.len(),
            updates = report.pheromone_updates,
            edges = report.diffusion_edges,
            "Tick complete"
        );
        report
    }

    /// Last tick's deferred rooms first, then the rest in snapshot order.
    /// Duplicate snapshots for one room keep the first.
    fn processing_order<'a>(&self, rooms: &'a [RoomSnapshot]) -> Vec<&'a RoomSnapshot> {
        let by_name: BTreeMap<&RoomName, &RoomSnapshot> =
            rooms.iter().rev().map(|r| (&r.name, r)).collect();

        let mut seen: HashSet<&RoomName> = HashSet::with_capacity(rooms.len());
        let mut order = Vec::with_capacity(rooms.len());
        for name in &self.deferred {
            if let Some((key, snapshot)) = by_name.get_key_value(name) {
                if seen.insert(*key) {
                    order.push(*snapshot);
                }
            }
        }
        for snapshot in rooms {
            if seen.insert(&snapshot.name) {
                order.push(snapshot);
            }
        }
        order
    }

    fn process_room(
        &mut self,
        snapshot: &RoomSnapshot,
        empire: &EmpireSnapshot,
        override_posture: Option<Posture>,
        tick: u64,
    ) -> RoomOutcome {
        let name = &snapshot.name;
        let mut state = self.store.get(name).cloned().unwrap_or_default();

        state.metrics = self
            .registry
            .tracker_mut(name)
            .update(snapshot, &self.metrics_config);

        let floor = state.active_danger_floor(tick);
        let danger = self.danger.assess(&snapshot.hostiles, floor);
        state.set_danger(tick, danger);

        state.missing_structures = missing_structures(snapshot);

        let level_change = self
            .evolution
            .evaluate(name.as_str(), &mut state, snapshot, empire, tick);
        let posture_change = apply_posture(
            name.as_str(),
            &mut state,
            override_posture,
            &self.posture_thresholds,
            tick,
        );
        let pheromones_updated = self.engine.update_periodic(&mut state, snapshot, tick);

        self.store.put(name.clone(), state);
        RoomOutcome {
            posture_change,
            level_change,
            pheromones_updated,
        }
    }

    /// One diffusion pass over the committed records of `rooms`.
    ///
    /// Only rooms processed this tick take part, as source or target; a
    /// deferred room is left exactly as it was.
    fn diffuse(&mut self, rooms: &BTreeSet<RoomName>) -> usize {
        let mut field: BTreeMap<RoomName, PheromoneVector> = rooms
            .iter()
            .filter_map(|room| self.store.get(room).map(|s| (room.clone(), s.pheromones)))
            .collect();

        let edges = self.engine.diffuse(&mut field);
        for (room, pheromones) in field {
            self.store.get_or_init(&room).pheromones = pheromones;
        }
        if edges > 0 {
            info!(edges, rooms = rooms.len(), "Pheromones diffused");
        }
        edges
    }
}
