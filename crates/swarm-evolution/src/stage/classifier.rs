//! Stage classification and the change-tracking wrapper around it

use swarm_common::{ColonyLevel, EmpireSnapshot, EventKind, PendingLevel, RoomSnapshot, SwarmState};
use tracing::{debug, info};

use super::thresholds::StageThresholds;

/// Highest stage whose record is fully met, `Seed` when none is.
pub fn classify_stage(
    thresholds: &StageThresholds,
    snapshot: &RoomSnapshot,
    empire: &EmpireSnapshot,
) -> ColonyLevel {
    thresholds
        .descending()
        .find(|record| record.is_met(snapshot, empire))
        .map(|record| record.stage)
        .unwrap_or(ColonyLevel::LOWEST)
}

/// A committed stage transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub from: ColonyLevel,
    pub to: ColonyLevel,
}

/// Applies [`classify_stage`] to a room's state, optionally holding a new
/// stage for `hysteresis_ticks` before committing it.
#[derive(Debug, Clone)]
pub struct EvolutionClassifier {
    thresholds: StageThresholds,
    hysteresis_ticks: u64,
}

impl EvolutionClassifier {
    pub fn new(thresholds: StageThresholds, hysteresis_ticks: u64) -> Self {
        Self {
            thresholds,
            hysteresis_ticks,
        }
    }

    pub fn thresholds(&self) -> &StageThresholds {
        &self.thresholds
    }

    /// Classify and update `state.colony_level`, logging a transition.
    pub fn evaluate(
        &self,
        room: &str,
        state: &mut SwarmState,
        snapshot: &RoomSnapshot,
        empire: &EmpireSnapshot,
        tick: u64,
    ) -> Option<LevelChange> {
        let candidate = classify_stage(&self.thresholds, snapshot, empire);
        if candidate == state.colony_level {
            state.pending_level = None;
            return None;
        }

        if self.hysteresis_ticks > 0 {
            match state.pending_level {
                Some(pending) if pending.level == candidate => {
                    if tick.saturating_sub(pending.since_tick) < self.hysteresis_ticks {
                        return None;
                    }
                }
                _ => {
                    debug!(room, tick, candidate = %candidate, "Stage change pending");
                    state.pending_level = Some(PendingLevel {
                        level: candidate,
                        since_tick: tick,
                    });
                    return None;
                }
            }
        }

        let change = LevelChange {
            from: state.colony_level,
            to: candidate,
        };
        state.colony_level = candidate;
        state.pending_level = None;
        state.event_log.push(
            tick,
            EventKind::LevelChanged,
            format!("colony level {} -> {}", change.from, change.to),
        );
        info!(room, tick, from = %change.from, to = %change.to, "Colony level changed");
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_common::{ControllerObservation, RoomName, StructureCounts, StructureKind};

    fn snapshot(rcl: u8, structures: StructureCounts) -> RoomSnapshot {
        let mut snap = RoomSnapshot::empty(RoomName::parse("E9N9").unwrap());
        snap.controller = Some(ControllerObservation {
            level: rcl,
            progress: 0,
            progress_total: 1_000,
        });
        snap.structures = structures;
        snap
    }

    fn empire(gcl: u32, rooms: u32) -> EmpireSnapshot {
        EmpireSnapshot {
            gcl,
            owned_rooms: rooms,
        }
    }

    fn classify(snap: &RoomSnapshot, emp: &EmpireSnapshot) -> ColonyLevel {
        classify_stage(&StageThresholds::default(), snap, emp)
    }

    #[test]
    fn test_no_controller_is_seed() {
        let snap = RoomSnapshot::empty(RoomName::parse("E9N9").unwrap());
        assert_eq!(classify(&snap, &empire(10, 10)), ColonyLevel::Seed);
    }

    #[test]
    fn test_max_level_with_two_labs_is_economic_maturity() {
        let structures = StructureCounts::new()
            .with(StructureKind::Storage, 1)
            .with(StructureKind::Lab, 2);
        assert_eq!(
            classify(&snapshot(8, structures), &empire(10, 5)),
            ColonyLevel::EconomicMaturity
        );
    }

    #[test]
    fn test_rcl6_without_labs_stays_early() {
        let structures = StructureCounts::new().with(StructureKind::Storage, 1);
        let level = classify(&snapshot(6, structures), &empire(1, 1));
        assert!(level <= ColonyLevel::EarlyExpansion);
        assert_eq!(level, ColonyLevel::EarlyExpansion);
    }

    #[test]
    fn test_end_game_requires_empire_progress() {
        let structures = StructureCounts::new()
            .with(StructureKind::Storage, 1)
            .with(StructureKind::Lab, 10)
            .with(StructureKind::Nuker, 1);
        assert_eq!(classify(&snapshot(8, structures.clone()), &empire(5, 3)), ColonyLevel::EndGame);
        assert_eq!(
            classify(&snapshot(8, structures.clone()), &empire(4, 3)),
            ColonyLevel::Fortification
        );
        assert_eq!(
            classify(&snapshot(8, structures), &empire(5, 2)),
            ColonyLevel::Fortification
        );
    }

    #[test]
    fn test_immediate_commit_without_hysteresis() {
        let classifier = EvolutionClassifier::new(StageThresholds::default(), 0);
        let mut state = SwarmState::new();
        let snap = snapshot(3, StructureCounts::new());

        let change = classifier.evaluate("E9N9", &mut state, &snap, &empire(1, 1), 10);
        assert_eq!(
            change,
            Some(LevelChange {
                from: ColonyLevel::Seed,
                to: ColonyLevel::EarlyExpansion
            })
        );
        assert_eq!(state.event_log.len(), 1);

        // unchanged stage logs nothing
        assert_eq!(classifier.evaluate("E9N9", &mut state, &snap, &empire(1, 1), 11), None);
        assert_eq!(state.event_log.len(), 1);
    }

    #[test]
    fn test_hysteresis_holds_then_commits() {
        let classifier = EvolutionClassifier::new(StageThresholds::default(), 10);
        let mut state = SwarmState::new();
        let snap = snapshot(3, StructureCounts::new());
        let emp = empire(1, 1);

        assert_eq!(classifier.evaluate("E9N9", &mut state, &snap, &emp, 100), None);
        assert_eq!(state.pending_level.map(|p| p.since_tick), Some(100));
        assert_eq!(classifier.evaluate("E9N9", &mut state, &snap, &emp, 109), None);
        assert!(classifier.evaluate("E9N9", &mut state, &snap, &emp, 110).is_some());
        assert_eq!(state.colony_level, ColonyLevel::EarlyExpansion);
        assert!(state.pending_level.is_none());
    }

    #[test]
    fn test_hysteresis_reset_by_flicker() {
        let classifier = EvolutionClassifier::new(StageThresholds::default(), 10);
        let mut state = SwarmState::new();
        let up = snapshot(3, StructureCounts::new());
        let down = snapshot(1, StructureCounts::new());
        let emp = empire(1, 1);

        classifier.evaluate("E9N9", &mut state, &up, &emp, 0);
        classifier.evaluate("E9N9", &mut state, &down, &emp, 5);
        assert!(state.pending_level.is_none());
        assert_eq!(classifier.evaluate("E9N9", &mut state, &up, &emp, 12), None);
        assert_eq!(state.pending_level.map(|p| p.since_tick), Some(12));
    }
}
