//! Missing-structure projection for the construction planner

use swarm_common::{MissingStructures, RoomSnapshot, StructureKind};

/// Controller level at which `kind` first becomes buildable. `None` for
/// structures outside the checklist.
pub fn unlock_level(kind: StructureKind) -> Option<u8> {
    let level = match kind {
        StructureKind::Spawn => 1,
        StructureKind::Extension => 2,
        StructureKind::Tower => 3,
        StructureKind::Storage => 4,
        StructureKind::Link => 5,
        StructureKind::Terminal | StructureKind::Extractor | StructureKind::Lab => 6,
        StructureKind::Factory => 7,
        StructureKind::PowerSpawn | StructureKind::Nuker | StructureKind::Observer => 8,
        _ => return None,
    };
    Some(level)
}

/// Checklist structures unlocked at the room's controller level of which it
/// has none. A room without a visible controller misses nothing.
pub fn missing_structures(snapshot: &RoomSnapshot) -> MissingStructures {
    let mut missing = MissingStructures::default();
    let Some(controller) = snapshot.controller else {
        return missing;
    };
    for kind in MissingStructures::CHECKLIST {
        let unlocked = unlock_level(kind).is_some_and(|lvl| controller.level >= lvl);
        missing.set(kind, unlocked && !snapshot.structures.has(kind));
    }
    missing
}
