//! # Swarm Common
//!
//! Shared types and errors for the Swarm colony coordination core.
//!
//! ## Core Types
//!
//! - [`RoomName`]: grid-addressed room identifier with a pure neighbor function
//! - [`PheromoneVector`]: nine bounded (0-100) signals per room
//! - [`Posture`]: behavioral mode derived from pheromones and danger
//! - [`ColonyLevel`]: ordered evolution stage
//! - [`SwarmState`]: durable per-room record read by every other subsystem
//! - [`RoomSnapshot`]/[`EmpireSnapshot`]: per-tick observation inputs

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ConfigError, Result, RoomNameError, StoreError, SwarmError};
pub use types::{
    colony_level::ColonyLevel,
    observation::{
        ControllerObservation, EmpireSnapshot, EnergyFlows, HostileSummary, RoomSnapshot,
        SourceObservation, StructureCounts, StructureKind,
    },
    pheromone::{clamp_signal, PheromoneKind, PheromoneVector, MAX_PHEROMONE, MIN_PHEROMONE},
    posture::Posture,
    room_name::{neighbor_names, RoomCoord, RoomName},
    swarm_state::{
        EventKind, EventLog, EventLogEntry, MetricsSnapshot, MissingStructures, PendingLevel,
        SwarmState, EVENT_LOG_CAPACITY, MAX_DANGER,
    },
};

/// Swarm version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
