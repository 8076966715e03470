//! # Swarm Pheromone
//!
//! Per-room signal field for the colony coordination core.
//!
//! ## Engine
//!
//! - [`PheromoneEngine::update_periodic`]: gated decay then contribution
//! - [`PheromoneEngine::apply_event`]: immediate, deduplicated event bumps
//! - [`PheromoneEngine::diffuse`]: two-phase spread to neighboring rooms
//!
//! ## Metrics
//!
//! - [`RollingAverage`]: fixed-window moving mean
//! - [`MetricsTracker`]/[`MetricsRegistry`]: per-room smoothed observations

pub mod config;
pub mod engine;
pub mod metrics;

pub use config::{MetricsConfig, PheromoneConfig};
pub use engine::{
    apply_diffusion, contributions, DiffusionEdge, EventKey, EventOutcome, PheromoneEngine,
    RoomEvent,
};
pub use metrics::{MetricsRegistry, MetricsTracker, RollingAverage};
