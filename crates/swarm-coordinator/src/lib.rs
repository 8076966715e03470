//! # Swarm Coordinator
//!
//! Per-tick orchestration of the colony coordination core.
//!
//! ## Components
//!
//! - [`RoomCoordinator`]: runs every room through metrics, danger, evolution,
//!   posture and pheromone updates, then diffusion
//! - [`SwarmStore`]/[`InMemorySwarmStore`]: durable per-room records
//! - [`TickBudget`]: per-tick room allowance; exhausted rooms defer whole
//! - [`SwarmSettings`]: layered configuration
//! - [`SwarmMetrics`]: Prometheus counters

pub mod budget;
pub mod coordinator;
pub mod danger;
pub mod settings;
pub mod store;
pub mod telemetry;

pub use budget::{FnBudget, RoomLimit, TickBudget, Unlimited};
pub use coordinator::{RoomCoordinator, TickReport};
pub use danger::{DangerAssessor, DangerThresholds};
pub use settings::{SettingsError, SimulationSettings, SwarmSettings};
pub use store::{InMemorySwarmStore, SwarmStore};
pub use telemetry::SwarmMetrics;

/// Coordinator version
pub const COORDINATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
