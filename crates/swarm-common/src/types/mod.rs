//! Core data types shared across the Swarm crates

pub mod colony_level;
pub mod observation;
pub mod pheromone;
pub mod posture;
pub mod room_name;
pub mod swarm_state;
