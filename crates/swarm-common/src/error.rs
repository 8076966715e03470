//! Error types for the Swarm coordination core
//!
//! Provides a unified error type and domain-specific error variants.
//! Per-tick observation problems never surface here; only configuration,
//! naming and storage failures do.

use thiserror::Error;

/// Result type alias using SwarmError
pub type Result<T> = std::result::Result<T, SwarmError>;

/// Unified error type for Swarm operations
#[derive(Debug, Error)]
pub enum SwarmError {
    // Configuration errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Room naming errors
    #[error("Room name error: {0}")]
    RoomName(#[from] RoomNameError),

    // Storage errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Static configuration invariant violations.
///
/// Raised once while loading; never produced by a tick.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Decay factor for {signal} must lie strictly inside (0, 1), got {value}")]
    DecayOutOfRange { signal: &'static str, value: f64 },

    #[error("Diffusion rate for {signal} must lie inside [0, 1], got {value}")]
    DiffusionOutOfRange { signal: &'static str, value: f64 },

    #[error("Spawn profile for {posture} sums to {sum}, expected 1.0")]
    SpawnProfileSum { posture: &'static str, sum: f64 },

    #[error("Spawn profile for {posture} has negative weight {value}")]
    NegativeSpawnWeight { posture: &'static str, value: f64 },

    #[error("Resource priority {field} for {posture} must be within 0..=100, got {value}")]
    PriorityOutOfRange {
        posture: &'static str,
        field: &'static str,
        value: f64,
    },

    #[error("Evolution thresholds invalid: {0}")]
    Thresholds(String),

    #[error("Interval {name} must be positive")]
    ZeroInterval { name: &'static str },

    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Room names that do not follow the `[WE]<x>[NS]<y>` grid convention.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomNameError {
    #[error("Room name is empty")]
    Empty,

    #[error("Invalid room name format: {0}")]
    InvalidFormat(String),

    #[error("Room coordinate out of range in {0}")]
    OutOfRange(String),
}

/// Swarm state store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snapshot decode failed: {0}")]
    Decode(String),

    #[error("Snapshot encode failed: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SwarmError::RoomName(RoomNameError::InvalidFormat("X1Y2".to_string()));
        assert!(err.to_string().contains("X1Y2"));
    }

    #[test]
    fn test_config_error() {
        let err = ConfigError::SpawnProfileSum {
            posture: "eco",
            sum: 0.9,
        };
        assert!(err.to_string().contains("eco"));
        assert!(err.to_string().contains("0.9"));
    }
}
