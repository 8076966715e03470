//! Metrics module
//!
//! Smooths noisy per-tick observations:
//! - RollingAverage: fixed-window moving mean
//! - MetricsTracker: per-room bundle of rolling streams
//! - MetricsRegistry: trackers keyed by controlled room

pub mod registry;
pub mod rolling;
pub mod tracker;

pub use registry::MetricsRegistry;
pub use rolling::RollingAverage;
pub use tracker::{MetricsTracker, ECONOMY_WINDOW, THREAT_WINDOW};
