//! Registry of per-room metrics trackers
//!
//! Trackers live exactly as long as their room is controlled: the owner calls
//! [`MetricsRegistry::retain_controlled`] once per tick, which bounds growth
//! to the current room set.

use std::collections::{BTreeMap, BTreeSet};

use swarm_common::RoomName;
use tracing::debug;

use super::tracker::MetricsTracker;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    trackers: BTreeMap<RoomName, MetricsTracker>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker for `room`, created on first use
    pub fn tracker_mut(&mut self, room: &RoomName) -> &mut MetricsTracker {
        self.trackers.entry(room.clone()).or_default()
    }

    pub fn get(&self, room: &RoomName) -> Option<&MetricsTracker> {
        self.trackers.get(room)
    }

    /// Drop the tracker for `room`, returning it if present
    pub fn evict(&mut self, room: &RoomName) -> Option<MetricsTracker> {
        self.trackers.remove(room)
    }

    /// Drop every tracker whose room is not in `controlled`.
    /// Returns the number evicted.
    pub fn retain_controlled(&mut self, controlled: &BTreeSet<RoomName>) -> usize {
        let before = self.trackers.len();
        self.trackers.retain(|room, _| controlled.contains(room));
        let evicted = before - self.trackers.len();
        if evicted > 0 {
            debug!(evicted, "Evicted metrics for rooms no longer controlled");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetricsConfig;
    use swarm_common::RoomSnapshot;

    fn room(name: &str) -> RoomName {
        RoomName::parse(name).unwrap()
    }

    #[test]
    fn test_lazy_insert_and_lookup() {
        let mut registry = MetricsRegistry::new();
        assert!(registry.get(&room("W1N1")).is_none());

        let snap = RoomSnapshot::empty(room("W1N1"));
        registry
            .tracker_mut(&room("W1N1"))
            .update(&snap, &MetricsConfig::default());
        assert!(registry.get(&room("W1N1")).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_retain_controlled() {
        let mut registry = MetricsRegistry::new();
        for name in ["W1N1", "W2N1", "W3N1"] {
            registry.tracker_mut(&room(name));
        }
        let controlled: BTreeSet<_> = [room("W2N1")].into_iter().collect();
        assert_eq!(registry.retain_controlled(&controlled), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&room("W2N1")).is_some());
    }

    #[test]
    fn test_evict() {
        let mut registry = MetricsRegistry::new();
        registry.tracker_mut(&room("E5S5"));
        assert!(registry.evict(&room("E5S5")).is_some());
        assert!(registry.evict(&room("E5S5")).is_none());
        assert!(registry.is_empty());
    }
}
