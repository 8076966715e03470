//! Prometheus metrics for the coordinator

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};

/// Counters and timings for coordinator ticks
#[derive(Clone)]
pub struct SwarmMetrics {
    pub rooms_processed: IntCounter,
    pub rooms_deferred: IntCounter,
    pub posture_changes: IntCounter,
    pub level_changes: IntCounter,
    pub events_applied: IntCounter,
    pub events_deduplicated: IntCounter,
    pub diffusion_edges: IntCounter,
    pub tick_duration_seconds: Histogram,
}

impl SwarmMetrics {
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            rooms_processed: IntCounter::new(
                "swarm_rooms_processed_total",
                "Rooms fully processed",
            )?,
            rooms_deferred: IntCounter::new(
                "swarm_rooms_deferred_total",
                "Rooms deferred to the next tick by the budget",
            )?,
            posture_changes: IntCounter::new(
                "swarm_posture_changes_total",
                "Posture transitions committed",
            )?,
            level_changes: IntCounter::new(
                "swarm_level_changes_total",
                "Colony level transitions committed",
            )?,
            events_applied: IntCounter::new(
                "swarm_events_applied_total",
                "Room events applied",
            )?,
            events_deduplicated: IntCounter::new(
                "swarm_events_deduplicated_total",
                "Room events dropped as same-tick duplicates",
            )?,
            diffusion_edges: IntCounter::new(
                "swarm_diffusion_edges_total",
                "Neighbor transfers applied by diffusion",
            )?,
            tick_duration_seconds: Histogram::with_opts(
                HistogramOpts::new("swarm_tick_duration_seconds", "Coordinator tick duration")
                    .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
            )?,
        })
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.rooms_processed.clone()))?;
        registry.register(Box::new(self.rooms_deferred.clone()))?;
        registry.register(Box::new(self.posture_changes.clone()))?;
        registry.register(Box::new(self.level_changes.clone()))?;
        registry.register(Box::new(self.events_applied.clone()))?;
        registry.register(Box::new(self.events_deduplicated.clone()))?;
        registry.register(Box::new(self.diffusion_edges.clone()))?;
        registry.register(Box::new(self.tick_duration_seconds.clone()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_exposes_all_families() {
        let metrics = SwarmMetrics::new().unwrap();
        let registry = Registry::new();
        metrics.register(&registry).unwrap();
        metrics.rooms_processed.inc();
        metrics.tick_duration_seconds.observe(0.002);

        let names: Vec<_> = registry
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert_eq!(names.len(), 8);
        assert!(names.contains(&"swarm_rooms_processed_total".to_string()));
        assert!(names.contains(&"swarm_tick_duration_seconds".to_string()));
    }

    #[test]
    fn test_double_registration_fails() {
        let metrics = SwarmMetrics::new().unwrap();
        let registry = Registry::new();
        metrics.register(&registry).unwrap();
        assert!(metrics.register(&registry).is_err());
    }
}
