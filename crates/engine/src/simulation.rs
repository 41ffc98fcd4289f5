//! The top-level handle: a world, a scheduler and counters, stepped by
//! [`Simulation::tick`].

use crate::config::EngineConfig;
use crate::error::WorldError;
use crate::material::MaterialRegistry;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::rules::RuleSet;
use crate::tick::{TickReport, TickScheduler};
use crate::world::World;
use crate::world::generation::Generator;
use std::sync::Arc;

pub struct Simulation {
    world: World,
    scheduler: TickScheduler,
    metrics: Metrics,
    ticks: u64,
}

impl Simulation {
    pub fn new(
        config: EngineConfig,
        registry: Arc<MaterialRegistry>,
        generator: Box<dyn Generator>,
        rules: RuleSet,
    ) -> Result<Self, WorldError> {
        let scheduler = TickScheduler::new(&config, rules)?;
        tracing::info!(
            "Simulation ready: {} materials, {} workers, floor at region row {}",
            registry.len(),
            scheduler.worker_count(),
            config.world_floor
        );
        Ok(Self {
            world: World::new(registry, generator),
            scheduler,
            metrics: Metrics::new(),
            ticks: 0,
        })
    }

    /// Advance the world by one step.
    pub fn tick(&mut self) -> Result<TickReport, WorldError> {
        let span = tracing::info_span!("tick", n = self.ticks);
        let _enter = span.enter();

        let report = self.scheduler.tick(&self.world)?;
        self.ticks += 1;
        self.metrics.record_tick(&report);

        tracing::debug!(
            claimed = report.claimed,
            scanned = report.scanned,
            cleared = report.cleared,
            applied = report.actions_applied,
            chances_failed = report.chances_failed,
            cache_hits = report.cache_hits,
            cache_misses = report.cache_misses,
            elapsed_us = report.elapsed.as_micros() as u64,
            "tick complete"
        );
        Ok(report)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot(
            self.world.region_count() as u64,
            self.world.dirty_count() as u64,
        )
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}
