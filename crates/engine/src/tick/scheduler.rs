use super::apply::{self, ApplyStats, Pending};
use super::worker::WorkerContext;
use crate::config::EngineConfig;
use crate::error::WorldError;
use crate::rules::RuleSet;
use crate::world::World;
use crate::world::position::{RegionPos, WorldPos};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Outcome of one [`TickScheduler::tick`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickReport {
    /// Regions taken from the dirty set.
    pub claimed: usize,
    /// Regions whose cells were evaluated.
    pub scanned: usize,
    /// Regions wiped for lying below the world floor.
    pub cleared: usize,
    /// Claimed regions that no longer existed.
    pub skipped_missing: usize,
    pub cells_scanned: usize,
    pub actions_applied: usize,
    pub chances_failed: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub elapsed: Duration,
}

/// Everything the decide phase hands to the apply phase. Filled under a
/// lock once per region, never per cell.
#[derive(Default)]
struct Merged {
    actions: HashMap<WorldPos, Pending>,
    scanned: usize,
    cleared: usize,
    skipped_missing: usize,
    cells: usize,
    cache_hits: u64,
    cache_misses: u64,
}

/// Runs one simulation step at a time: parallel decide, sequential apply.
///
/// Owns a dedicated rayon pool and one [`WorkerContext`] per pool thread.
/// Contexts sit behind a `Mutex` that is only ever taken by the thread whose
/// index it carries, so it is never contended.
pub struct TickScheduler {
    pool: rayon::ThreadPool,
    workers: Vec<Mutex<WorkerContext>>,
    rules: RuleSet,
    hash_seed: u64,
    world_floor: i32,
    rng: SmallRng,
}

impl TickScheduler {
    pub fn new(config: &EngineConfig, rules: RuleSet) -> Result<Self, WorldError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("tick-worker-{i}"))
            .build()?;

        let seeded = |salt: u64| match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(salt)),
            None => SmallRng::from_os_rng(),
        };
        let workers = (0..pool.current_num_threads())
            .map(|i| Mutex::new(WorkerContext::new(config.cache_capacity, seeded(i as u64 + 1))))
            .collect();

        tracing::debug!(
            threads = pool.current_num_threads(),
            rules = rules.len(),
            "tick scheduler ready"
        );

        Ok(Self {
            pool,
            workers,
            rules,
            hash_seed: config.hash_seed,
            world_floor: config.world_floor,
            rng: seeded(0),
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Run one step against `world`.
    ///
    /// A generator failure aborts the tick. Writes already applied by this
    /// tick stay applied.
    pub fn tick(&mut self, world: &World) -> Result<TickReport, WorldError> {
        let started = Instant::now();

        // ── 1. Claim ───────────────────────────────────────────────────
        let claimed = world.take_dirty_regions();
        if claimed.is_empty() {
            return Ok(TickReport {
                elapsed: started.elapsed(),
                ..TickReport::default()
            });
        }

        // ── 2. Decide (parallel) ───────────────────────────────────────
        let merged = Mutex::new(Merged::default());
        {
            let workers = &self.workers;
            let rules = &self.rules;
            let seed = self.hash_seed;
            let floor = self.world_floor;
            let merged = &merged;
            self.pool.install(|| {
                claimed.par_iter().try_for_each(|&region| {
                    decide_region(world, workers, rules, seed, floor, region, merged)
                })
            })?;
        }
        let merged = merged.into_inner().unwrap_or_else(PoisonError::into_inner);

        // ── 3. Apply (sequential, bottom rows first) ───────────────────
        let mut pending: Vec<(WorldPos, Pending)> = merged.actions.into_iter().collect();
        pending.shuffle(&mut self.rng);
        pending.sort_by_key(|(origin, _)| origin.y);

        let mut stats = ApplyStats::default();
        for (origin, work) in &pending {
            apply::execute_pending(world, *origin, work, &mut self.rng, &mut stats)?;
        }

        Ok(TickReport {
            claimed: claimed.len(),
            scanned: merged.scanned,
            cleared: merged.cleared,
            skipped_missing: merged.skipped_missing,
            cells_scanned: merged.cells,
            actions_applied: stats.actions,
            chances_failed: stats.chances_failed,
            cache_hits: merged.cache_hits,
            cache_misses: merged.cache_misses,
            elapsed: started.elapsed(),
        })
    }
}

fn decide_region(
    world: &World,
    workers: &[Mutex<WorkerContext>],
    rules: &RuleSet,
    seed: u64,
    floor: i32,
    region: RegionPos,
    merged: &Mutex<Merged>,
) -> Result<(), WorldError> {
    let lock_merged = || merged.lock().unwrap_or_else(PoisonError::into_inner);

    if !world.has_region(region) {
        lock_merged().skipped_missing += 1;
        return Ok(());
    }

    if region.y < floor {
        let mut merged = lock_merged();
        merged
            .actions
            .insert(region.origin(), Pending::ClearRegion(region));
        merged.cleared += 1;
        return Ok(());
    }

    let index = rayon::current_thread_index().unwrap_or(0) % workers.len();
    let mut local = Vec::new();
    let stats = {
        let mut ctx = workers[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        ctx.scan_region(world, rules, seed, region, &mut local)?
    };

    let mut merged = lock_merged();
    merged.actions.extend(local);
    merged.scanned += 1;
    merged.cells += stats.cells;
    merged.cache_hits += stats.cache_hits;
    merged.cache_misses += stats.cache_misses;
    Ok(())
}
