//! Decide phase for a single region, run on a pool thread.

use super::apply::Pending;
use crate::cache::ResolutionCache;
use crate::error::WorldError;
use crate::hash;
use crate::material::{MaterialId, MaterialRegistry};
use crate::rules::action::select;
use crate::rules::{Neighborhood, RuleSet};
use crate::world::World;
use crate::world::position::{LocalPos, RegionPos, WorldPos};
use crate::world::region::REGION_SIZE;
use rand::Rng;
use rand::rngs::SmallRng;

/// Side length of the padded buffer: the region plus a one-cell halo.
pub const PADDED_SIZE: usize = REGION_SIZE + 2;

/// Scratch state owned by one pool thread. Never shared between threads.
pub struct WorkerContext {
    padded: Vec<MaterialId>,
    fingerprints: Vec<u64>,
    cache: ResolutionCache,
    rng: SmallRng,
}

/// Per-region counters reported back to the scheduler.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ScanStats {
    pub cells: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl WorkerContext {
    pub fn new(cache_capacity: usize, rng: SmallRng) -> Self {
        Self {
            padded: vec![MaterialId::EMPTY; PADDED_SIZE * PADDED_SIZE],
            fingerprints: vec![0; REGION_SIZE * REGION_SIZE],
            cache: ResolutionCache::with_capacity(cache_capacity),
            rng,
        }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Pick at most one action for every cell of `region`, appending them
    /// to `out` keyed by the cell's world position.
    pub(crate) fn scan_region(
        &mut self,
        world: &World,
        rules: &RuleSet,
        seed: u64,
        region: RegionPos,
        out: &mut Vec<(WorldPos, Pending)>,
    ) -> Result<ScanStats, WorldError> {
        self.fill_padded(world, region)?;

        let Self {
            padded,
            fingerprints,
            cache,
            rng,
        } = self;
        let padded: &[MaterialId] = padded;
        hash::fingerprint_padded(padded, PADDED_SIZE, PADDED_SIZE, seed, fingerprints);

        let registry: &MaterialRegistry = world.registry();
        for y in 0..REGION_SIZE {
            for x in 0..REGION_SIZE {
                let fingerprint = fingerprints[y * REGION_SIZE + x];
                let candidates = cache.resolve(fingerprint, rules, || {
                    Neighborhood::new(hash::gather(padded, PADDED_SIZE, x + 1, y + 1), registry)
                });
                if candidates.is_empty() {
                    continue;
                }
                if let Some(chosen) = select(&candidates, rng.random::<f64>()) {
                    let pos = region.cell(LocalPos::new(x as u8, y as u8));
                    out.push((pos, Pending::Cell(chosen.action.clone())));
                }
            }
        }

        let (cache_hits, cache_misses) = cache.take_counts();
        Ok(ScanStats {
            cells: REGION_SIZE * REGION_SIZE,
            cache_hits,
            cache_misses,
        })
    }

    /// Copy the region interior plus its halo into the padded buffer.
    ///
    /// The four cardinal neighbors are created if missing; corner cells are
    /// only read from diagonal neighbors that already exist.
    fn fill_padded(&mut self, world: &World, region: RegionPos) -> Result<(), WorldError> {
        const LAST: usize = REGION_SIZE - 1;
        const FAR: usize = PADDED_SIZE - 1;

        let up = region.shifted(0, 1);
        let down = region.shifted(0, -1);
        let left = region.shifted(-1, 0);
        let right = region.shifted(1, 0);
        for neighbor in [up, down, left, right] {
            world.ensure_region(neighbor)?;
        }

        let padded = &mut self.padded;
        padded.fill(MaterialId::EMPTY);

        world.with_region(region, |r| {
            for y in 0..REGION_SIZE {
                let start = (y + 1) * PADDED_SIZE + 1;
                padded[start..start + REGION_SIZE].copy_from_slice(r.row(y));
            }
        });

        let mut edge = [MaterialId::EMPTY; REGION_SIZE];

        world.copy_edge(up, false, 0, &mut edge);
        padded[FAR * PADDED_SIZE + 1..FAR * PADDED_SIZE + 1 + REGION_SIZE].copy_from_slice(&edge);

        world.copy_edge(down, false, LAST, &mut edge);
        padded[1..1 + REGION_SIZE].copy_from_slice(&edge);

        world.copy_edge(left, true, LAST, &mut edge);
        for (y, id) in edge.iter().enumerate() {
            padded[(y + 1) * PADDED_SIZE] = *id;
        }

        world.copy_edge(right, true, 0, &mut edge);
        for (y, id) in edge.iter().enumerate() {
            padded[(y + 1) * PADDED_SIZE + FAR] = *id;
        }

        let corner = |dx: i32, dy: i32, local: LocalPos| {
            world
                .with_region(region.shifted(dx, dy), |r| r.get(local))
                .unwrap_or(MaterialId::EMPTY)
        };
        let last = LAST as u8;
        padded[0] = corner(-1, -1, LocalPos::new(last, last));
        padded[FAR] = corner(1, -1, LocalPos::new(0, last));
        padded[FAR * PADDED_SIZE] = corner(-1, 1, LocalPos::new(last, 0));
        padded[FAR * PADDED_SIZE + FAR] = corner(1, 1, LocalPos::new(0, 0));
        Ok(())
    }
}
