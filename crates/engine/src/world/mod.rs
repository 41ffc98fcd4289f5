pub mod dirty;
pub mod generation;
pub mod position;
pub mod region;

use crate::error::WorldError;
use crate::material::{MaterialId, MaterialRegistry};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dirty::DirtyTracker;
use generation::{EmptyGenerator, GenerationUnit, Generator};
use position::{LocalPos, RegionPos, WorldPos};
use region::{REGION_SIZE, Region};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

/// The entire cell world. Thread-safe, lock-sharded by region.
///
/// Regions are created lazily the first time a write (or a tick halo) needs
/// them, running the generator exactly once. Reads of missing regions return
/// [`MaterialId::EMPTY`] without creating anything.
///
/// Lock order: the dirty set may be held while taking a region shard lock,
/// never the other way around. No method holds a region ref while touching
/// another key.
pub struct World {
    regions: DashMap<RegionPos, Region>,
    dirty: DirtyTracker,
    registry: Arc<MaterialRegistry>,
    generator: Box<dyn Generator>,
    /// Generator spills aimed at regions that did not exist yet.
    preloaded: Mutex<HashMap<RegionPos, Vec<(LocalPos, MaterialId)>>>,
}

impl World {
    pub fn new(registry: Arc<MaterialRegistry>, generator: Box<dyn Generator>) -> Self {
        Self {
            regions: DashMap::new(),
            dirty: DirtyTracker::new(),
            registry,
            generator,
            preloaded: Mutex::new(HashMap::new()),
        }
    }

    /// A world whose regions start out empty.
    pub fn empty(registry: Arc<MaterialRegistry>) -> Self {
        Self::new(registry, Box::new(EmptyGenerator))
    }

    pub fn registry(&self) -> &Arc<MaterialRegistry> {
        &self.registry
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// Read a cell. Missing regions read as empty and are not created.
    pub fn get_block(&self, pos: WorldPos) -> MaterialId {
        match self.regions.get(&pos.region()) {
            Some(region) => region.get(pos.local()),
            None => MaterialId::EMPTY,
        }
    }

    pub fn has_region(&self, pos: RegionPos) -> bool {
        self.regions.contains_key(&pos)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Run `f` against a region if it exists.
    pub fn with_region<R>(&self, pos: RegionPos, f: impl FnOnce(&Region) -> R) -> Option<R> {
        self.regions.get(&pos).map(|region| f(region.value()))
    }

    /// Every non-empty cell inside the box `[min, max)`, grouped by region.
    pub fn regions_in(&self, min: WorldPos, max: WorldPos) -> Vec<(WorldPos, MaterialId)> {
        let mut cells = Vec::new();
        if min.x >= max.x || min.y >= max.y {
            return cells;
        }
        let lo = min.region();
        let hi = WorldPos::new(max.x - 1, max.y - 1).region();
        for ry in lo.y..=hi.y {
            for rx in lo.x..=hi.x {
                let rpos = RegionPos::new(rx, ry);
                let Some(region) = self.regions.get(&rpos) else {
                    continue;
                };
                cells.extend(
                    region
                        .occupied()
                        .map(|(local, id)| (rpos.cell(local), id))
                        .filter(|(pos, _)| {
                            pos.x >= min.x && pos.x < max.x && pos.y >= min.y && pos.y < max.y
                        }),
                );
            }
        }
        cells
    }

    // ── Writes ─────────────────────────────────────────────────────────

    /// Write a cell, creating (and generating) its region if needed. Writing
    /// the empty material into a missing region is a no-op.
    ///
    /// Panics if `material` is not registered.
    pub fn set_block(&self, pos: WorldPos, material: MaterialId) -> Result<(), WorldError> {
        self.check_material(material);
        let rpos = pos.region();
        if material == MaterialId::EMPTY && !self.has_region(rpos) {
            return Ok(());
        }
        self.ensure_region(rpos)?;
        self.write_region(rpos, |region| region.set(pos.local(), material));
        Ok(())
    }

    /// Exchange the contents of two cells.
    pub fn swap_blocks(&self, a: WorldPos, b: WorldPos) -> Result<(), WorldError> {
        let rpos = a.region();
        if rpos == b.region() {
            // Both cells live in one region: swap in place under one lock.
            if self.has_region(rpos) {
                self.write_region(rpos, |region| region.swap(a.local(), b.local()));
            }
            return Ok(());
        }

        let at_a = self.get_block(a);
        let at_b = self.get_block(b);
        if at_a == at_b {
            return Ok(());
        }
        self.set_block(a, at_b)?;
        self.set_block(b, at_a)
    }

    /// Group a burst of writes by region so each region is locked once.
    /// There is no atomicity beyond that of individual writes.
    pub fn batch_set_blocks(&self, fill: impl FnOnce(&mut BlockBatch)) -> Result<(), WorldError> {
        let mut batch = BlockBatch::default();
        fill(&mut batch);

        let mut by_region: BTreeMap<RegionPos, Vec<(LocalPos, MaterialId)>> = BTreeMap::new();
        for (pos, material) in batch.writes {
            self.check_material(material);
            by_region
                .entry(pos.region())
                .or_default()
                .push((pos.local(), material));
        }

        for (rpos, writes) in by_region {
            if !self.has_region(rpos) {
                if writes.iter().all(|(_, m)| *m == MaterialId::EMPTY) {
                    continue;
                }
                self.ensure_region(rpos)?;
            }
            self.write_region(rpos, |region| {
                for (local, material) in &writes {
                    region.set(*local, *material);
                }
            });
        }
        Ok(())
    }

    /// Reset a whole region to empty. Does not schedule anything: a cleared
    /// region has nothing left to move. Returns whether the region existed.
    pub fn clear_region(&self, pos: RegionPos) -> bool {
        match self.regions.get_mut(&pos) {
            Some(mut region) => {
                region.clear();
                tracing::trace!(x = pos.x, y = pos.y, "region cleared");
                true
            }
            None => false,
        }
    }

    /// Drop a region from the store. Pending dirty marks for it stay queued
    /// and are skipped by the next tick. Touching the area again recreates
    /// the region through the generator. Returns whether the region existed.
    pub fn unload_region(&self, pos: RegionPos) -> bool {
        let removed = self.regions.remove(&pos).is_some();
        if removed {
            tracing::debug!(x = pos.x, y = pos.y, "region unloaded");
        }
        removed
    }

    // ── Scheduling ─────────────────────────────────────────────────────

    /// Unconditionally queue the region containing `pos` (and its existing
    /// neighbors) for the next tick.
    pub fn require_tick(&self, pos: WorldPos) {
        self.mark_around(pos.region());
    }

    /// Snapshot and clear the dirty set in one critical section, resetting
    /// the scheduled flag of every claimed region.
    pub fn take_dirty_regions(&self) -> Vec<RegionPos> {
        self.dirty.take(|pos| {
            if let Some(region) = self.regions.get(&pos) {
                region.reset_schedule();
            }
        })
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    pub fn is_dirty(&self, pos: RegionPos) -> bool {
        self.dirty.contains(pos)
    }

    /// Regions modified since the previous call. Not used by the tick loop.
    pub fn take_changed_regions(&self) -> Vec<RegionPos> {
        let mut changed: Vec<RegionPos> = self
            .regions
            .iter()
            .filter(|entry| entry.value().take_changed())
            .map(|entry| *entry.key())
            .collect();
        changed.sort_unstable();
        changed
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn check_material(&self, material: MaterialId) {
        if !self.registry.contains(material) {
            panic!(
                "material id {} is out of range (registry holds 0..{})",
                material.0,
                self.registry.len()
            );
        }
    }

    /// Apply `write` to an existing region, then mark it and its neighbors
    /// dirty if this is the region's first write since it was last claimed.
    fn write_region(&self, pos: RegionPos, write: impl FnOnce(&mut Region)) {
        let first_write = match self.regions.get_mut(&pos) {
            Some(mut region) => {
                write(region.value_mut());
                region.claim_schedule()
            }
            None => false,
        };
        if first_write {
            self.mark_around(pos);
        }
    }

    fn mark_around(&self, pos: RegionPos) {
        let existing: Vec<RegionPos> = pos
            .neighborhood()
            .filter(|p| self.regions.contains_key(p))
            .collect();
        self.dirty.mark(existing);
    }

    /// Get-or-create: runs the generator under the region's entry lock so it
    /// is invoked at most once. Returns whether the region was created here.
    pub(crate) fn ensure_region(&self, pos: RegionPos) -> Result<bool, WorldError> {
        if self.regions.contains_key(&pos) {
            return Ok(false);
        }

        let spills = match self.regions.entry(pos) {
            Entry::Occupied(_) => return Ok(false),
            Entry::Vacant(vacant) => {
                let mut region = Region::new_empty();
                let mut unit = GenerationUnit::new(pos, &mut region);
                self.generator
                    .generate(&mut unit)
                    .map_err(|source| WorldError::Generation {
                        region: pos,
                        source,
                    })?;
                let spills = unit.into_spills();
                vacant.insert(region);
                spills
            }
        };
        tracing::trace!(x = pos.x, y = pos.y, spills = spills.len(), "region generated");

        self.apply_preloaded(pos);
        for (target, material) in spills {
            self.place_spill(target, material);
        }
        Ok(true)
    }

    /// Drain placements parked for `pos` into the freshly inserted region.
    fn apply_preloaded(&self, pos: RegionPos) {
        let parked = self
            .preloaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&pos);
        let Some(parked) = parked else {
            return;
        };
        if let Some(mut region) = self.regions.get_mut(&pos) {
            for (local, material) in parked {
                region.set(local, material);
            }
        }
    }

    /// Route one out-of-region generator write. Never marks dirty.
    fn place_spill(&self, pos: WorldPos, material: MaterialId) {
        self.check_material(material);
        let rpos = pos.region();
        let mut preloaded = self
            .preloaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Checked under the preload lock: a region inserted after this point
        // drains the table once it gets the lock.
        match self.regions.get_mut(&rpos) {
            Some(mut region) => region.set(pos.local(), material),
            None => preloaded
                .entry(rpos)
                .or_default()
                .push((pos.local(), material)),
        }
    }

    /// Copy a `REGION_SIZE`-long run of one region's cells into `out`.
    /// `column` selects a column at the given x instead of a row at the
    /// given y. Missing regions yield empties.
    pub(crate) fn copy_edge(&self, pos: RegionPos, column: bool, at: usize, out: &mut [MaterialId]) {
        match self.regions.get(&pos) {
            Some(region) if column => {
                for (y, slot) in out.iter_mut().enumerate().take(REGION_SIZE) {
                    *slot = region.get(LocalPos::new(at as u8, y as u8));
                }
            }
            Some(region) => out[..REGION_SIZE].copy_from_slice(region.row(at)),
            None => out[..REGION_SIZE].fill(MaterialId::EMPTY),
        }
    }
}

/// Write collector handed to [`World::batch_set_blocks`].
#[derive(Debug, Default)]
pub struct BlockBatch {
    writes: Vec<(WorldPos, MaterialId)>,
}

impl BlockBatch {
    pub fn set(&mut self, pos: WorldPos, material: MaterialId) {
        self.writes.push((pos, material));
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}
