use super::position::LocalPos;
use crate::material::MaterialId;
use std::sync::atomic::{AtomicBool, Ordering};

/// log2 of the region side length.
pub const REGION_SHIFT: u32 = 4;
/// Number of cells along each axis of a region.
pub const REGION_SIZE: usize = 1 << REGION_SHIFT;
/// Mask extracting the local coordinate from a world coordinate.
pub const REGION_MASK: i64 = (REGION_SIZE as i64) - 1;
/// Total cell count of one region.
pub const REGION_AREA: usize = REGION_SIZE * REGION_SIZE;

/// A `REGION_SIZE`² square of material ids.
///
/// Stored as a flat array, row-major with row 0 at the bottom.
pub struct Region {
    cells: Box<[MaterialId; REGION_AREA]>,
    /// Set once this region has pushed itself and its neighbors into the
    /// dirty set for the upcoming tick; cleared when the tick claims it.
    scheduled: AtomicBool,
    /// Changed since a renderer last looked. Not read by the engine.
    changed: AtomicBool,
}

impl Region {
    pub fn new_filled(material: MaterialId) -> Self {
        Self {
            cells: Box::new([material; REGION_AREA]),
            scheduled: AtomicBool::new(false),
            changed: AtomicBool::new(false),
        }
    }

    pub fn new_empty() -> Self {
        Self::new_filled(MaterialId::EMPTY)
    }

    #[inline]
    pub fn get(&self, pos: LocalPos) -> MaterialId {
        self.cells[pos.index()]
    }

    #[inline]
    pub fn set(&mut self, pos: LocalPos, material: MaterialId) {
        self.cells[pos.index()] = material;
        self.changed.store(true, Ordering::Relaxed);
    }

    pub fn swap(&mut self, a: LocalPos, b: LocalPos) {
        self.cells.swap(a.index(), b.index());
        self.changed.store(true, Ordering::Relaxed);
    }

    /// Reset every cell to empty. Flags are cleared too: a cleared region
    /// has nothing left to schedule.
    pub fn clear(&mut self) {
        self.cells.fill(MaterialId::EMPTY);
        self.scheduled.store(false, Ordering::Relaxed);
        self.changed.store(true, Ordering::Relaxed);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|m| *m == MaterialId::EMPTY)
    }

    /// Row `y` (0 = bottom) as a slice of `REGION_SIZE` ids.
    #[inline]
    pub fn row(&self, y: usize) -> &[MaterialId] {
        &self.cells[y * REGION_SIZE..(y + 1) * REGION_SIZE]
    }

    pub fn cells(&self) -> &[MaterialId; REGION_AREA] {
        &self.cells
    }

    /// Non-empty cells with their local positions.
    pub fn occupied(&self) -> impl Iterator<Item = (LocalPos, MaterialId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, m)| **m != MaterialId::EMPTY)
            .map(|(i, m)| {
                (
                    LocalPos::new((i % REGION_SIZE) as u8, (i / REGION_SIZE) as u8),
                    *m,
                )
            })
    }

    /// Set the scheduled flag, returning whether it was previously clear.
    pub(crate) fn claim_schedule(&self) -> bool {
        !self.scheduled.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn reset_schedule(&self) {
        self.scheduled.store(false, Ordering::Release);
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled.load(Ordering::Acquire)
    }

    /// Read and clear the changed flag.
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::Relaxed)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new_empty()
    }
}
