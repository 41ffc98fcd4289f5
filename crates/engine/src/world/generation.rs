//! Generator interface: one-time population of a freshly created region.
//!
//! A generator only ever sees a [`GenerationUnit`] scoped to the region being
//! created. Writes inside the region land directly in it; writes made through
//! a [`ForkedPlacer`] may fall outside and are handed back to the world, which
//! parks them until the target region is generated.

use super::position::{RegionPos, WorldPos};
use super::region::{REGION_SIZE, Region};
use crate::material::MaterialId;
use std::ops::Range;

pub type GenerateError = Box<dyn std::error::Error + Send + Sync>;
pub type GenerateResult = Result<(), GenerateError>;

/// Populates regions on first access. Invoked at most once per region.
pub trait Generator: Send + Sync {
    fn generate(&self, unit: &mut GenerationUnit<'_>) -> GenerateResult;
}

/// Leaves every region empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyGenerator;

impl Generator for EmptyGenerator {
    fn generate(&self, _unit: &mut GenerationUnit<'_>) -> GenerateResult {
        Ok(())
    }
}

/// A generation request for a single region.
pub struct GenerationUnit<'a> {
    region_pos: RegionPos,
    region: &'a mut Region,
    spills: Vec<(WorldPos, MaterialId)>,
}

impl<'a> GenerationUnit<'a> {
    pub(crate) fn new(region_pos: RegionPos, region: &'a mut Region) -> Self {
        Self {
            region_pos,
            region,
            spills: Vec::new(),
        }
    }

    pub fn region(&self) -> RegionPos {
        self.region_pos
    }

    /// Smallest world position covered (inclusive).
    pub fn min(&self) -> WorldPos {
        self.region_pos.origin()
    }

    /// Largest world position covered (exclusive).
    pub fn max(&self) -> WorldPos {
        let min = self.min();
        WorldPos::new(min.x + REGION_SIZE as i64, min.y + REGION_SIZE as i64)
    }

    pub fn contains_x(&self, x: i64) -> bool {
        x >= self.min().x && x < self.max().x
    }

    pub fn contains_y(&self, y: i64) -> bool {
        y >= self.min().y && y < self.max().y
    }

    pub fn contains(&self, pos: WorldPos) -> bool {
        self.contains_x(pos.x) && self.contains_y(pos.y)
    }

    /// Place a material. Positions outside this region are ignored.
    pub fn set(&mut self, pos: WorldPos, material: MaterialId) {
        if self.contains(pos) {
            self.region.set(pos.local(), material);
        }
    }

    /// Fill the world rows `ys` across the region's full width.
    pub fn fill_rows(&mut self, ys: Range<i64>, material: MaterialId) {
        let min = self.min();
        for x in min.x..self.max().x {
            self.fill_column(x, ys.clone(), material);
        }
    }

    pub fn fill_column(&mut self, x: i64, ys: Range<i64>, material: MaterialId) {
        for y in ys {
            self.set(WorldPos::new(x, y), material);
        }
    }

    /// A placer addressed relative to `origin` whose writes may leave the
    /// region.
    pub fn fork(&mut self, origin: WorldPos) -> ForkedPlacer<'_, 'a> {
        ForkedPlacer { unit: self, origin }
    }

    fn place_global(&mut self, pos: WorldPos, material: MaterialId) {
        if self.contains(pos) {
            self.region.set(pos.local(), material);
        } else {
            self.spills.push((pos, material));
        }
    }

    pub(crate) fn into_spills(self) -> Vec<(WorldPos, MaterialId)> {
        self.spills
    }
}

/// Relative placer produced by [`GenerationUnit::fork`].
pub struct ForkedPlacer<'u, 'a> {
    unit: &'u mut GenerationUnit<'a>,
    origin: WorldPos,
}

impl ForkedPlacer<'_, '_> {
    pub fn set(&mut self, dx: i64, dy: i64, material: MaterialId) {
        let pos = WorldPos::new(self.origin.x + dx, self.origin.y + dy);
        self.unit.place_global(pos, material);
    }

    pub fn origin(&self) -> WorldPos {
        self.origin
    }
}
