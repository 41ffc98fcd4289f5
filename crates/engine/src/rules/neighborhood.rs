use crate::material::{Material, MaterialId, MaterialRegistry, MatterClass};
use crate::world::position::Offset;

/// Read-only 3x3 view centered on one cell.
///
/// Ids are stored row-major from the top row (dy = +1) down, the same order
/// the fingerprint uses. Every accessor panics on offsets outside [-1, 1].
#[derive(Clone, Copy)]
pub struct Neighborhood<'a> {
    cells: [MaterialId; 9],
    registry: &'a MaterialRegistry,
}

#[inline]
fn slot(dx: i8, dy: i8) -> usize {
    if !(-1..=1).contains(&dx) || !(-1..=1).contains(&dy) {
        panic!("neighborhood offset ({dx}, {dy}) lies outside [-1, 1]");
    }
    ((1 - dy) * 3 + (dx + 1)) as usize
}

impl<'a> Neighborhood<'a> {
    pub fn new(cells: [MaterialId; 9], registry: &'a MaterialRegistry) -> Self {
        Self { cells, registry }
    }

    /// Build a neighborhood from a closure over offsets; mostly for tests.
    pub fn from_fn(registry: &'a MaterialRegistry, mut at: impl FnMut(Offset) -> MaterialId) -> Self {
        let mut cells = [MaterialId::EMPTY; 9];
        for dy in -1i8..=1 {
            for dx in -1i8..=1 {
                cells[slot(dx, dy)] = at(Offset::new(dx, dy));
            }
        }
        Self::new(cells, registry)
    }

    pub fn registry(&self) -> &'a MaterialRegistry {
        self.registry
    }

    pub fn cells(&self) -> &[MaterialId; 9] {
        &self.cells
    }

    #[inline]
    pub fn id(&self, dx: i8, dy: i8) -> MaterialId {
        self.cells[slot(dx, dy)]
    }

    #[inline]
    pub fn id_at(&self, offset: Offset) -> MaterialId {
        self.id(offset.dx, offset.dy)
    }

    #[inline]
    pub fn material(&self, dx: i8, dy: i8) -> &'a Material {
        self.registry.get(self.id(dx, dy))
    }

    #[inline]
    pub fn material_at(&self, offset: Offset) -> &'a Material {
        self.material(offset.dx, offset.dy)
    }

    #[inline]
    pub fn center(&self) -> MaterialId {
        self.cells[4]
    }

    pub fn center_material(&self) -> &'a Material {
        self.registry.get(self.center())
    }

    pub fn density(&self, offset: Offset) -> f64 {
        self.material_at(offset).density
    }

    pub fn class(&self, offset: Offset) -> MatterClass {
        self.material_at(offset).class
    }

    pub fn is_empty_at(&self, offset: Offset) -> bool {
        self.id_at(offset) == MaterialId::EMPTY
    }

    /// The eight surrounding cells with their offsets.
    pub fn neighbors(&self) -> impl Iterator<Item = (Offset, MaterialId)> + '_ {
        Offset::NEIGHBORS.into_iter().map(move |o| (o, self.id_at(o)))
    }

    pub fn cardinals(&self) -> impl Iterator<Item = (Offset, MaterialId)> + '_ {
        Offset::CARDINALS.into_iter().map(move |o| (o, self.id_at(o)))
    }

    pub fn diagonals(&self) -> impl Iterator<Item = (Offset, MaterialId)> + '_ {
        Offset::DIAGONALS.into_iter().map(move |o| (o, self.id_at(o)))
    }
}

impl std::fmt::Debug for Neighborhood<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = |id: MaterialId| self.registry.try_get(id).map_or("?", |m| m.name);
        let rows: Vec<[&str; 3]> = self
            .cells
            .chunks(3)
            .map(|row| [name(row[0]), name(row[1]), name(row[2])])
            .collect();
        f.debug_struct("Neighborhood").field("rows", &rows).finish()
    }
}
