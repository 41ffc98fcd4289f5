use super::region::{REGION_MASK, REGION_SHIFT, REGION_SIZE};

/// Absolute cell position in the world. +Y is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldPos {
    pub x: i64,
    pub y: i64,
}

impl WorldPos {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The region this cell belongs to (floored division by region size).
    ///
    /// Panics if the region coordinate does not fit in an `i32`, i.e. when
    /// either axis lies outside ±2^35 cells.
    pub const fn region(&self) -> RegionPos {
        RegionPos {
            x: region_coord(self.x),
            y: region_coord(self.y),
        }
    }

    /// Position within the region (floored modulo, always 0..REGION_SIZE).
    pub const fn local(&self) -> LocalPos {
        LocalPos {
            x: (self.x & REGION_MASK) as u8,
            y: (self.y & REGION_MASK) as u8,
        }
    }

    pub const fn offset(&self, offset: Offset) -> WorldPos {
        Self::new(self.x + offset.dx as i64, self.y + offset.dy as i64)
    }
}

const fn region_coord(v: i64) -> i32 {
    let shifted = v >> REGION_SHIFT;
    if shifted < i32::MIN as i64 || shifted > i32::MAX as i64 {
        panic!("world coordinate lies outside the addressable region range");
    }
    shifted as i32
}

/// Region (chunk) coordinate; each region covers `REGION_SIZE`² cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionPos {
    pub x: i32,
    pub y: i32,
}

impl RegionPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World position of the region's bottom-left cell.
    pub const fn origin(&self) -> WorldPos {
        WorldPos::new(
            (self.x as i64) << REGION_SHIFT,
            (self.y as i64) << REGION_SHIFT,
        )
    }

    pub const fn cell(&self, local: LocalPos) -> WorldPos {
        let origin = self.origin();
        WorldPos::new(origin.x + local.x as i64, origin.y + local.y as i64)
    }

    pub const fn shifted(&self, dx: i32, dy: i32) -> RegionPos {
        Self::new(self.x + dx, self.y + dy)
    }

    /// This region and its eight neighbors.
    pub fn neighborhood(self) -> impl Iterator<Item = RegionPos> {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| self.shifted(dx, dy)))
    }
}

/// Cell position local to a region (both axes in 0..REGION_SIZE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: u8,
    pub y: u8,
}

impl LocalPos {
    pub const fn new(x: u8, y: u8) -> Self {
        debug_assert!((x as usize) < REGION_SIZE && (y as usize) < REGION_SIZE);
        Self { x, y }
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.y as usize * REGION_SIZE + self.x as usize
    }
}

/// Relative position inside a 3x3 neighborhood. Both components are
/// always within [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i8,
    pub dy: i8,
}

impl Offset {
    pub const CENTER: Offset = Offset { dx: 0, dy: 0 };
    pub const UP: Offset = Offset { dx: 0, dy: 1 };
    pub const DOWN: Offset = Offset { dx: 0, dy: -1 };
    pub const LEFT: Offset = Offset { dx: -1, dy: 0 };
    pub const RIGHT: Offset = Offset { dx: 1, dy: 0 };
    pub const UP_LEFT: Offset = Offset { dx: -1, dy: 1 };
    pub const UP_RIGHT: Offset = Offset { dx: 1, dy: 1 };
    pub const DOWN_LEFT: Offset = Offset { dx: -1, dy: -1 };
    pub const DOWN_RIGHT: Offset = Offset { dx: 1, dy: -1 };

    /// The eight neighbors, row-major from the top row.
    pub const NEIGHBORS: [Offset; 8] = [
        Self::UP_LEFT,
        Self::UP,
        Self::UP_RIGHT,
        Self::LEFT,
        Self::RIGHT,
        Self::DOWN_LEFT,
        Self::DOWN,
        Self::DOWN_RIGHT,
    ];

    pub const CARDINALS: [Offset; 4] = [Self::UP, Self::LEFT, Self::RIGHT, Self::DOWN];

    pub const DIAGONALS: [Offset; 4] = [
        Self::UP_LEFT,
        Self::UP_RIGHT,
        Self::DOWN_LEFT,
        Self::DOWN_RIGHT,
    ];

    /// Panics if either component lies outside [-1, 1].
    pub const fn new(dx: i8, dy: i8) -> Self {
        if dx < -1 || dx > 1 || dy < -1 || dy > 1 {
            panic!("neighborhood offsets must lie within [-1, 1]");
        }
        Self { dx, dy }
    }
}
