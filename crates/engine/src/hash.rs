//! Neighborhood fingerprints: 64-bit cache keys for 3x3 material patterns.
//!
//! An FNV-style fold with a distinct odd multiplier per position, so that
//! moving an id to a different slot changes the result. Uniqueness is an
//! empirical property (see the exhaustive test below), not a guarantee.

use crate::material::MaterialId;

/// Seed used when the configuration does not provide one.
pub const DEFAULT_SEED: u64 = 67890;

const BASIS: u64 = 0xCBF2_9CE4_8422_2325;
const SEED_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// One multiplier per neighborhood slot, row-major from the top row.
const POSITION_MULTIPLIERS: [u64; 9] = [
    0xBF58_476D_1CE4_E5B9,
    0x94D0_49BB_1331_11EB,
    0xC2B2_AE3D_27D4_EB4F,
    0x1656_67B1_9E37_79F9,
    0x85EB_CA77_C2B2_AE63,
    0x27D4_EB2F_1656_67C5,
    0xFF51_AFD7_ED55_8CCD,
    0xC4CE_B9FE_1A85_EC53,
    0x87C3_7B91_1142_53D5,
];

#[inline]
fn start(seed: u64) -> u64 {
    (BASIS ^ seed).wrapping_mul(SEED_MULTIPLIER)
}

#[inline]
fn fold(h: u64, slot: usize, id: MaterialId) -> u64 {
    (h ^ id.0 as u64).wrapping_mul(POSITION_MULTIPLIERS[slot])
}

/// Fingerprint of nine ids laid out row-major from the top row.
#[inline]
pub fn fingerprint(cells: &[MaterialId; 9], seed: u64) -> u64 {
    let mut h = start(seed);
    for (slot, id) in cells.iter().enumerate() {
        h = fold(h, slot, *id);
    }
    h
}

/// Fingerprint every interior cell of a padded buffer.
///
/// `padded` is `width * height` ids, row-major with row 0 at the bottom, and
/// carries a one-cell halo. `out` receives `(width - 2) * (height - 2)`
/// fingerprints in the same bottom-up order; halo cells get none.
pub fn fingerprint_padded(padded: &[MaterialId], width: usize, height: usize, seed: u64, out: &mut [u64]) {
    debug_assert_eq!(padded.len(), width * height);
    debug_assert!(width >= 3 && height >= 3);
    let inner_w = width - 2;
    debug_assert!(out.len() >= inner_w * (height - 2));

    let base = start(seed);
    for y in 1..height - 1 {
        let above = &padded[(y + 1) * width..(y + 2) * width];
        let here = &padded[y * width..(y + 1) * width];
        let below = &padded[(y - 1) * width..y * width];
        for x in 1..width - 1 {
            let mut h = base;
            h = fold(h, 0, above[x - 1]);
            h = fold(h, 1, above[x]);
            h = fold(h, 2, above[x + 1]);
            h = fold(h, 3, here[x - 1]);
            h = fold(h, 4, here[x]);
            h = fold(h, 5, here[x + 1]);
            h = fold(h, 6, below[x - 1]);
            h = fold(h, 7, below[x]);
            h = fold(h, 8, below[x + 1]);
            out[(y - 1) * inner_w + (x - 1)] = h;
        }
    }
}

/// The nine ids around `(x, y)` of a padded buffer, row-major from the top.
#[inline]
pub fn gather(padded: &[MaterialId], width: usize, x: usize, y: usize) -> [MaterialId; 9] {
    let at = |dx: isize, dy: isize| {
        let row = (y as isize + dy) as usize;
        let col = (x as isize + dx) as usize;
        padded[row * width + col]
    };
    [
        at(-1, 1),
        at(0, 1),
        at(1, 1),
        at(-1, 0),
        at(0, 0),
        at(1, 0),
        at(-1, -1),
        at(0, -1),
        at(1, -1),
    ]
}
