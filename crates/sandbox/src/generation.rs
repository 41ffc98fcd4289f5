//! Terrain: a bedrock slab with the odd sand pile on top.

use crate::materials::{BEDROCK, SAND};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sandtick_engine::world::generation::{GenerateResult, GenerationUnit, Generator};
use sandtick_engine::world::position::WorldPos;
use serde::{Deserialize, Serialize};

/// Parameters for [`FloorGenerator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    /// Bedrock fills world rows `0..height`.
    pub height: i64,
    /// Per-column probability of a sand pile on top of the bedrock.
    pub pile_chance: f64,
    /// Tallest pile, in cells. Piles are 1..=max_pile tall.
    pub max_pile: i64,
    pub seed: u64,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            height: 16,
            pile_chance: 0.1,
            max_pile: 3,
            seed: 0,
        }
    }
}

pub struct FloorGenerator {
    config: FloorConfig,
}

impl FloorGenerator {
    pub fn new(config: FloorConfig) -> Self {
        Self { config }
    }

    /// Same region, same terrain: the RNG is derived from the seed and the
    /// region coordinate.
    fn rng_for(&self, unit: &GenerationUnit<'_>) -> SmallRng {
        let region = unit.region();
        let key = ((region.x as u32 as u64) << 32) | region.y as u32 as u64;
        SmallRng::seed_from_u64(self.config.seed ^ key.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

impl Default for FloorGenerator {
    fn default() -> Self {
        Self::new(FloorConfig::default())
    }
}

impl Generator for FloorGenerator {
    fn generate(&self, unit: &mut GenerationUnit<'_>) -> GenerateResult {
        let FloorConfig {
            height,
            pile_chance,
            max_pile,
            ..
        } = self.config;
        if height <= 0 || unit.max().y <= 0 || unit.min().y >= height {
            return Ok(());
        }

        unit.fill_rows(0..height, BEDROCK);

        // Piles sit on the top row of bedrock, so only the region holding
        // that row places them. They may spill into the region above.
        if !unit.contains_y(height - 1) || max_pile <= 0 {
            return Ok(());
        }
        let mut rng = self.rng_for(unit);
        for x in unit.min().x..unit.max().x {
            if rng.random::<f64>() >= pile_chance {
                continue;
            }
            let pile = rng.random_range(1..=max_pile);
            let mut placer = unit.fork(WorldPos::new(x, height));
            for dy in 0..pile {
                placer.set(0, dy, SAND);
            }
        }
        Ok(())
    }
}
