//! Demo scene: a falling sand block, a walled water pool and a burning tree,
//! all standing on the floor.

use crate::config::DemoConfig;
use crate::materials::{FIRE, LEAVES, SAND, STONE, WATER, WOOD};
use sandtick_engine::WorldError;
use sandtick_engine::world::World;
use sandtick_engine::world::position::WorldPos;

/// Place the demo scene with its base at world row `ground`.
pub fn build(world: &World, ground: i64, demo: &DemoConfig) -> Result<(), WorldError> {
    world.batch_set_blocks(|batch| {
        // Sand block hanging in the air.
        let lift = ground + 24;
        for y in lift..lift + demo.sand_size {
            for x in 0..demo.sand_size {
                batch.set(WorldPos::new(x, y), SAND);
            }
        }

        // Stone basin, filled to just below the rim.
        let left = demo.sand_size + 8;
        let right = left + demo.pool_width + 1;
        for y in ground..ground + 6 {
            batch.set(WorldPos::new(left, y), STONE);
            batch.set(WorldPos::new(right, y), STONE);
        }
        for y in ground..ground + 4 {
            for x in left + 1..right {
                batch.set(WorldPos::new(x, y), WATER);
            }
        }

        // Tree with a crown of leaves, lit at the crown.
        let trunk = -12;
        let top = ground + demo.tree_height;
        for y in ground..top {
            batch.set(WorldPos::new(trunk, y), WOOD);
        }
        for dy in 0..3 {
            for dx in -2..=2 {
                batch.set(WorldPos::new(trunk + dx, top + dy), LEAVES);
            }
        }
        batch.set(WorldPos::new(trunk + 3, top + 1), FIRE);
    })
}
