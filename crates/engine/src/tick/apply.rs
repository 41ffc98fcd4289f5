//! Sequential apply phase: executes selected actions against the world.

use crate::error::WorldError;
use crate::rules::Action;
use crate::world::World;
use crate::world::position::{RegionPos, WorldPos};
use rand::Rng;

/// One unit of work chosen during the decide phase.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    /// An action selected for the cell at the key position.
    Cell(Action),
    /// Wipe a region that has fallen below the world floor.
    ClearRegion(RegionPos),
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ApplyStats {
    pub actions: usize,
    pub chances_failed: usize,
}

pub(crate) fn execute_pending(
    world: &World,
    origin: WorldPos,
    pending: &Pending,
    rng: &mut impl Rng,
    stats: &mut ApplyStats,
) -> Result<(), WorldError> {
    match pending {
        Pending::Cell(action) => {
            stats.actions += 1;
            execute(world, origin, action, rng, stats)
        }
        Pending::ClearRegion(region) => {
            world.clear_region(*region);
            Ok(())
        }
    }
}

/// Execute one action relative to `origin`. Chance rolls and one-of picks
/// are drawn here, not when the action was selected.
pub(crate) fn execute(
    world: &World,
    origin: WorldPos,
    action: &Action,
    rng: &mut impl Rng,
    stats: &mut ApplyStats,
) -> Result<(), WorldError> {
    match action {
        Action::Swap(offset) => world.swap_blocks(origin, origin.offset(*offset)),
        Action::Convert { targets, material } => {
            for target in targets {
                world.set_block(origin.offset(*target), *material)?;
            }
            Ok(())
        }
        Action::Chance {
            action,
            probability,
        } => {
            if rng.random::<f64>() < *probability {
                execute(world, origin, action, rng, stats)
            } else {
                stats.chances_failed += 1;
                world.require_tick(origin);
                Ok(())
            }
        }
        Action::OneOf(choices) => {
            if choices.is_empty() {
                return Ok(());
            }
            let pick = rng.random_range(0..choices.len());
            execute(world, origin, &choices[pick], rng, stats)
        }
        Action::AllOf(children) => {
            for child in children {
                execute(world, origin, child, rng, stats)?;
            }
            Ok(())
        }
    }
}
