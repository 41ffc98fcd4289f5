//! Material-specific behaviors: fire and smoke.
//!
//! Both rules own their material's movement and end resolution for it, so
//! the generic density physics never sees fire or smoke.

use super::helpers::{all_diagonals_empty, any_empty_diagonal, burnable_neighbors, swap, turn_into};
use crate::materials::{FIRE, SMOKE};
use sandtick_engine::material::MaterialId;
use sandtick_engine::rules::{Action, Candidate, Flow, Neighborhood};
use sandtick_engine::world::position::Offset;

/// Weight of the spread-and-burn candidate.
pub const BURN_WEIGHT: f64 = 10.0;
/// Chance the flames spread into every burnable neighbor.
pub const SPREAD_CHANCE: f64 = 0.4;
/// Chance, once spread, that one of the burning neighbors is consumed.
pub const CONSUME_CHANCE: f64 = 0.3;
/// Self-extinguish weight contributed by each non-burnable neighbor.
pub const EXTINGUISH_WEIGHT_PER_NEIGHBOR: f64 = 0.02;
/// Weight of fire or smoke drifting upward into empty space.
pub const RISE_WEIGHT: f64 = 5.0;
/// Weight of smoke thinning out to nothing.
pub const DISSIPATE_WEIGHT: f64 = 0.2;

// ── Fire ─────────────────────────────────────────────────────────────────

/// Fire spreads into burnable neighbors as long as it can breathe through
/// an empty diagonal. Otherwise it slowly dies into smoke and rises.
pub fn fire(hood: &Neighborhood<'_>, out: &mut Vec<Candidate>) -> Flow {
    if hood.center() != FIRE {
        return Flow::Continue;
    }

    let burnable = burnable_neighbors(hood);
    if !burnable.is_empty() && any_empty_diagonal(hood) {
        out.push(Candidate::new(burn(hood, burnable), BURN_WEIGHT));
        return Flow::Stop;
    }

    let non_burnable = 8 - burnable.len();
    if non_burnable > 0 {
        out.push(turn_into(SMOKE, EXTINGUISH_WEIGHT_PER_NEIGHBOR * non_burnable as f64));
    }
    if hood.is_empty_at(Offset::UP) {
        out.push(swap(Offset::UP, RISE_WEIGHT));
    }
    Flow::Stop
}

/// Set every burnable neighbor alight, then maybe burn one of them down to
/// its product.
fn burn(hood: &Neighborhood<'_>, targets: Vec<Offset>) -> Action {
    let registry = hood.registry();
    let consumed: Vec<Action> = targets
        .iter()
        .filter_map(|&offset| {
            registry
                .burn_product(hood.id_at(offset))
                .map(|product| Action::convert(offset, product))
        })
        .collect();

    Action::chance(
        Action::AllOf(vec![
            Action::convert_many(targets, FIRE),
            Action::chance(Action::OneOf(consumed), CONSUME_CHANCE),
        ]),
        SPREAD_CHANCE,
    )
}

// ── Smoke ────────────────────────────────────────────────────────────────

/// Smoke rises through empty space and thins out once nothing surrounds it
/// diagonally.
pub fn smoke(hood: &Neighborhood<'_>, out: &mut Vec<Candidate>) -> Flow {
    if hood.center() != SMOKE {
        return Flow::Continue;
    }

    if hood.is_empty_at(Offset::UP) {
        out.push(swap(Offset::UP, RISE_WEIGHT));
    }
    if all_diagonals_empty(hood) {
        out.push(turn_into(MaterialId::EMPTY, DISSIPATE_WEIGHT));
    }
    Flow::Stop
}
