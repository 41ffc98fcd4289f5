//! Generic density physics shared by every non-solid material.

use super::helpers::{displaceable, swap};
use sandtick_engine::material::MatterClass;
use sandtick_engine::rules::{Candidate, Flow, Neighborhood};
use sandtick_engine::world::position::Offset;

/// Lighter material rises through the heavier one above it. Otherwise a
/// grounded cell settles diagonally, and fluids spread sideways whether
/// grounded or not.
///
/// Equal densities never swap.
pub fn density(hood: &Neighborhood<'_>, out: &mut Vec<Candidate>) -> Flow {
    let center = hood.center_material();
    if center.is_solid() {
        return Flow::Stop;
    }

    let above = hood.material_at(Offset::UP);
    if !above.is_solid() && center.density < above.density {
        out.push(swap(Offset::UP, 1.0));
        return Flow::Stop;
    }

    let grounded = hood.density(Offset::DOWN) >= center.density;
    if grounded {
        for diagonal in [Offset::DOWN_LEFT, Offset::DOWN_RIGHT] {
            if displaceable(hood, diagonal, center.density) {
                out.push(swap(diagonal, 1.0));
            }
        }
    }

    if matches!(center.class, MatterClass::Gas | MatterClass::Liquid) {
        for side in [Offset::LEFT, Offset::RIGHT] {
            if !displaceable(hood, side, center.density) {
                continue;
            }
            // Room to flow into: lighter cells diagonally beside the target.
            let room = [Offset::new(side.dx, 1), Offset::new(side.dx, -1)]
                .into_iter()
                .filter(|&o| displaceable(hood, o, center.density))
                .count();
            if room > 0 {
                out.push(swap(side, room as f64));
            }
        }
    }
    Flow::Continue
}
