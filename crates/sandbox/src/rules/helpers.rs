//! Candidate construction helpers to reduce boilerplate in rule bodies.

use sandtick_engine::material::MaterialId;
use sandtick_engine::rules::{Action, Candidate, Neighborhood};
use sandtick_engine::world::position::Offset;

// ── Candidate constructors ───────────────────────────────────────────────

/// Swap the center with `offset`.
pub fn swap(offset: Offset, weight: f64) -> Candidate {
    Candidate::new(Action::swap(offset), weight)
}

/// Turn the center cell into `material`.
pub fn turn_into(material: MaterialId, weight: f64) -> Candidate {
    Candidate::new(Action::convert(Offset::CENTER, material), weight)
}

// ── Neighborhood queries ─────────────────────────────────────────────────

/// Non-solid and strictly lighter than `density`: something that can be
/// displaced by a heavier cell.
pub fn displaceable(hood: &Neighborhood<'_>, offset: Offset, density: f64) -> bool {
    let material = hood.material_at(offset);
    !material.is_solid() && material.density < density
}

/// Offsets among the eight neighbors holding a burnable material.
pub fn burnable_neighbors(hood: &Neighborhood<'_>) -> Vec<Offset> {
    let registry = hood.registry();
    hood.neighbors()
        .filter(|(_, id)| registry.is_burnable(*id))
        .map(|(offset, _)| offset)
        .collect()
}

pub fn any_empty_diagonal(hood: &Neighborhood<'_>) -> bool {
    hood.diagonals().any(|(_, id)| id == MaterialId::EMPTY)
}

pub fn all_diagonals_empty(hood: &Neighborhood<'_>) -> bool {
    hood.diagonals().all(|(_, id)| id == MaterialId::EMPTY)
}
