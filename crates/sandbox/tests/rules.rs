//! Rule resolution properties of the standard falling-sand rule set.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sandtick_engine::material::{MaterialId, MaterialRegistry};
use sandtick_engine::rules::{Action, Candidate, Neighborhood};
use sandtick_engine::world::position::Offset;
use sandtick_sandbox::materials::*;
use sandtick_sandbox::rules::{self, behaviors};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn catalog() -> MaterialRegistry {
    sandtick_sandbox::materials::registry().unwrap()
}

/// Neighborhood around `center`, filled with `fill` except for `overrides`.
fn hood<'a>(
    registry: &'a MaterialRegistry,
    center: MaterialId,
    fill: MaterialId,
    overrides: &[(Offset, MaterialId)],
) -> Neighborhood<'a> {
    Neighborhood::from_fn(registry, |offset| {
        if offset == Offset::CENTER {
            return center;
        }
        overrides
            .iter()
            .find(|(o, _)| *o == offset)
            .map_or(fill, |(_, id)| *id)
    })
}

fn resolve(hood: &Neighborhood<'_>) -> Vec<Candidate> {
    rules::standard().resolve(hood)
}

fn swaps(candidates: &[Candidate]) -> Vec<Offset> {
    candidates
        .iter()
        .filter_map(|c| match c.action {
            Action::Swap(offset) => Some(offset),
            _ => None,
        })
        .collect()
}

fn random_hood<'a>(registry: &'a MaterialRegistry, rng: &mut SmallRng) -> Neighborhood<'a> {
    let count = registry.len() as u16;
    Neighborhood::from_fn(registry, |_| MaterialId(rng.random_range(0..count)))
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn identical_neighborhoods_resolve_identically() {
    let registry = catalog();
    let mut rng = SmallRng::seed_from_u64(2024);
    for _ in 0..2_000 {
        let a = random_hood(&registry, &mut rng);
        let b = Neighborhood::new(*a.cells(), &registry);
        assert_eq!(resolve(&a), resolve(&b), "diverged on {a:?}");
    }
}

// ---------------------------------------------------------------------------
// Density physics
// ---------------------------------------------------------------------------

#[test]
fn solids_never_move() {
    let registry = catalog();
    let mut rng = SmallRng::seed_from_u64(7);
    for solid in [STONE, BEDROCK, WOOD, LEAVES, BRANCHES] {
        for _ in 0..500 {
            let random = random_hood(&registry, &mut rng);
            let mut cells = *random.cells();
            cells[4] = solid;
            let hood = Neighborhood::new(cells, &registry);
            assert!(resolve(&hood).is_empty(), "solid moved in {hood:?}");
        }
    }
}

#[test]
fn lighter_material_below_heavier_swaps_up_and_nothing_else() {
    let registry = catalog();
    for (center, above) in [(AIR, SAND), (AIR, WATER), (WATER, SAND), (STEAM, AIR), (CHARCOAL, DIRT)] {
        let hood = hood(&registry, center, AIR, &[(Offset::UP, above)]);
        let candidates = resolve(&hood);
        assert_eq!(candidates.len(), 1, "{hood:?}");
        assert_eq!(candidates[0].action, Action::Swap(Offset::UP));
    }
}

#[test]
fn air_does_not_rise_into_solid_or_equal_density() {
    let registry = catalog();
    let under_stone = hood(&registry, AIR, AIR, &[(Offset::UP, STONE)]);
    assert!(!swaps(&resolve(&under_stone)).contains(&Offset::UP));

    let above_water = hood(&registry, AIR, AIR, &[(Offset::DOWN, WATER)]);
    assert!(!swaps(&resolve(&above_water)).contains(&Offset::UP));
}

#[test]
fn grounded_powder_settles_diagonally_but_not_sideways() {
    let registry = catalog();
    let hood = hood(&registry, SAND, AIR, &[(Offset::DOWN, SAND)]);
    let moves = swaps(&resolve(&hood));
    assert!(moves.contains(&Offset::DOWN_LEFT));
    assert!(moves.contains(&Offset::DOWN_RIGHT));
    assert!(!moves.contains(&Offset::LEFT));
    assert!(!moves.contains(&Offset::RIGHT));
}

#[test]
fn powder_over_denser_ground_stays_put_when_boxed_in() {
    let registry = catalog();
    let hood = hood(
        &registry,
        SAND,
        AIR,
        &[
            (Offset::DOWN, STONE),
            (Offset::DOWN_LEFT, STONE),
            (Offset::DOWN_RIGHT, SAND),
        ],
    );
    assert!(resolve(&hood).is_empty());
}

#[test]
fn liquid_on_the_ground_flows_sideways() {
    let registry = catalog();
    let floor = [
        (Offset::DOWN_LEFT, STONE),
        (Offset::DOWN, STONE),
        (Offset::DOWN_RIGHT, STONE),
    ];
    let candidates = resolve(&hood(&registry, WATER, AIR, &floor));
    let sideways: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| matches!(c.action, Action::Swap(o) if o == Offset::LEFT || o == Offset::RIGHT))
        .collect();
    assert_eq!(sideways.len(), 2);
    // Only the cell above the target is open; below it is stone.
    assert!(sideways.iter().all(|c| c.weight == 1.0));
}

#[test]
fn liquid_under_a_ceiling_flows_sideways_while_falling() {
    let registry = catalog();
    let ceiling = [
        (Offset::UP_LEFT, BEDROCK),
        (Offset::UP, BEDROCK),
        (Offset::UP_RIGHT, BEDROCK),
    ];
    let candidates = resolve(&hood(&registry, WATER, AIR, &ceiling));
    let moves = swaps(&candidates);
    assert!(moves.contains(&Offset::LEFT), "{candidates:?}");
    assert!(moves.contains(&Offset::RIGHT), "{candidates:?}");
    // Air below: not grounded, so no diagonal settling.
    assert!(!moves.contains(&Offset::DOWN_LEFT));
    assert!(!moves.contains(&Offset::DOWN_RIGHT));
}

#[test]
fn water_over_lighter_solid_is_not_grounded() {
    let registry = catalog();
    let candidates = resolve(&hood(
        &registry,
        WATER,
        AIR,
        &[
            (Offset::UP_LEFT, STONE),
            (Offset::UP, STONE),
            (Offset::UP_RIGHT, STONE),
            (Offset::DOWN, WOOD),
        ],
    ));
    let moves = swaps(&candidates);
    let settling = moves
        .iter()
        .filter(|o| **o == Offset::DOWN_LEFT || **o == Offset::DOWN_RIGHT)
        .count();
    assert_eq!(settling, 0, "{candidates:?}");
    assert!(moves.contains(&Offset::LEFT));
    assert!(moves.contains(&Offset::RIGHT));
}

#[test]
fn sideways_flow_needs_room_beside_the_target() {
    let registry = catalog();
    let candidates = resolve(&hood(
        &registry,
        WATER,
        STONE,
        &[(Offset::LEFT, AIR), (Offset::UP, AIR)],
    ));
    assert!(!swaps(&candidates).contains(&Offset::LEFT));
}

#[test]
fn powder_with_air_beside_it_does_not_flow() {
    let registry = catalog();
    let floor = [
        (Offset::DOWN_LEFT, STONE),
        (Offset::DOWN, STONE),
        (Offset::DOWN_RIGHT, STONE),
    ];
    assert!(resolve(&hood(&registry, SAND, AIR, &floor)).is_empty());
}

// ---------------------------------------------------------------------------
// Fire
// ---------------------------------------------------------------------------

fn is_burn(action: &Action) -> bool {
    match action {
        Action::Chance { action, .. } => match action.as_ref() {
            Action::AllOf(parts) => matches!(
                parts.first(),
                Some(Action::Convert { material, .. }) if *material == FIRE
            ),
            _ => false,
        },
        _ => false,
    }
}

#[test]
fn fire_next_to_wood_with_air_spreads() {
    let registry = catalog();
    let candidates = resolve(&hood(&registry, FIRE, AIR, &[(Offset::LEFT, WOOD)]));

    assert_eq!(candidates.len(), 1);
    let burn = &candidates[0];
    assert!(is_burn(&burn.action));
    assert_eq!(burn.weight, behaviors::BURN_WEIGHT);
    assert!(burn.action.any(|a| matches!(
        a,
        Action::Convert { targets, material } if *material == CHARCOAL && targets == &vec![Offset::LEFT]
    )));
}

#[test]
fn fire_converts_each_burnable_into_its_own_product() {
    let registry = catalog();
    let candidates = resolve(&hood(
        &registry,
        FIRE,
        AIR,
        &[(Offset::LEFT, WOOD), (Offset::UP, LEAVES), (Offset::DOWN, WATER)],
    ));
    let action = &candidates[0].action;
    for product in [CHARCOAL, SMOKE, STEAM] {
        assert!(action.any(|a| matches!(a, Action::Convert { material, .. } if *material == product)));
    }
}

#[test]
fn fire_without_empty_diagonal_does_not_spread() {
    let registry = catalog();
    let candidates = resolve(&hood(&registry, FIRE, STONE, &[(Offset::LEFT, WOOD)]));
    assert!(candidates.iter().all(|c| !is_burn(&c.action)));
}

#[test]
fn isolated_fire_smolders_and_rises() {
    let registry = catalog();
    let candidates = resolve(&hood(&registry, FIRE, AIR, &[]));

    let smoke = candidates
        .iter()
        .find(|c| c.action == Action::convert(Offset::CENTER, SMOKE))
        .expect("fire should be able to die into smoke");
    assert!((smoke.weight - 8.0 * behaviors::EXTINGUISH_WEIGHT_PER_NEIGHBOR).abs() < 1e-12);

    let rise = candidates
        .iter()
        .find(|c| c.action == Action::Swap(Offset::UP))
        .expect("fire should rise into air");
    assert!(rise.weight > 1.0);
}

// ---------------------------------------------------------------------------
// Smoke
// ---------------------------------------------------------------------------

#[test]
fn smoke_dissipates_only_with_every_diagonal_empty() {
    let registry = catalog();
    let dissipate = Action::convert(Offset::CENTER, MaterialId::EMPTY);

    let open = resolve(&hood(&registry, SMOKE, AIR, &[]));
    let candidate = open
        .iter()
        .find(|c| c.action == dissipate)
        .expect("open smoke should dissipate");
    assert_eq!(candidate.weight, 0.2);

    for diagonal in Offset::DIAGONALS {
        let blocked = resolve(&hood(&registry, SMOKE, AIR, &[(diagonal, STONE)]));
        assert!(blocked.iter().all(|c| c.action != dissipate), "{diagonal:?}");
    }
}

#[test]
fn smoke_rises_into_empty_space() {
    let registry = catalog();
    let candidates = resolve(&hood(&registry, SMOKE, AIR, &[]));
    let rise = candidates
        .iter()
        .find(|c| c.action == Action::Swap(Offset::UP))
        .expect("smoke should rise");
    assert!(rise.weight > 1.0);

    let capped = resolve(&hood(&registry, SMOKE, AIR, &[(Offset::UP, STONE)]));
    assert!(!swaps(&capped).contains(&Offset::UP));
}
