//! Scheduler tests with hand-written rules over an opaque catalog: claim,
//! decide, ordered apply, chance retries, floor clearing and the cache.

use sandtick_engine::cache::ResolutionCache;
use sandtick_engine::hash::{DEFAULT_SEED, fingerprint};
use sandtick_engine::material::{MaterialDef, MaterialId, MaterialRegistry, MatterClass};
use sandtick_engine::rules::{Action, Candidate, Flow, Neighborhood, RuleSet};
use sandtick_engine::tick::TickScheduler;
use sandtick_engine::world::World;
use sandtick_engine::world::generation::{GenerateResult, GenerationUnit, Generator};
use sandtick_engine::world::position::{Offset, RegionPos, WorldPos};
use sandtick_engine::{EngineConfig, Simulation, WorldError};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const EMPTY: MaterialId = MaterialId::EMPTY;
const ROCK: MaterialId = MaterialId(1);
const GRAIN: MaterialId = MaterialId(2);
const SEED: MaterialId = MaterialId(3);
const SPROUT: MaterialId = MaterialId(4);

fn registry() -> Arc<MaterialRegistry> {
    Arc::new(
        MaterialRegistry::builder()
            .material(MaterialDef::new("empty", MatterClass::Gas, 1.0))
            .material(MaterialDef::new("rock", MatterClass::Solid, 10.0))
            .material(MaterialDef::new("grain", MatterClass::Powder, 5.0))
            .material(MaterialDef::new("seed", MatterClass::Solid, 3.0))
            .material(MaterialDef::new("sprout", MatterClass::Solid, 3.0))
            .build()
            .unwrap(),
    )
}

fn config() -> EngineConfig {
    EngineConfig {
        worker_threads: 2,
        rng_seed: Some(7),
        ..EngineConfig::default()
    }
}

/// Grain sinks through anything that isn't rock.
fn sink(hood: &Neighborhood<'_>, out: &mut Vec<Candidate>) -> Flow {
    if hood.center() == GRAIN && hood.id_at(Offset::DOWN) != ROCK && hood.id_at(Offset::DOWN) != GRAIN {
        out.push(Candidate::new(Action::swap(Offset::DOWN), 1.0));
    }
    Flow::Continue
}

/// Grain stacked on grain also sinks, so a falling column moves as one.
fn sink_through_grain(hood: &Neighborhood<'_>, out: &mut Vec<Candidate>) -> Flow {
    if hood.center() == GRAIN && hood.id_at(Offset::DOWN) == GRAIN {
        out.push(Candidate::new(Action::swap(Offset::DOWN), 1.0));
    }
    Flow::Stop
}

fn never_sprout(hood: &Neighborhood<'_>, out: &mut Vec<Candidate>) -> Flow {
    if hood.center() == SEED {
        let grow = Action::convert(Offset::CENTER, SPROUT);
        out.push(Candidate::new(Action::chance(grow, 0.0), 1.0));
    }
    Flow::Stop
}

fn always_sprout(hood: &Neighborhood<'_>, out: &mut Vec<Candidate>) -> Flow {
    if hood.center() == SEED {
        let grow = Action::convert_many(vec![Offset::CENTER, Offset::UP], SPROUT);
        out.push(Candidate::new(Action::chance(grow, 1.0), 1.0));
    }
    Flow::Stop
}

fn falling() -> RuleSet {
    RuleSet::new().with(sink)
}

fn column(world: &World, x: i64, ys: std::ops::Range<i64>) -> Vec<MaterialId> {
    ys.map(|y| world.get_block(WorldPos::new(x, y))).collect()
}

// ---------------------------------------------------------------------------
// Claim / decide / apply
// ---------------------------------------------------------------------------

#[test]
fn idle_world_ticks_to_an_empty_report() {
    let world = World::empty(registry());
    let mut scheduler = TickScheduler::new(&config(), falling()).unwrap();
    let report = scheduler.tick(&world).unwrap();
    assert_eq!(report.claimed, 0);
    assert_eq!(report.actions_applied, 0);
}

#[test]
fn grain_falls_one_cell_per_tick_until_it_lands() {
    let world = World::empty(registry());
    world.set_block(WorldPos::new(3, 0), ROCK).unwrap();
    world.set_block(WorldPos::new(3, 5), GRAIN).unwrap();

    let mut scheduler = TickScheduler::new(&config(), falling()).unwrap();
    for expected_y in (1..5).rev() {
        let report = scheduler.tick(&world).unwrap();
        assert_eq!(report.actions_applied, 1);
        assert_eq!(world.get_block(WorldPos::new(3, expected_y)), GRAIN);
    }

    let report = scheduler.tick(&world).unwrap();
    assert_eq!(report.actions_applied, 0);
    assert_eq!(world.dirty_count(), 0);
    assert_eq!(world.get_block(WorldPos::new(3, 1)), GRAIN);
}

#[test]
fn grain_crosses_region_boundaries() {
    let world = World::empty(registry());
    world.set_block(WorldPos::new(0, 10), ROCK).unwrap();
    world.set_block(WorldPos::new(0, 18), GRAIN).unwrap();

    let mut scheduler = TickScheduler::new(&config(), falling()).unwrap();
    for _ in 0..20 {
        scheduler.tick(&world).unwrap();
    }
    assert_eq!(world.get_block(WorldPos::new(0, 11)), GRAIN);
    assert_eq!(world.get_block(WorldPos::new(0, 18)), EMPTY);
}

#[test]
fn stacked_swaps_apply_bottom_up_and_conserve_material() {
    let world = World::empty(registry());
    world
        .batch_set_blocks(|batch| {
            batch.set(WorldPos::new(0, 0), ROCK);
            batch.set(WorldPos::new(0, 2), GRAIN);
            batch.set(WorldPos::new(0, 3), GRAIN);
        })
        .unwrap();

    let rules = RuleSet::new().with(sink).with(sink_through_grain);
    let mut scheduler = TickScheduler::new(&config(), rules).unwrap();
    let report = scheduler.tick(&world).unwrap();

    assert_eq!(report.actions_applied, 2);
    assert_eq!(
        column(&world, 0, 0..5),
        vec![ROCK, GRAIN, GRAIN, EMPTY, EMPTY]
    );
}

#[test]
fn every_cell_gets_at_most_one_action() {
    let world = World::empty(registry());
    world
        .batch_set_blocks(|batch| {
            for x in 0..32 {
                batch.set(WorldPos::new(x, 0), ROCK);
                batch.set(WorldPos::new(x, 4), GRAIN);
            }
        })
        .unwrap();

    let mut scheduler = TickScheduler::new(&config(), falling()).unwrap();
    let report = scheduler.tick(&world).unwrap();
    assert_eq!(report.actions_applied, 32);
    assert!(column(&world, 7, 0..6) == vec![ROCK, EMPTY, EMPTY, GRAIN, EMPTY, EMPTY]);
}

// ---------------------------------------------------------------------------
// Chance
// ---------------------------------------------------------------------------

#[test]
fn failed_chance_requeues_its_region() {
    let world = World::empty(registry());
    world.set_block(WorldPos::new(5, 5), SEED).unwrap();

    let mut scheduler = TickScheduler::new(&config(), RuleSet::new().with(never_sprout)).unwrap();
    for _ in 0..3 {
        let report = scheduler.tick(&world).unwrap();
        assert_eq!(report.chances_failed, 1);
        assert!(world.is_dirty(RegionPos::new(0, 0)));
    }
    assert_eq!(world.get_block(WorldPos::new(5, 5)), SEED);
}

#[test]
fn successful_chance_converts_every_target() {
    let world = World::empty(registry());
    world.set_block(WorldPos::new(5, 15), SEED).unwrap();

    let mut scheduler = TickScheduler::new(&config(), RuleSet::new().with(always_sprout)).unwrap();
    let report = scheduler.tick(&world).unwrap();
    assert_eq!(report.chances_failed, 0);
    assert_eq!(world.get_block(WorldPos::new(5, 15)), SPROUT);
    assert_eq!(world.get_block(WorldPos::new(5, 16)), SPROUT);
}

// ---------------------------------------------------------------------------
// Floor and failure
// ---------------------------------------------------------------------------

#[test]
fn regions_below_floor_are_cleared() {
    let world = World::empty(registry());
    world.set_block(WorldPos::new(2, -3), GRAIN).unwrap();
    world.set_block(WorldPos::new(9, -12), ROCK).unwrap();

    let mut scheduler = TickScheduler::new(&config(), falling()).unwrap();
    let report = scheduler.tick(&world).unwrap();
    assert_eq!(report.cleared, 1);
    assert_eq!(report.scanned, 0);
    assert_eq!(world.get_block(WorldPos::new(2, -3)), EMPTY);
    assert_eq!(world.get_block(WorldPos::new(9, -12)), EMPTY);
}

struct FailingGenerator(RegionPos);

impl Generator for FailingGenerator {
    fn generate(&self, unit: &mut GenerationUnit<'_>) -> GenerateResult {
        if unit.region() == self.0 {
            return Err("no terrain here".into());
        }
        Ok(())
    }
}

#[test]
fn halo_generation_failure_aborts_the_tick() {
    let world = World::new(registry(), Box::new(FailingGenerator(RegionPos::new(1, 0))));
    world.set_block(WorldPos::new(4, 4), GRAIN).unwrap();

    let mut scheduler = TickScheduler::new(&config(), falling()).unwrap();
    match scheduler.tick(&world) {
        Err(WorldError::Generation { region, .. }) => assert_eq!(region, RegionPos::new(1, 0)),
        other => panic!("expected generation failure, got {other:?}"),
    }
    assert_eq!(world.get_block(WorldPos::new(4, 4)), GRAIN);
}

#[test]
fn unloaded_dirty_region_is_skipped() {
    let world = World::empty(registry());
    world.set_block(WorldPos::new(3, 3), GRAIN).unwrap();
    assert!(world.unload_region(RegionPos::new(0, 0)));

    let mut scheduler = TickScheduler::new(&config(), falling()).unwrap();
    let report = scheduler.tick(&world).unwrap();
    assert_eq!(report.claimed, 1);
    assert_eq!(report.skipped_missing, 1);
    assert_eq!(report.scanned, 0);
    assert!(!world.has_region(RegionPos::new(0, 0)));
}

// ---------------------------------------------------------------------------
// Concurrent region creation
// ---------------------------------------------------------------------------

/// Records every region it generates. The short sleep widens the window
/// in which two workers could race on the same halo region.
#[derive(Default)]
struct RecordingGenerator {
    seen: Arc<Mutex<Vec<RegionPos>>>,
}

impl Generator for RecordingGenerator {
    fn generate(&self, unit: &mut GenerationUnit<'_>) -> GenerateResult {
        std::thread::sleep(Duration::from_millis(2));
        self.seen.lock().unwrap().push(unit.region());
        Ok(())
    }
}

#[test]
fn shared_halo_regions_are_generated_once_across_workers() {
    let generator = RecordingGenerator::default();
    let seen = Arc::clone(&generator.seen);
    let world = World::new(registry(), Box::new(generator));

    // Checkerboard of loaded regions: every missing region between them is
    // a cardinal halo of up to four dirty regions.
    for ry in 0..6i64 {
        for rx in 0..6i64 {
            if (rx + ry) % 2 == 0 {
                world.set_block(WorldPos::new(rx * 16 + 8, ry * 16 + 8), ROCK).unwrap();
            }
        }
    }
    assert_eq!(world.region_count(), 18);

    let config = EngineConfig {
        worker_threads: 8,
        ..config()
    };
    let mut scheduler = TickScheduler::new(&config, RuleSet::new()).unwrap();
    let report = scheduler.tick(&world).unwrap();
    assert_eq!(report.scanned, 18);

    let seen = seen.lock().unwrap();
    let unique: HashSet<RegionPos> = seen.iter().copied().collect();
    assert_eq!(unique.len(), seen.len(), "a region was generated twice");
    assert_eq!(seen.len(), world.region_count());
    // 18 loaded + 18 interior gaps + 12 outer ring halos.
    assert_eq!(world.region_count(), 48);
}

// ---------------------------------------------------------------------------
// Resolution cache
// ---------------------------------------------------------------------------

#[test]
fn cache_serves_repeated_neighborhoods() {
    let registry = registry();
    let rules = falling();
    let mut cache = ResolutionCache::with_capacity(16);

    let cells = [EMPTY, EMPTY, EMPTY, EMPTY, GRAIN, EMPTY, EMPTY, EMPTY, EMPTY];
    let key = fingerprint(&cells, DEFAULT_SEED);
    let first = cache.resolve(key, &rules, || Neighborhood::new(cells, &registry));
    let second = cache.resolve(key, &rules, || panic!("rules re-run on a cache hit"));

    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!((cache.hits(), cache.misses()), (1, 1));
}

#[test]
fn cache_resets_when_full() {
    let registry = registry();
    let rules = falling();
    let mut cache = ResolutionCache::with_capacity(2);
    for id in 0..3u16 {
        let cells = [MaterialId(id); 9];
        cache.resolve(fingerprint(&cells, DEFAULT_SEED), &rules, || {
            Neighborhood::new(cells, &registry)
        });
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn tick_reports_cache_traffic_for_every_cell() {
    let world = World::empty(registry());
    world.set_block(WorldPos::new(0, 0), ROCK).unwrap();

    let mut scheduler = TickScheduler::new(&config(), falling()).unwrap();
    let report = scheduler.tick(&world).unwrap();
    assert_eq!(report.scanned, 1);
    assert_eq!(report.cells_scanned, 256);
    assert_eq!(report.cache_hits + report.cache_misses, 256);
    assert!(report.cache_hits > report.cache_misses);
}

// ---------------------------------------------------------------------------
// Simulation facade
// ---------------------------------------------------------------------------

#[test]
fn simulation_counts_ticks_and_records_metrics() {
    let mut sim = Simulation::new(
        config(),
        registry(),
        Box::new(sandtick_engine::world::generation::EmptyGenerator),
        falling(),
    )
    .unwrap();
    sim.world().set_block(WorldPos::new(0, 0), ROCK).unwrap();
    sim.world().set_block(WorldPos::new(0, 3), GRAIN).unwrap();

    for _ in 0..4 {
        sim.tick().unwrap();
    }
    assert_eq!(sim.tick_count(), 4);
    assert_eq!(sim.world().get_block(WorldPos::new(0, 1)), GRAIN);

    let snapshot = sim.snapshot();
    assert_eq!(snapshot.ticks_total, 4);
    assert_eq!(snapshot.actions_applied, 2);
    assert_eq!(snapshot.hist.iter().sum::<u64>(), 4);
}
