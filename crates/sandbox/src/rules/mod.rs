pub mod behaviors;
pub mod helpers;
pub mod physics;

use sandtick_engine::rules::RuleSet;

/// The standard falling-sand rule set: fire, smoke, then density physics.
pub fn standard() -> RuleSet {
    let mut rules = RuleSet::new();
    rules.add(behaviors::fire);
    rules.add(behaviors::smoke);
    rules.add(physics::density);
    rules
}
