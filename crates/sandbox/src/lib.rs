//! Falling-sand world on top of `sandtick-engine`: the material catalog,
//! the rule set, floor terrain and configuration for the demo binary.

pub mod config;
pub mod generation;
pub mod materials;
pub mod rules;
pub mod scene;
