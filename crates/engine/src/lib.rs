//! Chunked falling-sand tick engine.
//!
//! The world is a sparse map of fixed-size regions. Each [`tick`] claims the
//! regions marked dirty by the previous step, resolves one weighted action
//! per cell from the 3x3 neighborhood (memoized by fingerprint), and applies
//! the chosen actions bottom row first on the calling thread.

pub mod cache;
pub mod config;
pub mod error;
pub mod hash;
pub mod material;
pub mod metrics;
pub mod rules;
pub mod simulation;
pub mod tick;
pub mod world;

pub use config::EngineConfig;
pub use error::WorldError;
pub use material::{Material, MaterialDef, MaterialId, MaterialRegistry, MatterClass};
pub use simulation::Simulation;
pub use world::World;
