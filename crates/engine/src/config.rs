use crate::cache::DEFAULT_CAPACITY;
use crate::hash::DEFAULT_SEED;
use serde::{Deserialize, Serialize};

/// Tunables for the tick engine. Every field has a default, so partial
/// configuration files deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed folded into every neighborhood fingerprint.
    pub hash_seed: u64,
    /// Region rows strictly below this are cleared instead of ticked.
    pub world_floor: i32,
    /// Decide-phase worker count; 0 lets rayon pick.
    pub worker_threads: usize,
    /// Per-worker resolution cache entries before a wholesale reset.
    pub cache_capacity: usize,
    /// Fixed seed for selection and apply-phase randomness. Random if unset.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_seed: DEFAULT_SEED,
            world_floor: 0,
            worker_threads: 0,
            cache_capacity: DEFAULT_CAPACITY,
            rng_seed: None,
        }
    }
}
