use crate::world::generation::GenerateError;
use crate::world::position::RegionPos;
use thiserror::Error;

/// Recoverable failures surfaced by the world and the tick loop.
///
/// Range violations (bad offsets, unregistered material ids) are not listed
/// here: they are programming errors and panic at the call site.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("generator failed for region ({}, {})", .region.x, .region.y)]
    Generation {
        region: RegionPos,
        #[source]
        source: GenerateError,
    },
    #[error("failed to build the worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
