use super::position::RegionPos;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Regions that must be examined on the next tick. Marking only happens at
/// write time, never on the decide path.
#[derive(Default)]
pub struct DirtyTracker {
    pending: Mutex<HashSet<RegionPos>>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<RegionPos>> {
        // A panic while holding the lock cannot leave the set half-updated.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mark(&self, positions: impl IntoIterator<Item = RegionPos>) {
        let mut pending = self.lock();
        pending.extend(positions);
    }

    /// Atomically take every pending region, calling `on_claim` for each one
    /// while the set is still locked.
    pub fn take(&self, mut on_claim: impl FnMut(RegionPos)) -> Vec<RegionPos> {
        let mut pending = self.lock();
        let claimed: Vec<RegionPos> = pending.drain().collect();
        for pos in &claimed {
            on_claim(*pos);
        }
        claimed
    }

    pub fn contains(&self, pos: RegionPos) -> bool {
        self.lock().contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
