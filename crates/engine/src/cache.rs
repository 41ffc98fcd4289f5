//! Per-worker memo of rule output keyed by neighborhood fingerprint.
//!
//! Valid only because rule output depends on nothing but the nine material
//! ids. Each worker owns its own cache, so there is no locking here.

use crate::rules::{Candidate, Neighborhood, RuleSet};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_CAPACITY: usize = 1 << 16;

pub struct ResolutionCache {
    entries: HashMap<u64, Arc<[Candidate]>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl ResolutionCache {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Cached candidates for `fingerprint`, running `rules` on the
    /// neighborhood produced by `neighborhood` only on a miss.
    pub fn resolve<'r>(
        &mut self,
        fingerprint: u64,
        rules: &RuleSet,
        neighborhood: impl FnOnce() -> Neighborhood<'r>,
    ) -> Arc<[Candidate]> {
        if let Some(hit) = self.entries.get(&fingerprint) {
            self.hits += 1;
            return Arc::clone(hit);
        }

        self.misses += 1;
        let resolved: Arc<[Candidate]> = rules.resolve(&neighborhood()).into();
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.entries.insert(fingerprint, Arc::clone(&resolved));
        resolved
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Return and zero the hit/miss counters.
    pub fn take_counts(&mut self) -> (u64, u64) {
        let counts = (self.hits, self.misses);
        self.hits = 0;
        self.misses = 0;
        counts
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
