//! Lock-free tick counters.
//!
//! The tick loop updates these with relaxed atomic adds after every step;
//! readers take a [`MetricsSnapshot`] at their own pace.

use crate::tick::TickReport;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::time::Instant;

pub struct Metrics {
    // Monotonic counters
    ticks: AtomicU64,
    regions_scanned: AtomicU64,
    regions_cleared: AtomicU64,
    cells_scanned: AtomicU64,
    actions_applied: AtomicU64,
    chances_failed: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    tick_ns_sum: AtomicU64,

    // Tick duration histogram buckets
    hist_under_100us: AtomicU64,
    hist_100us_1ms: AtomicU64,
    hist_1_10ms: AtomicU64,
    hist_10_100ms: AtomicU64,
    hist_over_100ms: AtomicU64,

    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            regions_scanned: AtomicU64::new(0),
            regions_cleared: AtomicU64::new(0),
            cells_scanned: AtomicU64::new(0),
            actions_applied: AtomicU64::new(0),
            chances_failed: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            tick_ns_sum: AtomicU64::new(0),
            hist_under_100us: AtomicU64::new(0),
            hist_100us_1ms: AtomicU64::new(0),
            hist_1_10ms: AtomicU64::new(0),
            hist_10_100ms: AtomicU64::new(0),
            hist_over_100ms: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Fold one tick report into the counters.
    pub fn record_tick(&self, report: &TickReport) {
        self.ticks.fetch_add(1, Relaxed);
        self.regions_scanned.fetch_add(report.scanned as u64, Relaxed);
        self.regions_cleared.fetch_add(report.cleared as u64, Relaxed);
        self.cells_scanned.fetch_add(report.cells_scanned as u64, Relaxed);
        self.actions_applied.fetch_add(report.actions_applied as u64, Relaxed);
        self.chances_failed.fetch_add(report.chances_failed as u64, Relaxed);
        self.cache_hits.fetch_add(report.cache_hits, Relaxed);
        self.cache_misses.fetch_add(report.cache_misses, Relaxed);
        self.tick_ns_sum
            .fetch_add(report.elapsed.as_nanos() as u64, Relaxed);

        let us = report.elapsed.as_micros() as u64;
        let bucket = match us {
            0..=99 => &self.hist_under_100us,
            100..=999 => &self.hist_100us_1ms,
            1_000..=9_999 => &self.hist_1_10ms,
            10_000..=99_999 => &self.hist_10_100ms,
            _ => &self.hist_over_100ms,
        };
        bucket.fetch_add(1, Relaxed);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Relaxed)
    }

    pub fn snapshot(&self, regions_loaded: u64, regions_dirty: u64) -> MetricsSnapshot {
        let hits = self.cache_hits.load(Relaxed);
        let misses = self.cache_misses.load(Relaxed);
        let lookups = hits + misses;
        MetricsSnapshot {
            uptime_secs: self.started_at.elapsed().as_secs_f64(),
            ticks_total: self.ticks.load(Relaxed),
            regions_scanned: self.regions_scanned.load(Relaxed),
            regions_cleared: self.regions_cleared.load(Relaxed),
            cells_scanned: self.cells_scanned.load(Relaxed),
            actions_applied: self.actions_applied.load(Relaxed),
            chances_failed: self.chances_failed.load(Relaxed),
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
            tick_ns_sum: self.tick_ns_sum.load(Relaxed),
            regions_loaded,
            regions_dirty,
            hist: [
                self.hist_under_100us.load(Relaxed),
                self.hist_100us_1ms.load(Relaxed),
                self.hist_1_10ms.load(Relaxed),
                self.hist_10_100ms.load(Relaxed),
                self.hist_over_100ms.load(Relaxed),
            ],
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of [`Metrics`] at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: f64,
    pub ticks_total: u64,
    pub regions_scanned: u64,
    pub regions_cleared: u64,
    pub cells_scanned: u64,
    pub actions_applied: u64,
    pub chances_failed: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub tick_ns_sum: u64,
    pub regions_loaded: u64,
    pub regions_dirty: u64,
    /// `[<100μs, 100μs-1ms, 1-10ms, 10-100ms, >100ms]`
    pub hist: [u64; 5],
}
