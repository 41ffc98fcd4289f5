//! One simulation step.
//!
//! 1. **Claim**: snapshot and clear the world's dirty set.
//! 2. **Decide**: in parallel, build each claimed region's padded buffer,
//!    fingerprint every cell, resolve candidates through the worker's cache
//!    and pick one action per cell.
//! 3. **Apply**: shuffle every picked action, stable-sort by origin row
//!    (lowest first) and execute strictly one at a time.

pub mod apply;
pub mod scheduler;
pub mod worker;

pub use apply::Pending;
pub use scheduler::{TickReport, TickScheduler};
pub use worker::WorkerContext;
