//! Background reconciliation between the store and the cache.
//!
//! This module bounds cache staleness independently of request-driven
//! invalidation and publishes store counts as a liveness signal.

mod scheduler;
mod state;

pub use scheduler::{ReconcileConfig, ReconcileHandle, ReconcileScheduler};
pub use state::{ReconcileCounts, ReconcileState};
