//! Metrics module for the LogiTrack server.

pub mod cache;
pub mod reconcile;
pub mod setup;

pub use cache::CacheMetrics;
pub use setup::init_metrics;
