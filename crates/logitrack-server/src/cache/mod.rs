//! Cache module for the LogiTrack server.
//!
//! This module provides the cache-aside layer over the store: key naming,
//! per-class expiration policies with absolute and sliding clocks,
//! interchangeable backends (in-process, Redis, none), pattern-based
//! invalidation, and metrics.

pub mod backend;
pub mod invalidation;
pub mod keys;
pub mod layer;
pub mod memory;
pub mod policy;
pub mod redis;

// Re-exports
pub use backend::{CacheBackend, CacheError, NoopCacheBackend};
pub use invalidation::InvalidationResult;
pub use keys::{CacheKey, KeyClass};
pub use layer::CacheLayer;
pub use memory::{MemoryCacheBackend, MemoryCacheConfig};
pub use policy::{CachePolicies, ExpirationPolicy};
pub use self::redis::RedisCacheBackend;
