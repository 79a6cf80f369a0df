//! Cache backend abstraction.

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::policy::ExpirationPolicy;

/// Error del sistema de cache. Nunca llega al caller del CacheLayer.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached.
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with an error.
    #[error("cache backend error: {0}")]
    Backend(String),

    /// A cached payload could not be encoded or decoded.
    #[error("cache payload error: {0}")]
    Payload(String),

    /// An invalidation pattern is not a valid glob.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl CacheError {
    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Creates a new backend error.
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend(reason.into())
    }

    /// Short label used in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Backend(_) => "backend",
            Self::Payload(_) => "payload",
            Self::InvalidPattern { .. } => "pattern",
        }
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_dropped()
            || err.is_connection_refusal()
            || err.is_timeout()
        {
            Self::Unavailable(err.to_string())
        } else {
            Self::Backend(err.to_string())
        }
    }
}

/// Byte-oriented key/value store with per-entry expiration.
///
/// # Implementors
///
/// - `MemoryCacheBackend` - In-process, bounded, process lifetime only
/// - `RedisCacheBackend` - Shared across processes
/// - `NoopCacheBackend` - No caching; every read is a miss
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the name of this backend, used for logging and metrics.
    fn name(&self) -> &str;

    /// Reads an entry, `None` on a miss or an expired entry.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Writes an entry, replacing any previous value and its clocks.
    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        policy: ExpirationPolicy,
    ) -> Result<(), CacheError>;

    /// Removes an entry. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Resets the sliding window of an entry after a read.
    async fn refresh_expiry(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every entry whose key matches a glob pattern.
    ///
    /// Returns the number of entries removed.
    async fn remove_matching(&self, pattern: &str) -> Result<usize, CacheError>;
}

/// Backend that caches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCacheBackend;

#[async_trait]
impl CacheBackend for NoopCacheBackend {
    fn name(&self) -> &str {
        "none"
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &str,
        _value: Vec<u8>,
        _policy: ExpirationPolicy,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn refresh_expiry(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove_matching(&self, _pattern: &str) -> Result<usize, CacheError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_backend_never_hits() {
        let backend = NoopCacheBackend;

        backend
            .set("k", b"v".to_vec(), ExpirationPolicy::persistent())
            .await
            .unwrap();

        assert!(backend.get("k").await.unwrap().is_none());
        assert_eq!(backend.remove_matching("*").await.unwrap(), 0);
        assert_eq!(backend.name(), "none");
    }

    #[test]
    fn test_cache_error_kind() {
        assert_eq!(CacheError::unavailable("down").kind(), "unavailable");
        assert_eq!(CacheError::backend("oops").kind(), "backend");

        let err: CacheError = serde_json::from_slice::<u32>(b"nope").unwrap_err().into();
        assert_eq!(err.kind(), "payload");
    }
}
