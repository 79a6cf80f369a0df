//! Cache-aside facade over a [`CacheBackend`].

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::backend::{CacheBackend, CacheError};
use crate::cache::keys::CacheKey;
use crate::cache::policy::{CachePolicies, ExpirationPolicy};
use crate::metrics::CacheMetrics;

/// Read-through cache over the store.
///
/// Values are stored as JSON. The layer never fails a caller because of
/// the cache: backend errors and undecodable payloads are logged, counted
/// and treated as misses.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use logitrack_core::ItemId;
/// use logitrack_server::cache::{CacheKey, CacheLayer, CachePolicies, MemoryCacheBackend};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = CacheLayer::new(Arc::new(MemoryCacheBackend::with_defaults()), CachePolicies::default());
/// let key = CacheKey::item(ItemId::new(1));
///
/// let name: Result<String, std::io::Error> = cache
///     .get_or_load(&key, || async { Ok("Widget".to_string()) })
///     .await;
/// assert_eq!(name.unwrap(), "Widget");
/// # }
/// ```
#[derive(Clone)]
pub struct CacheLayer {
    backend: Arc<dyn CacheBackend>,
    policies: CachePolicies,
    metrics: CacheMetrics,
}

impl CacheLayer {
    /// Creates a new cache layer over `backend`.
    pub fn new(backend: Arc<dyn CacheBackend>, policies: CachePolicies) -> Self {
        Self {
            backend,
            policies,
            metrics: CacheMetrics::new(),
        }
    }

    /// Returns the backend name.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Returns the policies in use.
    pub fn policies(&self) -> &CachePolicies {
        &self.policies
    }

    /// Returns the metrics recorder.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub(crate) fn backend(&self) -> &dyn CacheBackend {
        self.backend.as_ref()
    }

    /// Returns the cached value for `key`, if present and unexpired.
    ///
    /// A hit refreshes the entry's sliding window.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let start = Instant::now();
        let class = key.class().as_str();

        let bytes = match self.backend.get(key.as_str()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.absorb(key, "get", &e);
                return None;
            },
        };

        let value = match bytes {
            Some(bytes) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    self.absorb(key, "decode", &CacheError::from(e));
                    self.remove_quietly(key).await;
                    None
                },
            },
            None => None,
        };

        match value {
            Some(value) => {
                self.metrics.record_hit(class);
                debug!(key = %key, "Cache hit");
                if let Err(e) = self.backend.refresh_expiry(key.as_str()).await {
                    self.absorb(key, "refresh", &e);
                }
                self.metrics
                    .record_operation_duration("get", start.elapsed());
                Some(value)
            },
            None => {
                self.metrics.record_miss(class);
                debug!(key = %key, "Cache miss");
                self.metrics
                    .record_operation_duration("get", start.elapsed());
                None
            },
        }
    }

    /// Returns the cached value for `key` or loads it with `loader`.
    ///
    /// On a hit `loader` is not called. On a miss it is called exactly once
    /// and its value is written under `key` with the policy of the key's
    /// class. Loader errors are returned unchanged and nothing is cached.
    /// Concurrent misses for the same key each call their own loader.
    pub async fn get_or_load<T, E, F, Fut>(&self, key: &CacheKey, loader: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let value = loader().await?;
        self.put(key, &value).await;
        Ok(value)
    }

    /// Writes `value` under `key` with the policy of the key's class.
    pub async fn put<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let policy = self.policies.for_class(key.class());
        self.put_with_policy(key, value, policy).await;
    }

    /// Writes `value` under `key` with an explicit policy.
    pub async fn put_with_policy<T: Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        policy: ExpirationPolicy,
    ) {
        let start = Instant::now();

        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.absorb(key, "encode", &CacheError::from(e));
                // No dejar un valor anterior que ya no es verdad
                self.remove_quietly(key).await;
                return;
            },
        };

        match self.backend.set(key.as_str(), bytes, policy).await {
            Ok(()) => debug!(key = %key, "Cache entry written"),
            Err(e) => self.absorb(key, "set", &e),
        }
        self.metrics
            .record_operation_duration("set", start.elapsed());
    }

    /// Removes the entry for `key`.
    pub async fn invalidate(&self, key: &CacheKey) {
        let start = Instant::now();

        match self.backend.remove(key.as_str()).await {
            Ok(()) => debug!(key = %key, "Cache entry invalidated"),
            Err(e) => self.absorb(key, "remove", &e),
        }
        self.metrics
            .record_operation_duration("remove", start.elapsed());
    }

    async fn remove_quietly(&self, key: &CacheKey) {
        if let Err(e) = self.backend.remove(key.as_str()).await {
            self.absorb(key, "remove", &e);
        }
    }

    fn absorb(&self, key: &CacheKey, operation: &'static str, error: &CacheError) {
        self.metrics.record_error(self.backend.name(), error.kind());
        warn!(
            key = %key,
            backend = self.backend.name(),
            operation,
            error = %error,
            "Cache operation failed, bypassing cache"
        );
    }
}

impl std::fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("backend", &self.backend.name())
            .field("policies", &self.policies)
            .finish()
    }
}
