//! In-process cache backend using Moka.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use glob::Pattern;
use moka::Expiry;
use moka::future::Cache;
use moka::notification::RemovalCause;
use tracing::debug;

use crate::cache::backend::{CacheBackend, CacheError};
use crate::cache::policy::ExpirationPolicy;
use crate::metrics::CacheMetrics;

/// Configuracion del backend en memoria.
#[derive(Debug, Clone)]
pub struct MemoryCacheConfig {
    /// Maximo numero de entries (default: 10000)
    pub max_capacity: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

/// Valor almacenado junto con su politica.
#[derive(Debug)]
struct StoredEntry {
    payload: Vec<u8>,
    policy: ExpirationPolicy,
}

/// Calcula la expiracion de cada entry segun su propia politica.
struct PolicyExpiry;

impl Expiry<String, Arc<StoredEntry>> for PolicyExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<StoredEntry>,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.policy.ttl_on_write()
    }

    fn expire_after_read(
        &self,
        _key: &String,
        value: &Arc<StoredEntry>,
        read_at: Instant,
        _duration_until_expiry: Option<Duration>,
        last_modified_at: Instant,
    ) -> Option<Duration> {
        // last_modified_at es el instante de escritura: el TTL absoluto
        // corre desde ahi.
        value
            .policy
            .ttl_after_read(read_at.saturating_duration_since(last_modified_at))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Arc<StoredEntry>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.policy.ttl_on_write()
    }
}

/// Cache en memoria del proceso.
/// Thread-safe y async-friendly; los datos viven lo que vive el proceso.
///
/// # Examples
///
/// ```no_run
/// use logitrack_server::cache::{CacheBackend, ExpirationPolicy, MemoryCacheBackend};
///
/// # #[tokio::main]
/// # async fn main() {
/// let backend = MemoryCacheBackend::with_defaults();
/// backend
///     .set("inventory_items", b"[]".to_vec(), ExpirationPolicy::persistent())
///     .await
///     .unwrap();
/// assert!(backend.get("inventory_items").await.unwrap().is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryCacheBackend {
    inner: Cache<String, Arc<StoredEntry>>,
    metrics: CacheMetrics,
}

impl MemoryCacheBackend {
    /// Crea un nuevo backend con la configuracion dada.
    pub fn new(config: MemoryCacheConfig) -> Self {
        let metrics = CacheMetrics::new();
        let listener_metrics = metrics.clone();

        // Configurar listener para evictions
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PolicyExpiry)
            .eviction_listener(move |_key, _value, cause| {
                let reason = match cause {
                    RemovalCause::Expired => "ttl",
                    RemovalCause::Size => "capacity",
                    RemovalCause::Explicit => "manual",
                    RemovalCause::Replaced => "replaced",
                };
                listener_metrics.record_eviction(reason);
            })
            .build();

        Self { inner, metrics }
    }

    /// Crea un backend con la configuracion por defecto.
    pub fn with_defaults() -> Self {
        Self::new(MemoryCacheConfig::default())
    }

    /// Numero aproximado de entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Ejecuta las tareas pendientes de mantenimiento (evictions, contadores).
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
        self.metrics.update_entry_count(self.inner.entry_count());
    }

    /// Elimina todas las entries.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.inner.get(key).await.map(|entry| entry.payload.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        policy: ExpirationPolicy,
    ) -> Result<(), CacheError> {
        let entry = StoredEntry {
            payload: value,
            policy,
        };
        self.inner.insert(key.to_string(), Arc::new(entry)).await;
        self.metrics.update_entry_count(self.inner.entry_count());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.inner.invalidate(key).await;
        self.metrics.update_entry_count(self.inner.entry_count());
        Ok(())
    }

    async fn refresh_expiry(&self, key: &str) -> Result<(), CacheError> {
        // Una lectura ya reinicia la ventana via expire_after_read.
        let _ = self.inner.get(key).await;
        Ok(())
    }

    async fn remove_matching(&self, pattern: &str) -> Result<usize, CacheError> {
        let pattern = Pattern::new(pattern).map_err(|e| CacheError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let matching: Vec<Arc<String>> = self
            .inner
            .iter()
            .filter(|(key, _)| pattern.matches(key))
            .map(|(key, _)| key)
            .collect();

        for key in &matching {
            self.inner.invalidate(key.as_str()).await;
        }

        debug!(
            pattern = %pattern,
            count = matching.len(),
            "Memory cache entries removed by pattern"
        );

        Ok(matching.len())
    }
}
