//! Application state.

use std::sync::Arc;

use logitrack_store::Store;
use tracing::{info, warn};

use crate::association::AssociationManager;
use crate::cache::{
    CacheBackend, CacheLayer, CachePolicies, MemoryCacheBackend, NoopCacheBackend,
    RedisCacheBackend,
};
use crate::services::{InventoryService, OrderService};
use crate::settings::{BackendKind, CacheSettings};
use crate::sync::{ReconcileConfig, ReconcileScheduler, ReconcileState};

/// Every component, wired explicitly over one store and one cache.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
    cache: CacheLayer,
    associations: AssociationManager,
    inventory: InventoryService,
    orders: OrderService,
    reconcile_state: Arc<ReconcileState>,
}

impl AppState {
    /// Creates the state from a store and a cache layer.
    pub fn new(store: Arc<dyn Store>, cache: CacheLayer) -> Self {
        let associations = AssociationManager::new(Arc::clone(&store), cache.clone());
        let inventory =
            InventoryService::new(Arc::clone(&store), cache.clone(), associations.clone());
        let orders = OrderService::new(Arc::clone(&store), cache.clone(), associations.clone());

        Self {
            store,
            cache,
            associations,
            inventory,
            orders,
            reconcile_state: Arc::new(ReconcileState::new()),
        }
    }

    /// Creates the state with the cache backend selected by `settings`.
    pub async fn from_settings(store: Arc<dyn Store>, settings: &CacheSettings) -> Self {
        let backend = build_backend(settings).await;
        Self::new(store, CacheLayer::new(backend, settings.policies()))
    }

    /// Creates the state with an in-process cache and default policies.
    pub fn with_memory_cache(store: Arc<dyn Store>) -> Self {
        let backend = Arc::new(MemoryCacheBackend::with_defaults());
        Self::new(store, CacheLayer::new(backend, CachePolicies::default()))
    }

    /// Returns the store.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Returns the cache layer.
    pub fn cache(&self) -> &CacheLayer {
        &self.cache
    }

    /// Returns the association manager.
    pub fn associations(&self) -> &AssociationManager {
        &self.associations
    }

    /// Returns the inventory service.
    pub fn inventory(&self) -> &InventoryService {
        &self.inventory
    }

    /// Returns the order service.
    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    /// Returns the reconciliation state shared with the scheduler.
    pub fn reconcile_state(&self) -> Arc<ReconcileState> {
        Arc::clone(&self.reconcile_state)
    }

    /// Creates a reconciliation scheduler over this state's store and cache.
    pub fn reconcile_scheduler(&self, config: ReconcileConfig) -> ReconcileScheduler {
        ReconcileScheduler::new(
            Arc::clone(&self.store),
            self.cache.clone(),
            self.reconcile_state(),
            config,
        )
    }
}

/// Builds the configured backend.
///
/// An unreachable Redis falls back to the in-process backend: the cache is
/// an optimization, so startup does not depend on it.
pub async fn build_backend(settings: &CacheSettings) -> Arc<dyn CacheBackend> {
    match settings.backend {
        BackendKind::Memory => {
            info!(max_capacity = settings.max_capacity, "Using in-process cache");
            Arc::new(MemoryCacheBackend::new(settings.memory_config()))
        },
        BackendKind::None => {
            info!("Caching disabled");
            Arc::new(NoopCacheBackend)
        },
        BackendKind::Redis => match RedisCacheBackend::connect(&settings.redis_url).await {
            Ok(backend) => Arc::new(backend),
            Err(e) => {
                warn!(
                    url = %settings.redis_url,
                    error = %e,
                    "Redis unreachable, falling back to in-process cache"
                );
                Arc::new(MemoryCacheBackend::new(settings.memory_config()))
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logitrack_store::MemoryStore;

    #[tokio::test]
    async fn test_build_backend_by_kind() {
        let mut settings = CacheSettings::default();
        assert_eq!(build_backend(&settings).await.name(), "memory");

        settings.backend = BackendKind::None;
        assert_eq!(build_backend(&settings).await.name(), "none");
    }

    #[tokio::test]
    async fn test_unreachable_redis_falls_back_to_memory() {
        let settings = CacheSettings {
            backend: BackendKind::Redis,
            redis_url: "redis://127.0.0.1:1/".to_string(),
            ..CacheSettings::default()
        };

        assert_eq!(build_backend(&settings).await.name(), "memory");
    }

    #[tokio::test]
    async fn test_state_shares_cache_between_components() {
        let state = AppState::with_memory_cache(Arc::new(MemoryStore::new()));

        assert_eq!(state.cache().backend_name(), "memory");
        assert_eq!(state.store().name(), "memory");
        assert!(state.reconcile_state().counts().is_none());
    }
}
