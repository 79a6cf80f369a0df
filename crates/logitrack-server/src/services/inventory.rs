//! Inventory item reads and writes.

use std::sync::Arc;

use logitrack_core::{
    EntityKind, InventoryItem, ItemId, ItemPatch, LogiTrackError, NewInventoryItem,
    OrderItemLink, Result,
};
use logitrack_store::{ItemFilter, Store};
use tracing::{info, instrument};

use crate::association::AssociationManager;
use crate::cache::keys::normalize_term;
use crate::cache::{CacheKey, CacheLayer};

/// Cached access to inventory items.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn Store>,
    cache: CacheLayer,
    associations: AssociationManager,
}

impl InventoryService {
    /// Creates a new service. Item deletion goes through `associations`.
    pub fn new(store: Arc<dyn Store>, cache: CacheLayer, associations: AssociationManager) -> Self {
        Self {
            store,
            cache,
            associations,
        }
    }

    /// All items, cached under `inventory_items`.
    pub async fn list_items(&self) -> Result<Vec<InventoryItem>> {
        self.cache
            .get_or_load(&CacheKey::all_items(), || async {
                Ok::<_, LogiTrackError>(self.store.load_items().await?)
            })
            .await
    }

    /// One item, cached under `inventory_item_{id}`.
    pub async fn get_item(&self, id: ItemId) -> Result<InventoryItem> {
        self.cache
            .get_or_load(&CacheKey::item(id), || async {
                self.store
                    .load_item(id)
                    .await?
                    .ok_or_else(|| LogiTrackError::not_found(EntityKind::InventoryItem, id))
            })
            .await
    }

    /// Items whose name or location contains `term`, case-insensitively.
    ///
    /// Cached under `inventory_items_search_{term}`. An empty result is
    /// cached like any other.
    pub async fn search_items(&self, term: &str) -> Result<Vec<InventoryItem>> {
        let term = normalize_term(term);
        if term.is_empty() {
            return Err(LogiTrackError::validation(
                "term",
                "search term cannot be empty",
            ));
        }

        let filter = ItemFilter::term(&term);
        self.cache
            .get_or_load(&CacheKey::item_search(&term), || async {
                Ok::<_, LogiTrackError>(self.store.load_items_where(&filter).await?)
            })
            .await
    }

    /// Creates an item and returns it with its store-generated id.
    ///
    /// The new entity is written to the cache; the collection and every
    /// search result are invalidated rather than patched.
    #[instrument(skip_all, fields(name = %new.name))]
    pub async fn create_item(&self, new: NewInventoryItem) -> Result<InventoryItem> {
        new.validate()?;

        let id = self.store.insert_item(new.clone()).await?;
        let item = InventoryItem::from_new(id, new);

        self.cache.put(&CacheKey::item(id), &item).await;
        self.cache.invalidate_item_views().await;

        info!(id = %id, "Item created");
        Ok(item)
    }

    /// Applies `patch` to an existing item.
    ///
    /// Reads the current row from the store, not the cache, so the patch
    /// never applies to a stale snapshot.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update_item(&self, id: ItemId, patch: ItemPatch) -> Result<InventoryItem> {
        let mut item = self
            .store
            .load_item(id)
            .await?
            .ok_or_else(|| LogiTrackError::not_found(EntityKind::InventoryItem, id))?;

        if patch.is_empty() {
            return Ok(item);
        }
        patch.apply(&mut item)?;

        self.store.update_item(&item).await?;

        self.cache.put(&CacheKey::item(id), &item).await;
        self.cache.invalidate_item_views().await;
        self.cache.invalidate(&CacheKey::all_orders()).await;

        info!("Item updated");
        Ok(item)
    }

    /// Deletes an item and every link referencing it.
    pub async fn delete_item(&self, id: ItemId) -> Result<Vec<OrderItemLink>> {
        self.associations.delete_item_cascade(id).await
    }

    /// Number of items in the store. Not cached.
    pub async fn item_count(&self) -> Result<u64> {
        Ok(self.store.count_items().await?)
    }
}
