//! Order/item association management.
//!
//! The relationship lives in link rows keyed by `(order_id, item_id)`.
//! Every mutation commits to the store first, then invalidates the cache
//! entries that could show the old link set, then returns.

use std::collections::BTreeSet;
use std::sync::Arc;

use logitrack_core::{EntityKind, ItemId, LogiTrackError, OrderId, OrderItemLink, Result};
use logitrack_store::{Store, StoreError};
use tracing::{debug, info, instrument};

use crate::cache::{CacheKey, CacheLayer};

/// Outcome of a link mutation. The no-op outcomes are successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkChange {
    /// The link was created.
    Added,
    /// The link already existed; nothing was written.
    AlreadyPresent,
    /// The link was deleted.
    Removed,
    /// The link did not exist; nothing was written.
    NotPresent,
}

impl LinkChange {
    /// Returns true if the store was modified.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Added | Self::Removed)
    }
}

/// Maintains the order/item many-to-many relationship.
#[derive(Clone)]
pub struct AssociationManager {
    store: Arc<dyn Store>,
    cache: CacheLayer,
}

impl AssociationManager {
    /// Creates a new manager over `store` and `cache`.
    pub fn new(store: Arc<dyn Store>, cache: CacheLayer) -> Self {
        Self { store, cache }
    }

    /// Links `item_id` to `order_id`.
    ///
    /// Fails with `NotFound` if either side does not exist. Linking an
    /// already linked item is a no-op. A concurrent insert of the same
    /// link surfaces as a unique violation and is reported as
    /// [`LinkChange::AlreadyPresent`].
    #[instrument(skip_all, fields(order = %order_id, item = %item_id))]
    pub async fn add_item(&self, order_id: OrderId, item_id: ItemId) -> Result<LinkChange> {
        self.require_order(order_id).await?;
        if self.store.load_item(item_id).await?.is_none() {
            return Err(LogiTrackError::not_found(EntityKind::InventoryItem, item_id));
        }

        let link = OrderItemLink::new(order_id, item_id);
        if self.store.link_exists(link).await? {
            debug!("Link already present");
            return Ok(LinkChange::AlreadyPresent);
        }

        match self.store.insert_link(link).await {
            Ok(()) => {},
            Err(StoreError::UniqueViolation { .. }) => {
                debug!("Link inserted concurrently");
                return Ok(LinkChange::AlreadyPresent);
            },
            Err(StoreError::ForeignKeyViolation { kind, id }) => {
                return Err(LogiTrackError::NotFound { kind, id });
            },
            Err(e) => return Err(e.into()),
        }

        self.invalidate_order_links(order_id).await;
        info!("Item linked to order");
        Ok(LinkChange::Added)
    }

    /// Unlinks `item_id` from `order_id`.
    ///
    /// Fails with `NotFound` if the order does not exist. Removing an item
    /// that is not linked is a no-op.
    #[instrument(skip_all, fields(order = %order_id, item = %item_id))]
    pub async fn remove_item(&self, order_id: OrderId, item_id: ItemId) -> Result<LinkChange> {
        self.require_order(order_id).await?;

        let link = OrderItemLink::new(order_id, item_id);
        if !self.store.delete_link(link).await? {
            debug!("Link not present");
            return Ok(LinkChange::NotPresent);
        }

        self.invalidate_order_links(order_id).await;
        info!("Item unlinked from order");
        Ok(LinkChange::Removed)
    }

    /// Deletes an item together with every link referencing it.
    ///
    /// Returns the removed links. Orders are untouched.
    #[instrument(skip_all, fields(item = %item_id))]
    pub async fn delete_item_cascade(&self, item_id: ItemId) -> Result<Vec<OrderItemLink>> {
        let removed = self.store.delete_item(item_id).await?;

        let mut keys = vec![CacheKey::item(item_id), CacheKey::all_orders()];
        for link in &removed {
            keys.push(CacheKey::order(link.order_id));
            keys.push(CacheKey::order_items(link.order_id));
        }
        self.cache.invalidate_many(&keys).await;
        self.cache.invalidate_item_views().await;

        info!(links = removed.len(), "Item deleted with its links");
        Ok(removed)
    }

    /// Deletes an order together with its links.
    ///
    /// Returns the removed links. Items are untouched.
    #[instrument(skip_all, fields(order = %order_id))]
    pub async fn delete_order_cascade(&self, order_id: OrderId) -> Result<Vec<OrderItemLink>> {
        let removed = self.store.delete_order(order_id).await?;

        let keys = [
            CacheKey::order(order_id),
            CacheKey::order_items(order_id),
            CacheKey::all_orders(),
        ];
        self.cache.invalidate_many(&keys).await;

        info!(links = removed.len(), "Order deleted with its links");
        Ok(removed)
    }

    /// Ids of the items linked to `order_id`, cached under
    /// `order_{id}_items`.
    ///
    /// A miss reads the link rows once. Only when the order has no links
    /// is a second read needed to tell an empty order from a missing one;
    /// a link implies its order exists.
    pub async fn items_of(&self, order_id: OrderId) -> Result<BTreeSet<ItemId>> {
        self.cache
            .get_or_load(&CacheKey::order_items(order_id), || async {
                let links = self.store.load_links_for_order(order_id).await?;
                if links.is_empty() {
                    self.require_order(order_id).await?;
                }
                Ok::<_, LogiTrackError>(links.into_iter().map(|link| link.item_id).collect())
            })
            .await
    }

    /// Returns whether `item_id` is linked to `order_id`. Reads the store.
    pub async fn is_linked(&self, order_id: OrderId, item_id: ItemId) -> Result<bool> {
        Ok(self
            .store
            .link_exists(OrderItemLink::new(order_id, item_id))
            .await?)
    }

    async fn require_order(&self, order_id: OrderId) -> Result<()> {
        match self.store.load_order(order_id).await? {
            Some(_) => Ok(()),
            None => Err(LogiTrackError::not_found(EntityKind::Order, order_id)),
        }
    }

    async fn invalidate_order_links(&self, order_id: OrderId) {
        let keys = [CacheKey::order_items(order_id), CacheKey::all_orders()];
        self.cache.invalidate_many(&keys).await;
    }
}
