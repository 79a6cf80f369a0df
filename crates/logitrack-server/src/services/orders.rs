//! Order reads and writes.

use std::collections::BTreeSet;
use std::sync::Arc;

use logitrack_core::{
    EntityKind, InventoryItem, ItemId, LogiTrackError, NewOrder, Order, OrderDetails, OrderId,
    OrderItemLink, OrderPatch, Result,
};
use logitrack_store::{ItemFilter, Store};
use tracing::{info, instrument};

use crate::association::AssociationManager;
use crate::cache::{CacheKey, CacheLayer};

/// Cached access to orders and their item sets.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Store>,
    cache: CacheLayer,
    associations: AssociationManager,
}

impl OrderService {
    /// Creates a new service. Link reads and order deletion go through
    /// `associations`.
    pub fn new(store: Arc<dyn Store>, cache: CacheLayer, associations: AssociationManager) -> Self {
        Self {
            store,
            cache,
            associations,
        }
    }

    /// All orders, cached under `orders`.
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.cache
            .get_or_load(&CacheKey::all_orders(), || async {
                Ok::<_, LogiTrackError>(self.store.load_orders().await?)
            })
            .await
    }

    /// One order, cached under `order_{id}`.
    pub async fn get_order(&self, id: OrderId) -> Result<Order> {
        self.cache
            .get_or_load(&CacheKey::order(id), || async {
                self.store
                    .load_order(id)
                    .await?
                    .ok_or_else(|| LogiTrackError::not_found(EntityKind::Order, id))
            })
            .await
    }

    /// Ids of the items linked to an order, cached under `order_{id}_items`.
    pub async fn order_items(&self, id: OrderId) -> Result<BTreeSet<ItemId>> {
        self.associations.items_of(id).await
    }

    /// The order with its linked item ids.
    pub async fn order_details(&self, id: OrderId) -> Result<OrderDetails> {
        let order = self.get_order(id).await?;
        let item_ids = self.order_items(id).await?;
        Ok(OrderDetails { order, item_ids })
    }

    /// The linked items resolved from the store, ordered by id.
    pub async fn order_line_items(&self, id: OrderId) -> Result<Vec<InventoryItem>> {
        let item_ids = self.order_items(id).await?;
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .store
            .load_items_where(&ItemFilter::ids(item_ids))
            .await?)
    }

    /// Creates an order and returns it with its store-generated id.
    ///
    /// A blank customer name is stored as the unknown-customer sentinel.
    #[instrument(skip_all, fields(customer = %new.customer_name))]
    pub async fn create_order(&self, new: NewOrder) -> Result<Order> {
        let new = NewOrder::new(Some(new.customer_name)).placed_at(new.date_placed);
        let id = self.store.insert_order(new.clone()).await?;
        let order = Order::from_new(id, new);

        self.cache.put(&CacheKey::order(id), &order).await;
        self.cache.invalidate(&CacheKey::all_orders()).await;

        info!(id = %id, "Order created");
        Ok(order)
    }

    /// Applies `patch` to an existing order.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update_order(&self, id: OrderId, patch: OrderPatch) -> Result<Order> {
        let mut order = self
            .store
            .load_order(id)
            .await?
            .ok_or_else(|| LogiTrackError::not_found(EntityKind::Order, id))?;

        if patch.is_empty() {
            return Ok(order);
        }
        patch.apply(&mut order);

        self.store.update_order(&order).await?;

        self.cache.put(&CacheKey::order(id), &order).await;
        self.cache.invalidate(&CacheKey::all_orders()).await;

        info!("Order updated");
        Ok(order)
    }

    /// Deletes an order and its links. Items are untouched.
    pub async fn delete_order(&self, id: OrderId) -> Result<Vec<OrderItemLink>> {
        self.associations.delete_order_cascade(id).await
    }

    /// Number of orders in the store. Not cached.
    pub async fn order_count(&self) -> Result<u64> {
        Ok(self.store.count_orders().await?)
    }
}
