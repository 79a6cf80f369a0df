//! Store wrapper that stages races and stalls a real database can produce.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use logitrack_core::{
    Decimal, InventoryItem, ItemId, NewInventoryItem, NewOrder, Order, OrderId, OrderItemLink,
};
use logitrack_store::{ItemFilter, MemoryStore, Store, StoreResult};

/// Delegates to a [`MemoryStore`] unless a switch is on.
pub struct ScriptedStore {
    inner: Arc<MemoryStore>,
    hide_links: AtomicBool,
    phantom_items: AtomicBool,
    hang_counts: AtomicBool,
    count_calls: AtomicUsize,
}

impl ScriptedStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            hide_links: AtomicBool::new(false),
            phantom_items: AtomicBool::new(false),
            hang_counts: AtomicBool::new(false),
            count_calls: AtomicUsize::new(0),
        }
    }

    /// `link_exists` answers false, as if another writer inserted the
    /// link between the check and the insert.
    pub fn hide_links(&self, on: bool) {
        self.hide_links.store(on, Ordering::SeqCst);
    }

    /// `load_item` answers with a made-up item for missing ids, as if the
    /// item were deleted between the lookup and the insert.
    pub fn phantom_items(&self, on: bool) {
        self.phantom_items.store(on, Ordering::SeqCst);
    }

    /// `count_items` never completes.
    pub fn hang_counts(&self, on: bool) {
        self.hang_counts.store(on, Ordering::SeqCst);
    }

    /// Calls to `count_items` so far, hung ones included.
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for ScriptedStore {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.inner.health_check().await
    }

    async fn load_items(&self) -> StoreResult<Vec<InventoryItem>> {
        self.inner.load_items().await
    }

    async fn load_item(&self, id: ItemId) -> StoreResult<Option<InventoryItem>> {
        let found = self.inner.load_item(id).await?;
        if found.is_none() && self.phantom_items.load(Ordering::SeqCst) {
            let ghost = NewInventoryItem::new("Phantom", 1, "Z9", Decimal::ZERO);
            return Ok(Some(InventoryItem::from_new(id, ghost)));
        }
        Ok(found)
    }

    async fn load_items_where(&self, filter: &ItemFilter) -> StoreResult<Vec<InventoryItem>> {
        self.inner.load_items_where(filter).await
    }

    async fn count_items(&self) -> StoreResult<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_counts.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.inner.count_items().await
    }

    async fn insert_item(&self, item: NewInventoryItem) -> StoreResult<ItemId> {
        self.inner.insert_item(item).await
    }

    async fn update_item(&self, item: &InventoryItem) -> StoreResult<()> {
        self.inner.update_item(item).await
    }

    async fn delete_item(&self, id: ItemId) -> StoreResult<Vec<OrderItemLink>> {
        self.inner.delete_item(id).await
    }

    async fn load_orders(&self) -> StoreResult<Vec<Order>> {
        self.inner.load_orders().await
    }

    async fn load_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        self.inner.load_order(id).await
    }

    async fn count_orders(&self) -> StoreResult<u64> {
        self.inner.count_orders().await
    }

    async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderId> {
        self.inner.insert_order(order).await
    }

    async fn update_order(&self, order: &Order) -> StoreResult<()> {
        self.inner.update_order(order).await
    }

    async fn delete_order(&self, id: OrderId) -> StoreResult<Vec<OrderItemLink>> {
        self.inner.delete_order(id).await
    }

    async fn insert_link(&self, link: OrderItemLink) -> StoreResult<()> {
        self.inner.insert_link(link).await
    }

    async fn delete_link(&self, link: OrderItemLink) -> StoreResult<bool> {
        self.inner.delete_link(link).await
    }

    async fn link_exists(&self, link: OrderItemLink) -> StoreResult<bool> {
        if self.hide_links.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.link_exists(link).await
    }

    async fn load_links_for_order(&self, order_id: OrderId) -> StoreResult<Vec<OrderItemLink>> {
        self.inner.load_links_for_order(order_id).await
    }

    async fn load_links_for_item(&self, item_id: ItemId) -> StoreResult<Vec<OrderItemLink>> {
        self.inner.load_links_for_item(item_id).await
    }
}
