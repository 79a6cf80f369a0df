//! In-process store implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use logitrack_core::{
    EntityKind, InventoryItem, ItemId, NewInventoryItem, NewOrder, Order, OrderId, OrderItemLink,
};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::filter::ItemFilter;
use crate::traits::{Store, StoreResult};

#[derive(Debug)]
struct Tables {
    items: BTreeMap<ItemId, InventoryItem>,
    orders: BTreeMap<OrderId, Order>,
    links: BTreeSet<OrderItemLink>,
    next_item_id: i64,
    next_order_id: i64,
}

impl Tables {
    fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            orders: BTreeMap::new(),
            links: BTreeSet::new(),
            next_item_id: 1,
            next_order_id: 1,
        }
    }
}

/// Relational-style store held in memory.
///
/// All tables sit behind one lock, so each write, cascades included,
/// commits atomically. Availability can be switched off to simulate an
/// outage; every call then fails with [`StoreError::Unavailable`].
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    available: AtomicBool,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
            available: AtomicBool::new(true),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Marks the store reachable or unreachable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        info!(available, "Memory store availability changed");
    }

    /// Returns whether the store is reachable.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Number of read operations served so far.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of write operations committed so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(StoreError::unavailable("memory store is offline"))
        }
    }

    fn begin_read(&self) -> StoreResult<()> {
        self.check_available()?;
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn begin_write(&self) -> StoreResult<()> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.check_available()
    }

    async fn load_items(&self) -> StoreResult<Vec<InventoryItem>> {
        self.begin_read()?;
        Ok(self.tables.read().items.values().cloned().collect())
    }

    async fn load_item(&self, id: ItemId) -> StoreResult<Option<InventoryItem>> {
        self.begin_read()?;
        Ok(self.tables.read().items.get(&id).cloned())
    }

    async fn load_items_where(&self, filter: &ItemFilter) -> StoreResult<Vec<InventoryItem>> {
        self.begin_read()?;
        Ok(self
            .tables
            .read()
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect())
    }

    async fn count_items(&self) -> StoreResult<u64> {
        self.begin_read()?;
        Ok(self.tables.read().items.len() as u64)
    }

    async fn insert_item(&self, item: NewInventoryItem) -> StoreResult<ItemId> {
        self.begin_write()?;
        let mut tables = self.tables.write();
        let id = ItemId::new(tables.next_item_id);
        tables.next_item_id += 1;
        tables.items.insert(id, InventoryItem::from_new(id, item));
        debug!(item_id = %id, "Inserted item");
        Ok(id)
    }

    async fn update_item(&self, item: &InventoryItem) -> StoreResult<()> {
        self.begin_write()?;
        let mut tables = self.tables.write();
        match tables.items.get_mut(&item.id()) {
            Some(row) => {
                *row = item.clone();
                Ok(())
            },
            None => Err(StoreError::not_found(EntityKind::InventoryItem, item.id())),
        }
    }

    async fn delete_item(&self, id: ItemId) -> StoreResult<Vec<OrderItemLink>> {
        self.begin_write()?;
        let mut tables = self.tables.write();
        if tables.items.remove(&id).is_none() {
            return Err(StoreError::not_found(EntityKind::InventoryItem, id));
        }

        let removed: Vec<OrderItemLink> =
            tables.links.iter().filter(|l| l.item_id == id).copied().collect();
        for link in &removed {
            tables.links.remove(link);
        }

        debug!(item_id = %id, cascaded = removed.len(), "Deleted item");
        Ok(removed)
    }

    async fn load_orders(&self) -> StoreResult<Vec<Order>> {
        self.begin_read()?;
        Ok(self.tables.read().orders.values().cloned().collect())
    }

    async fn load_order(&self, id: OrderId) -> StoreResult<Option<Order>> {
        self.begin_read()?;
        Ok(self.tables.read().orders.get(&id).cloned())
    }

    async fn count_orders(&self) -> StoreResult<u64> {
        self.begin_read()?;
        Ok(self.tables.read().orders.len() as u64)
    }

    async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderId> {
        self.begin_write()?;
        let mut tables = self.tables.write();
        let id = OrderId::new(tables.next_order_id);
        tables.next_order_id += 1;
        tables.orders.insert(id, Order::from_new(id, order));
        debug!(order_id = %id, "Inserted order");
        Ok(id)
    }

    async fn update_order(&self, order: &Order) -> StoreResult<()> {
        self.begin_write()?;
        let mut tables = self.tables.write();
        match tables.orders.get_mut(&order.id()) {
            Some(row) => {
                *row = order.clone();
                Ok(())
            },
            None => Err(StoreError::not_found(EntityKind::Order, order.id())),
        }
    }

    async fn delete_order(&self, id: OrderId) -> StoreResult<Vec<OrderItemLink>> {
        self.begin_write()?;
        let mut tables = self.tables.write();
        if tables.orders.remove(&id).is_none() {
            return Err(StoreError::not_found(EntityKind::Order, id));
        }

        let first = OrderItemLink::new(id, ItemId::new(i64::MIN));
        let last = OrderItemLink::new(id, ItemId::new(i64::MAX));
        let removed: Vec<OrderItemLink> = tables.links.range(first..=last).copied().collect();
        for link in &removed {
            tables.links.remove(link);
        }

        debug!(order_id = %id, cascaded = removed.len(), "Deleted order");
        Ok(removed)
    }

    async fn insert_link(&self, link: OrderItemLink) -> StoreResult<()> {
        self.begin_write()?;
        let mut tables = self.tables.write();
        if !tables.orders.contains_key(&link.order_id) {
            return Err(StoreError::foreign_key(EntityKind::Order, link.order_id));
        }
        if !tables.items.contains_key(&link.item_id) {
            return Err(StoreError::foreign_key(EntityKind::InventoryItem, link.item_id));
        }
        if !tables.links.insert(link) {
            return Err(StoreError::unique_violation(EntityKind::OrderItemLink, link));
        }
        Ok(())
    }

    async fn delete_link(&self, link: OrderItemLink) -> StoreResult<bool> {
        self.begin_write()?;
        Ok(self.tables.write().links.remove(&link))
    }

    async fn link_exists(&self, link: OrderItemLink) -> StoreResult<bool> {
        self.begin_read()?;
        Ok(self.tables.read().links.contains(&link))
    }

    async fn load_links_for_order(&self, order_id: OrderId) -> StoreResult<Vec<OrderItemLink>> {
        self.begin_read()?;
        Ok(self
            .tables
            .read()
            .links
            .range(
                OrderItemLink::new(order_id, ItemId::new(i64::MIN))
                    ..=OrderItemLink::new(order_id, ItemId::new(i64::MAX)),
            )
            .copied()
            .collect())
    }

    async fn load_links_for_item(&self, item_id: ItemId) -> StoreResult<Vec<OrderItemLink>> {
        self.begin_read()?;
        Ok(self
            .tables
            .read()
            .links
            .iter()
            .filter(|l| l.item_id == item_id)
            .copied()
            .collect())
    }
}
