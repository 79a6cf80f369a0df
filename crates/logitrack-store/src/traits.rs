//! Store trait definition.

use async_trait::async_trait;
use logitrack_core::{
    InventoryItem, ItemId, NewInventoryItem, NewOrder, Order, OrderId, OrderItemLink,
};

use crate::error::StoreError;
use crate::filter::ItemFilter;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The durable source of truth for items, orders and their links.
///
/// Implementations behave like a relational schema with three tables:
/// items and orders keyed by store-generated ids, and links keyed by
/// `(order_id, item_id)` with a unique constraint and foreign keys to both
/// sides declared `ON DELETE CASCADE`.
///
/// # Implementors
///
/// - `MemoryStore` - In-process tables behind a single lock
///
/// # Errors
///
/// Every method may fail with [`StoreError::Unavailable`]. Write methods
/// additionally report constraint violations as described on each method.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the name of this store, used for logging.
    fn name(&self) -> &str;

    /// Verifies the store is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    /// Loads every item.
    async fn load_items(&self) -> StoreResult<Vec<InventoryItem>>;

    /// Loads one item, `None` if it does not exist.
    async fn load_item(&self, id: ItemId) -> StoreResult<Option<InventoryItem>>;

    /// Loads the items matching `filter`.
    async fn load_items_where(&self, filter: &ItemFilter) -> StoreResult<Vec<InventoryItem>>;

    /// Counts items without loading them.
    async fn count_items(&self) -> StoreResult<u64>;

    /// Inserts a new item and returns the generated id.
    async fn insert_item(&self, item: NewInventoryItem) -> StoreResult<ItemId>;

    /// Overwrites an existing item.
    ///
    /// Fails with [`StoreError::NotFound`] if the id does not exist.
    async fn update_item(&self, item: &InventoryItem) -> StoreResult<()>;

    /// Deletes an item and, atomically, every link referencing it.
    ///
    /// Returns the links removed by the cascade. Fails with
    /// [`StoreError::NotFound`] if the id does not exist.
    async fn delete_item(&self, id: ItemId) -> StoreResult<Vec<OrderItemLink>>;

    /// Loads every order.
    async fn load_orders(&self) -> StoreResult<Vec<Order>>;

    /// Loads one order, `None` if it does not exist.
    async fn load_order(&self, id: OrderId) -> StoreResult<Option<Order>>;

    /// Counts orders without loading them.
    async fn count_orders(&self) -> StoreResult<u64>;

    /// Inserts a new order and returns the generated id.
    async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderId>;

    /// Overwrites an existing order.
    ///
    /// Fails with [`StoreError::NotFound`] if the id does not exist.
    async fn update_order(&self, order: &Order) -> StoreResult<()>;

    /// Deletes an order and, atomically, its links. Items are untouched.
    ///
    /// Returns the links removed by the cascade. Fails with
    /// [`StoreError::NotFound`] if the id does not exist.
    async fn delete_order(&self, id: OrderId) -> StoreResult<Vec<OrderItemLink>>;

    /// Inserts a link.
    ///
    /// Fails with [`StoreError::UniqueViolation`] if the pair already exists
    /// and with [`StoreError::ForeignKeyViolation`] if either side is missing.
    async fn insert_link(&self, link: OrderItemLink) -> StoreResult<()>;

    /// Deletes a link. Returns whether a row was removed.
    async fn delete_link(&self, link: OrderItemLink) -> StoreResult<bool>;

    /// Returns whether the link exists.
    async fn link_exists(&self, link: OrderItemLink) -> StoreResult<bool>;

    /// Loads the links of one order, ordered by item id.
    async fn load_links_for_order(&self, order_id: OrderId) -> StoreResult<Vec<OrderItemLink>>;

    /// Loads the links referencing one item, ordered by order id.
    async fn load_links_for_item(&self, item_id: ItemId) -> StoreResult<Vec<OrderItemLink>>;
}
