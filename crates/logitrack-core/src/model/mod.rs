//! Inventory and order model.
//!
//! Each entity carries ids only. An order's items are the set of
//! [`OrderItemLink`] rows keyed by `(order_id, item_id)`; the link never
//! owns either side and is resolved through the store on demand.

mod item;
mod link;
mod order;

pub use item::{InventoryItem, ItemPatch, NewInventoryItem};
pub use link::OrderItemLink;
pub use order::{NewOrder, Order, OrderDetails, OrderPatch, UNKNOWN_CUSTOMER};
