//! LogiTrack Core - Domain types and errors
//!
//! This crate provides the inventory and order model shared by the store
//! and the cache layer. Entities refer to each other by id only; the
//! order/item relationship lives in [`OrderItemLink`] rows addressed by
//! their composite key.

pub mod error;
pub mod model;
pub mod types;

// Re-exports
pub use error::{LogiTrackError, Result};
pub use model::{
    InventoryItem, ItemPatch, NewInventoryItem, NewOrder, Order, OrderDetails, OrderItemLink,
    OrderPatch, UNKNOWN_CUSTOMER,
};
pub use types::{EntityKind, ItemId, OrderId};

// Decimal is part of the public item API
pub use rust_decimal::Decimal;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
