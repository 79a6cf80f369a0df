//! Order/item association row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, OrderId};

/// One membership of an item in an order.
///
/// Identity is the `(order_id, item_id)` pair. The link refers to both
/// sides by id and owns neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderItemLink {
    /// The owning order
    pub order_id: OrderId,
    /// The referenced item
    pub item_id: ItemId,
}

impl OrderItemLink {
    /// Creates a link for the given pair.
    pub fn new(order_id: OrderId, item_id: ItemId) -> Self {
        Self { order_id, item_id }
    }
}

impl fmt::Display for OrderItemLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.order_id, self.item_id)
    }
}
