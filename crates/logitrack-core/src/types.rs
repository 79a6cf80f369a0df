//! Identifier newtypes for LogiTrack entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-generated identifier of an [`InventoryItem`](crate::InventoryItem).
///
/// Only the store mints new ids; callers never choose one for a new record.
///
/// # Example
///
/// ```
/// use logitrack_core::ItemId;
///
/// let id = ItemId::new(42);
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Wraps a raw id value.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Store-generated identifier of an [`Order`](crate::Order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    /// Wraps a raw id value.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// The kinds of record held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// An inventory item.
    InventoryItem,
    /// A customer order.
    Order,
    /// An order/item association row.
    OrderItemLink,
}

impl EntityKind {
    /// Returns the canonical snake_case name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InventoryItem => "inventory_item",
            Self::Order => "order",
            Self::OrderItemLink => "order_item_link",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display_bare_number() {
        assert_eq!(ItemId::new(7).to_string(), "7");
        assert_eq!(OrderId::new(12).to_string(), "12");
    }

    #[test]
    fn test_ids_are_ordered() {
        let mut ids = vec![ItemId::new(3), ItemId::new(1), ItemId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![ItemId::new(1), ItemId::new(2), ItemId::new(3)]);
    }

    #[test]
    fn test_entity_kind_names() {
        assert_eq!(EntityKind::InventoryItem.to_string(), "inventory_item");
        assert_eq!(EntityKind::Order.as_str(), "order");
        assert_eq!(EntityKind::OrderItemLink.as_str(), "order_item_link");
    }
}
