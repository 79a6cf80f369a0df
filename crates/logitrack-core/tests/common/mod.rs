#![allow(dead_code)]
use logitrack_core::{Decimal, InventoryItem, ItemId, NewInventoryItem, NewOrder, Order, OrderId};

/// Builds a persisted item fixture.
pub fn item(id: i64, name: &str, quantity: i32, location: &str, cents: i64) -> InventoryItem {
    InventoryItem::from_new(
        ItemId::new(id),
        NewInventoryItem::new(name, quantity, location, Decimal::new(cents, 2)),
    )
}

/// Builds a persisted order fixture.
pub fn order(id: i64, customer: &str) -> Order {
    Order::from_new(OrderId::new(id), NewOrder::for_customer(customer))
}
