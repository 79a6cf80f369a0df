mod common;

use logitrack_core::{Decimal, NewInventoryItem, NewOrder, Order, UNKNOWN_CUSTOMER};

#[test]
fn test_item_snapshot_preserves_price_precision() {
    let item = common::item(1, "Widget", 10, "A1", 299);

    let json = serde_json::to_string(&item).unwrap();
    assert!(json.contains(r#""price":"2.99""#));

    let back: logitrack_core::InventoryItem = serde_json::from_str(&json).unwrap();
    assert_eq!(back, item);
    assert_eq!(back.price(), Decimal::new(299, 2));
}

#[test]
fn test_new_item_ignores_client_supplied_id() {
    let json = r#"{"id": 99, "name": "Widget", "quantity": 10, "location": "A1", "price": "2.99"}"#;

    let new: NewInventoryItem = serde_json::from_str(json).unwrap();
    assert_eq!(new, NewInventoryItem::new("Widget", 10, "A1", Decimal::new(299, 2)));
}

#[test]
fn test_new_order_defaults_when_fields_absent() {
    let new: NewOrder = serde_json::from_str("{}").unwrap();

    assert_eq!(new.customer_name, UNKNOWN_CUSTOMER);
}

#[test]
fn test_order_snapshot_roundtrip() {
    let order = common::order(4, "Ada");

    let json = serde_json::to_string(&order).unwrap();
    let back: Order = serde_json::from_str(&json).unwrap();

    assert_eq!(back, order);
    assert_eq!(back.date_placed(), order.date_placed());
}
