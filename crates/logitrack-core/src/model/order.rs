//! Customer order entity.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ItemId, OrderId};

/// Customer name recorded when an order is placed anonymously.
pub const UNKNOWN_CUSTOMER: &str = "Unknown";

/// A customer order.
///
/// The items of an order are not stored here; see [`OrderDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_name: String,
    date_placed: DateTime<Utc>,
}

impl Order {
    /// Builds the persisted form of `new` under a store-assigned id.
    pub fn from_new(id: OrderId, new: NewOrder) -> Self {
        Self {
            id,
            customer_name: new.customer_name,
            date_placed: new.date_placed,
        }
    }

    /// Returns the store-assigned id.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the customer name.
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Returns when the order was placed.
    pub fn date_placed(&self) -> DateTime<Utc> {
        self.date_placed
    }

    /// Renames the customer. A blank name resets it to [`UNKNOWN_CUSTOMER`].
    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = normalize_customer(Some(name.into()));
    }

    /// Moves the placement date.
    pub fn set_date_placed(&mut self, date: DateTime<Utc>) {
        self.date_placed = date;
    }

    /// One-line order summary.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use logitrack_core::{NewOrder, Order, OrderId};
    ///
    /// let placed = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
    /// let order = Order::from_new(OrderId::new(7), NewOrder::for_customer("Ada").placed_at(placed));
    /// assert_eq!(order.summary(2), "Order #7 for Ada | Items: 2 | Placed: 2026-10-17");
    /// ```
    pub fn summary(&self, item_count: usize) -> String {
        format!(
            "Order #{} for {} | Items: {} | Placed: {}",
            self.id,
            self.customer_name,
            item_count,
            self.date_placed.format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrderId: {}, Customer: {}, Placed: {}",
            self.id,
            self.customer_name,
            self.date_placed.to_rfc3339()
        )
    }
}

/// Attributes of an order that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Customer name, [`UNKNOWN_CUSTOMER`] when absent
    #[serde(default = "unknown_customer")]
    pub customer_name: String,
    /// Placement time, defaults to now
    #[serde(default = "Utc::now")]
    pub date_placed: DateTime<Utc>,
}

fn unknown_customer() -> String {
    UNKNOWN_CUSTOMER.to_string()
}

fn normalize_customer(name: Option<String>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => unknown_customer(),
    }
}

impl NewOrder {
    /// Creates an order for `customer_name`, placed now.
    ///
    /// A missing or blank name becomes [`UNKNOWN_CUSTOMER`].
    pub fn new(customer_name: Option<String>) -> Self {
        Self {
            customer_name: normalize_customer(customer_name),
            date_placed: Utc::now(),
        }
    }

    /// Creates an order for a named customer, placed now.
    pub fn for_customer(customer_name: impl Into<String>) -> Self {
        Self::new(Some(customer_name.into()))
    }

    /// Overrides the placement time.
    pub fn placed_at(mut self, date: DateTime<Utc>) -> Self {
        self.date_placed = date;
        self
    }
}

impl Default for NewOrder {
    fn default() -> Self {
        Self::new(None)
    }
}

/// A partial update of an existing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPatch {
    /// New customer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// New placement time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_placed: Option<DateTime<Utc>>,
}

impl OrderPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none() && self.date_placed.is_none()
    }

    /// Applies the patch to `order`.
    pub fn apply(&self, order: &mut Order) {
        if let Some(name) = &self.customer_name {
            order.set_customer_name(name.clone());
        }
        if let Some(date) = self.date_placed {
            order.set_date_placed(date);
        }
    }
}

/// An order together with the ids of the items linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    /// The order itself
    pub order: Order,
    /// Linked item ids; membership is a set
    pub item_ids: BTreeSet<ItemId>,
}

impl OrderDetails {
    /// Number of linked items.
    pub fn item_count(&self) -> usize {
        self.item_ids.len()
    }

    /// Returns true if `item` is linked to the order.
    pub fn contains(&self, item: ItemId) -> bool {
        self.item_ids.contains(&item)
    }

    /// One-line order summary including the item count.
    pub fn summary(&self) -> String {
        self.order.summary(self.item_count())
    }
}
