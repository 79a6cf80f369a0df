//! Inventory item entity.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LogiTrackError, Result};
use crate::types::ItemId;

/// A stocked inventory item.
///
/// Instances with an id only come out of the store; new records are
/// described with [`NewInventoryItem`], which has no id field at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    quantity: i32,
    location: String,
    price: Decimal,
}

impl InventoryItem {
    /// Builds the persisted form of `new` under a store-assigned id.
    pub fn from_new(id: ItemId, new: NewInventoryItem) -> Self {
        Self {
            id,
            name: new.name,
            quantity: new.quantity,
            location: new.location,
            price: new.price,
        }
    }

    /// Returns the store-assigned id.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the quantity on hand.
    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    /// Returns the storage location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the unit price.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Sets the quantity on hand.
    pub fn update_quantity(&mut self, quantity: i32) -> Result<()> {
        validate_quantity(quantity)?;
        self.quantity = quantity;
        Ok(())
    }

    /// Moves the item to another location.
    pub fn update_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Sets the unit price.
    pub fn update_price(&mut self, price: Decimal) -> Result<()> {
        validate_price(price)?;
        self.price = price;
        Ok(())
    }

    /// Checks every attribute invariant.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_quantity(self.quantity)?;
        validate_price(self.price)
    }

    /// Returns true if `term` occurs in the name or location, ignoring case.
    ///
    /// `term` is expected to be lowercase already.
    pub fn matches_term(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term) || self.location.to_lowercase().contains(term)
    }

    /// One-line stock summary.
    ///
    /// ```
    /// use logitrack_core::{InventoryItem, ItemId, NewInventoryItem, Decimal};
    ///
    /// let new = NewInventoryItem::new("Pallet Jack", 12, "Warehouse A", Decimal::new(19900, 2));
    /// let item = InventoryItem::from_new(ItemId::new(6), new);
    /// assert_eq!(item.summary(), "Item: Pallet Jack | Quantity: 12 | Location: Warehouse A");
    /// ```
    pub fn summary(&self) -> String {
        format!(
            "Item: {} | Quantity: {} | Location: {}",
            self.name, self.quantity, self.location
        )
    }
}

impl fmt::Display for InventoryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ItemId: {}, Name: {}, Quantity: {}, Location: {}, Price: {}",
            self.id, self.name, self.quantity, self.location, self.price
        )
    }
}

/// Attributes of an item that does not exist yet.
///
/// Unknown fields are ignored on deserialization, so a client-supplied
/// `id` never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    /// Item name, must not be blank
    pub name: String,
    /// Quantity on hand, must not be negative
    pub quantity: i32,
    /// Storage location
    #[serde(default)]
    pub location: String,
    /// Unit price, must not be negative
    pub price: Decimal,
}

impl NewInventoryItem {
    /// Creates a new item description.
    pub fn new(
        name: impl Into<String>,
        quantity: i32,
        location: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            location: location.into(),
            price,
        }
    }

    /// Checks every attribute invariant.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_quantity(self.quantity)?;
        validate_price(self.price)
    }
}

/// A partial update of an existing item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    /// New quantity on hand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    /// New storage location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New unit price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

impl ItemPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.location.is_none() && self.price.is_none()
    }

    /// Applies the patch to `item`.
    ///
    /// Either every field is applied or, on a validation failure, none is.
    pub fn apply(&self, item: &mut InventoryItem) -> Result<()> {
        let mut updated = item.clone();
        if let Some(quantity) = self.quantity {
            updated.update_quantity(quantity)?;
        }
        if let Some(location) = &self.location {
            updated.update_location(location.clone());
        }
        if let Some(price) = self.price {
            updated.update_price(price)?;
        }
        *item = updated;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LogiTrackError::validation("name", "must not be empty"));
    }
    Ok(())
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 0 {
        return Err(LogiTrackError::validation(
            "quantity",
            format!("must not be negative (got {quantity})"),
        ));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> Result<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(LogiTrackError::validation(
            "price",
            format!("must not be negative (got {price})"),
        ));
    }
    Ok(())
}
