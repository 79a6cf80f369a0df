//! Predicates for filtered item loads.

use std::collections::BTreeSet;

use logitrack_core::{InventoryItem, ItemId};

/// Predicate accepted by [`Store::load_items_where`](crate::Store::load_items_where).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFilter {
    /// Case-insensitive substring match on name or location.
    Term(String),
    /// Exactly the listed ids.
    Ids(BTreeSet<ItemId>),
}

impl ItemFilter {
    /// Builds a search filter. The term is trimmed and lowercased.
    pub fn term(term: impl AsRef<str>) -> Self {
        Self::Term(term.as_ref().trim().to_lowercase())
    }

    /// Builds an id-set filter.
    pub fn ids(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self::Ids(ids.into_iter().collect())
    }

    /// Evaluates the predicate against one item.
    pub fn matches(&self, item: &InventoryItem) -> bool {
        match self {
            Self::Term(term) => item.matches_term(term),
            Self::Ids(ids) => ids.contains(&item.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logitrack_core::{Decimal, NewInventoryItem};

    fn item(id: i64, name: &str, location: &str) -> InventoryItem {
        InventoryItem::from_new(
            ItemId::new(id),
            NewInventoryItem::new(name, 1, location, Decimal::ONE),
        )
    }

    #[test]
    fn test_term_filter_normalizes() {
        let filter = ItemFilter::term("  WIDget ");
        assert_eq!(filter, ItemFilter::Term("widget".into()));
        assert!(filter.matches(&item(1, "Blue Widget", "A1")));
        assert!(!filter.matches(&item(2, "Gadget", "B2")));
    }

    #[test]
    fn test_term_filter_matches_location() {
        let filter = ItemFilter::term("warehouse");
        assert!(filter.matches(&item(1, "Bolt", "Warehouse A")));
    }

    #[test]
    fn test_ids_filter() {
        let filter = ItemFilter::ids([ItemId::new(1), ItemId::new(3)]);
        assert!(filter.matches(&item(3, "Bolt", "A")));
        assert!(!filter.matches(&item(2, "Nut", "A")));
    }
}
