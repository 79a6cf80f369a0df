//! Cache key generation and normalization.

use std::fmt;

use logitrack_core::{ItemId, OrderId};

/// Key de la coleccion completa de items.
pub const ALL_ITEMS_KEY: &str = "inventory_items";

/// Key de la coleccion completa de ordenes.
pub const ALL_ORDERS_KEY: &str = "orders";

/// Prefijo de las busquedas de items.
pub const ITEM_SEARCH_PREFIX: &str = "inventory_items_search_";

/// Patron glob que cubre todas las busquedas de items.
pub const ITEM_SEARCH_PATTERN: &str = "inventory_items_search_*";

/// Clase de una key; determina su politica de expiracion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
    /// Coleccion completa ("all items", "all orders").
    Collection,
    /// Una entidad por id, o el set de links de una orden.
    Entity,
    /// Resultado de una consulta filtrada.
    Query,
}

impl KeyClass {
    /// Nombre corto para logs y metricas.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Entity => "entity",
            Self::Query => "query",
        }
    }
}

/// Key unica de cache.
///
/// Solo se construye con los constructores de abajo, que reproducen la
/// convencion `<entity-kind>_<qualifier>` compartida entre despliegues.
///
/// # Examples
///
/// ```
/// use logitrack_core::ItemId;
/// use logitrack_server::cache::CacheKey;
///
/// assert_eq!(CacheKey::all_items().as_str(), "inventory_items");
/// assert_eq!(CacheKey::item(ItemId::new(42)).as_str(), "inventory_item_42");
/// assert_eq!(
///     CacheKey::item_search("  Widget ").as_str(),
///     "inventory_items_search_widget"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    key: String,
    class: KeyClass,
}

impl CacheKey {
    fn new(key: String, class: KeyClass) -> Self {
        Self { key, class }
    }

    /// Todos los items.
    pub fn all_items() -> Self {
        Self::new(ALL_ITEMS_KEY.to_string(), KeyClass::Collection)
    }

    /// Un item por id.
    pub fn item(id: ItemId) -> Self {
        Self::new(format!("inventory_item_{}", id), KeyClass::Entity)
    }

    /// Busqueda de items por termino. El termino se normaliza.
    pub fn item_search(term: &str) -> Self {
        Self::new(
            format!("{}{}", ITEM_SEARCH_PREFIX, normalize_term(term)),
            KeyClass::Query,
        )
    }

    /// Todas las ordenes.
    pub fn all_orders() -> Self {
        Self::new(ALL_ORDERS_KEY.to_string(), KeyClass::Collection)
    }

    /// Una orden por id.
    pub fn order(id: OrderId) -> Self {
        Self::new(format!("order_{}", id), KeyClass::Entity)
    }

    /// Los ids de items enlazados a una orden.
    pub fn order_items(id: OrderId) -> Self {
        Self::new(format!("order_{}_items", id), KeyClass::Entity)
    }

    /// Retorna la key como string.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Retorna la clase de la key.
    pub fn class(&self) -> KeyClass {
        self.class
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

/// Normaliza un termino de busqueda: trim + lowercase.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}
