//! # LogiTrack Store
//!
//! The relational source of truth behind the LogiTrack cache layer.
//!
//! This crate defines the [`Store`] trait, the error type it reports, and
//! [`MemoryStore`], an in-process implementation with the same constraint
//! semantics as the relational schema:
//!
//! - items and orders get store-generated ids
//! - `(order_id, item_id)` links are unique
//! - links require both sides to exist
//! - deleting an item or an order cascades to its links
//!
//! ## Example
//!
//! ```
//! use logitrack_core::{Decimal, NewInventoryItem};
//! use logitrack_store::{MemoryStore, Store};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), logitrack_store::StoreError> {
//! let store = MemoryStore::new();
//! let id = store
//!     .insert_item(NewInventoryItem::new("Widget", 10, "A1", Decimal::new(299, 2)))
//!     .await?;
//! assert_eq!(store.load_item(id).await?.map(|i| i.quantity()), Some(10));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filter;
pub mod memory;
pub mod traits;

// Re-exports
pub use error::StoreError;
pub use filter::ItemFilter;
pub use memory::MemoryStore;
pub use traits::{Store, StoreResult};

/// Shared handle to a store.
pub type DynStore = std::sync::Arc<dyn Store>;

// Re-export logitrack_core for consumers
pub use logitrack_core;
