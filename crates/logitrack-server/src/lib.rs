//! # LogiTrack Server
//!
//! Cache-consistency layer over the LogiTrack inventory/order store.
//!
//! - [`cache`]: cache-aside reads with per-class absolute and sliding
//!   expiration over an in-process, Redis, or no-op backend
//! - [`association`]: the order/item many-to-many relationship with
//!   idempotent link changes and cascade deletes
//! - [`services`]: item and order read/write paths that keep the cache
//!   coherent with the store
//! - [`sync`]: the background reconciliation loop
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use logitrack_core::{Decimal, NewInventoryItem, NewOrder};
//! use logitrack_server::AppState;
//! use logitrack_store::MemoryStore;
//!
//! # #[tokio::main]
//! # async fn main() -> logitrack_core::Result<()> {
//! let state = AppState::with_memory_cache(Arc::new(MemoryStore::new()));
//!
//! let item = state
//!     .inventory()
//!     .create_item(NewInventoryItem::new("Widget", 10, "A1", Decimal::new(299, 2)))
//!     .await?;
//! let order = state.orders().create_order(NewOrder::for_customer("Ada")).await?;
//! state.associations().add_item(order.id(), item.id()).await?;
//!
//! let details = state.orders().order_details(order.id()).await?;
//! assert_eq!(details.item_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod association;
pub mod cache;
pub mod metrics;
pub mod services;
pub mod settings;
pub mod state;
pub mod sync;

// Re-exports
pub use association::{AssociationManager, LinkChange};
pub use cache::{CacheKey, CacheLayer};
pub use services::{InventoryService, OrderService};
pub use settings::Settings;
pub use state::AppState;
pub use sync::{ReconcileConfig, ReconcileHandle, ReconcileScheduler};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
