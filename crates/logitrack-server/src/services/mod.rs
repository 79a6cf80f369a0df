//! Read and write paths for items and orders.
//!
//! Every write commits to the store before touching the cache, and the
//! cache is updated before the write returns.

pub mod inventory;
pub mod orders;

pub use inventory::InventoryService;
pub use orders::OrderService;
