//! Test helpers para logitrack-server.

#![allow(dead_code, unused_imports)]

pub mod flaky;
pub mod scripted;

pub use flaky::FlakyCache;
pub use scripted::ScriptedStore;

use std::sync::Arc;

use logitrack_core::{Decimal, NewInventoryItem};
use logitrack_server::AppState;
use logitrack_server::cache::{CacheLayer, CachePolicies};
use logitrack_store::MemoryStore;

/// Store, cache backend and wired state sharing both.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub backend: Arc<FlakyCache>,
    pub state: AppState,
}

impl Harness {
    /// Store reads so far.
    pub fn reads(&self) -> u64 {
        self.store.read_count()
    }

    /// Store writes attempted so far.
    pub fn writes(&self) -> u64 {
        self.store.write_count()
    }
}

/// A harness over an empty store and a healthy in-process cache.
pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let backend = Arc::new(FlakyCache::new());
    let cache = CacheLayer::new(backend.clone(), CachePolicies::default());
    let state = AppState::new(store.clone(), cache);

    Harness {
        store,
        backend,
        state,
    }
}

/// A harness whose state talks to a [`ScriptedStore`] over `store`.
pub fn scripted_harness() -> (Harness, Arc<ScriptedStore>) {
    let store = Arc::new(MemoryStore::new());
    let scripted = Arc::new(ScriptedStore::new(store.clone()));
    let backend = Arc::new(FlakyCache::new());
    let cache = CacheLayer::new(backend.clone(), CachePolicies::default());
    let state = AppState::new(scripted.clone(), cache);

    let h = Harness {
        store,
        backend,
        state,
    };
    (h, scripted)
}

/// The item used throughout: Widget, 10 units at A1, 2.99.
pub fn widget() -> NewInventoryItem {
    NewInventoryItem::new("Widget", 10, "A1", Decimal::new(299, 2))
}

/// An item with a price in cents.
pub fn item(name: &str, quantity: i32, location: &str, cents: i64) -> NewInventoryItem {
    NewInventoryItem::new(name, quantity, location, Decimal::new(cents, 2))
}
