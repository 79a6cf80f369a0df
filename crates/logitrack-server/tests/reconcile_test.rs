//! Reconciliation loop against a paused clock.

mod helpers;

use std::time::Duration;

use helpers::{harness, item, scripted_harness, widget};
use logitrack_core::{InventoryItem, NewOrder, Order};
use logitrack_server::ReconcileConfig;
use logitrack_server::cache::CacheKey;
use logitrack_server::sync::{ReconcileCounts, ReconcileState};
use logitrack_store::Store;

const INTERVAL: Duration = Duration::from_secs(600);

fn config(refresh_collections: bool) -> ReconcileConfig {
    ReconcileConfig {
        interval: INTERVAL,
        refresh_collections,
    }
}

/// Lets the scheduler task run until it has attempted `runs` ticks.
async fn wait_for_runs(state: &ReconcileState, runs: u64) {
    for _ in 0..1_000 {
        if state.runs() >= runs {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("scheduler stalled at {} runs, expected {}", state.runs(), runs);
}

#[tokio::test(start_paused = true)]
async fn first_tick_runs_immediately_then_every_interval() {
    let h = harness();
    h.store.insert_item(widget()).await.unwrap();
    let state = h.state.reconcile_state();

    let handle = h.state.reconcile_scheduler(config(true)).start();
    wait_for_runs(&state, 1).await;
    assert_eq!(
        state.counts(),
        Some(ReconcileCounts {
            items: 1,
            orders: 0
        })
    );

    h.store.insert_order(NewOrder::default()).await.unwrap();
    tokio::time::advance(INTERVAL / 2).await;
    tokio::task::yield_now().await;
    assert_eq!(state.runs(), 1);

    tokio::time::advance(INTERVAL / 2).await;
    wait_for_runs(&state, 2).await;
    assert_eq!(state.counts().unwrap().orders, 1);
    assert!(state.is_healthy());

    tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn shutdown_is_prompt_while_waiting_for_tick() {
    let h = harness();
    let state = h.state.reconcile_state();

    let handle = h.state.reconcile_scheduler(config(false)).start();
    wait_for_runs(&state, 1).await;
    assert!(!handle.is_finished());

    tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
        .await
        .unwrap();
    assert_eq!(state.runs(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_a_tick_stuck_in_the_store() {
    let (h, scripted) = scripted_harness();
    scripted.hang_counts(true);
    let state = h.state.reconcile_state();

    let handle = h.state.reconcile_scheduler(config(true)).start();
    for _ in 0..1_000 {
        if scripted.count_calls() > 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(scripted.count_calls(), 1);
    assert!(!handle.is_finished());

    tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
        .await
        .unwrap();
    assert_eq!(state.runs(), 0);
    assert!(state.counts().is_none());
}

#[tokio::test(start_paused = true)]
async fn failed_ticks_are_counted_and_loop_recovers() {
    let h = harness();
    h.store.insert_item(widget()).await.unwrap();
    let state = h.state.reconcile_state();
    h.store.set_available(false);

    let handle = h.state.reconcile_scheduler(config(true)).start();
    wait_for_runs(&state, 1).await;
    assert_eq!(state.failure_count(), 1);
    assert!(state.counts().is_none());
    assert!(state.last_error().unwrap().contains("unavailable"));

    tokio::time::advance(INTERVAL).await;
    wait_for_runs(&state, 2).await;
    assert_eq!(state.failure_count(), 2);
    assert!(!state.is_healthy());

    h.store.set_available(true);
    tokio::time::advance(INTERVAL).await;
    wait_for_runs(&state, 3).await;
    assert_eq!(state.failure_count(), 0);
    assert!(state.last_error().is_none());
    assert_eq!(state.counts().unwrap().items, 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn tick_refreshes_collection_entries() {
    let h = harness();
    h.store.insert_item(widget()).await.unwrap();
    h.store.insert_item(item("Gadget", 3, "B2", 150)).await.unwrap();
    h.store
        .insert_order(NewOrder::for_customer("ACME"))
        .await
        .unwrap();
    assert!(h.backend.peek("inventory_items").await.is_none());

    let scheduler = h.state.reconcile_scheduler(config(true));
    let counts = scheduler.trigger().await.unwrap();

    assert_eq!(
        counts,
        ReconcileCounts {
            items: 2,
            orders: 1
        }
    );
    let items: Vec<InventoryItem> = h.state.cache().get(&CacheKey::all_items()).await.unwrap();
    assert_eq!(items.len(), 2);
    let orders: Vec<Order> = h.state.cache().get(&CacheKey::all_orders()).await.unwrap();
    assert_eq!(orders[0].customer_name(), "ACME");

    // Served from the refreshed entry
    let reads = h.reads();
    h.state.inventory().list_items().await.unwrap();
    assert_eq!(h.reads(), reads);
}

#[tokio::test]
async fn tick_without_refresh_only_counts() {
    let h = harness();
    h.store.insert_item(widget()).await.unwrap();

    let scheduler = h.state.reconcile_scheduler(config(false));
    scheduler.trigger().await.unwrap();

    assert!(h.backend.peek("inventory_items").await.is_none());
    assert!(h.backend.peek("orders").await.is_none());
    assert_eq!(scheduler.state().counts().unwrap().items, 1);
}

#[tokio::test]
async fn manual_trigger_reports_store_failure() {
    let h = harness();
    h.store.set_available(false);

    let scheduler = h.state.reconcile_scheduler(config(true));
    let err = scheduler.trigger().await.unwrap_err();

    assert!(err.is_transient());
    assert_eq!(scheduler.state().failure_count(), 1);
    assert_eq!(scheduler.state().runs(), 1);
}

#[tokio::test]
async fn cache_outage_does_not_fail_the_tick() {
    let h = harness();
    h.store.insert_item(widget()).await.unwrap();
    h.backend.set_down(true);

    let scheduler = h.state.reconcile_scheduler(config(true));
    scheduler.trigger().await.unwrap();

    assert!(scheduler.state().is_healthy());
    assert!(h.backend.failures() >= 2);
}
