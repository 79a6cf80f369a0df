//! Background reconciliation scheduler.

use std::sync::Arc;
use std::time::Duration;

use logitrack_core::Result;
use logitrack_store::Store;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use super::{ReconcileCounts, ReconcileState};
use crate::cache::{CacheKey, CacheLayer};
use crate::metrics::reconcile::{record_reconcile_failure, record_reconcile_success};

/// Configuration for the reconciliation scheduler.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Interval between ticks.
    pub interval: Duration,
    /// Reload and rewrite the whole-collection cache entries on each tick.
    pub refresh_collections: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600),
            refresh_collections: true,
        }
    }
}

/// Handle for controlling a running reconciliation scheduler.
///
/// Dropping the handle stops the scheduler.
pub struct ReconcileHandle {
    /// Sender to signal shutdown.
    shutdown_tx: watch::Sender<bool>,
    /// The scheduler task.
    task: Option<JoinHandle<()>>,
}

impl ReconcileHandle {
    /// Signals the scheduler to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Returns true once the scheduler task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Signals the scheduler to stop and waits for the task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Reconciliation task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for ReconcileHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Periodically re-reads the store and republishes canonical state.
///
/// Each tick counts items and orders and, when enabled, rewrites the
/// whole-collection cache entries. A failed tick is recorded and skipped.
pub struct ReconcileScheduler {
    /// The source of truth.
    store: Arc<dyn Store>,
    /// The cache to refresh.
    cache: CacheLayer,
    /// The current state.
    state: Arc<ReconcileState>,
    /// Configuration.
    config: ReconcileConfig,
}

impl ReconcileScheduler {
    /// Creates a new reconciliation scheduler.
    pub fn new(
        store: Arc<dyn Store>,
        cache: CacheLayer,
        state: Arc<ReconcileState>,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            store,
            cache,
            state,
            config,
        }
    }

    /// Creates a scheduler with default configuration and fresh state.
    pub fn with_defaults(store: Arc<dyn Store>, cache: CacheLayer) -> Self {
        Self::new(
            store,
            cache,
            Arc::new(ReconcileState::new()),
            ReconcileConfig::default(),
        )
    }

    /// Returns the shared state.
    pub fn state(&self) -> Arc<ReconcileState> {
        Arc::clone(&self.state)
    }

    /// Starts the background reconciliation task.
    ///
    /// Returns a handle that can be used to stop the scheduler.
    pub fn start(self) -> ReconcileHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run_until(shutdown_rx));

        ReconcileHandle {
            shutdown_tx,
            task: Some(task),
        }
    }

    /// Runs the scheduler loop until `shutdown_rx` reads `true` or its
    /// sender is dropped.
    ///
    /// The first tick runs immediately. Shutdown is observed while waiting
    /// for the next tick and during each tick's store calls.
    pub async fn run_until(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut interval_timer = interval(self.config.interval);
        interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Starting reconciliation scheduler with interval {:?}",
            self.config.interval
        );

        loop {
            tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown_rx) => break,
                _ = interval_timer.tick() => {
                    tokio::select! {
                        biased;
                        _ = wait_for_shutdown(&mut shutdown_rx) => {
                            debug!("Reconciliation tick cancelled");
                            break;
                        }
                        _ = self.do_tick() => {}
                    }
                }
            }
        }

        info!("Reconciliation scheduler shutting down");
    }

    /// Performs a single tick, recording its outcome.
    async fn do_tick(&self) {
        debug!("Starting scheduled reconciliation");

        if let Err(e) = self.trigger_inner().await {
            warn!(
                failures = self.state.failure_count(),
                "Reconciliation failed, skipping tick: {}", e
            );
        }
    }

    /// Manually triggers a tick.
    pub async fn trigger(&self) -> Result<ReconcileCounts> {
        info!("Manual reconciliation triggered");
        self.trigger_inner().await
    }

    async fn trigger_inner(&self) -> Result<ReconcileCounts> {
        let result = self.reconcile().await;

        match &result {
            Ok(counts) => {
                self.state.record_success(*counts);
                record_reconcile_success(counts.items, counts.orders);
                info!(
                    items = counts.items,
                    orders = counts.orders,
                    "Reconciliation complete"
                );
            },
            Err(e) => {
                self.state.record_failure(e.to_string());
                record_reconcile_failure();
            },
        }

        result
    }

    /// Reads the store summary and refreshes the collection entries.
    async fn reconcile(&self) -> Result<ReconcileCounts> {
        let counts = ReconcileCounts {
            items: self.store.count_items().await?,
            orders: self.store.count_orders().await?,
        };

        if self.config.refresh_collections {
            let items = self.store.load_items().await?;
            self.cache.put(&CacheKey::all_items(), &items).await;

            let orders = self.store.load_orders().await?;
            self.cache.put(&CacheKey::all_orders(), &orders).await;
        }

        Ok(counts)
    }
}

async fn wait_for_shutdown(shutdown_rx: &mut watch::Receiver<bool>) {
    // Un sender descartado cuenta como shutdown
    let _ = shutdown_rx.wait_for(|stop| *stop).await;
}
