//! Reconciliation state tracking.

use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Store counts read by one reconciliation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileCounts {
    /// Number of inventory items.
    pub items: u64,
    /// Number of orders.
    pub orders: u64,
}

/// Tracks the outcome of reconciliation ticks for monitoring.
#[derive(Debug)]
pub struct ReconcileState {
    /// Counts from the last successful tick.
    counts: RwLock<Option<ReconcileCounts>>,
    /// The last successful tick time.
    last_success: RwLock<Option<Instant>>,
    /// The last error message, if any.
    last_error: RwLock<Option<String>>,
    /// Number of consecutive failures.
    failure_count: RwLock<u32>,
    /// Ticks attempted, successful or not.
    runs: RwLock<u64>,
}

impl ReconcileState {
    /// Creates a new ReconcileState.
    pub fn new() -> Self {
        Self {
            counts: RwLock::new(None),
            last_success: RwLock::new(None),
            last_error: RwLock::new(None),
            failure_count: RwLock::new(0),
            runs: RwLock::new(0),
        }
    }

    /// Returns the counts from the last successful tick.
    pub fn counts(&self) -> Option<ReconcileCounts> {
        *self.counts.read()
    }

    /// Returns the time of the last successful tick.
    pub fn last_success(&self) -> Option<Instant> {
        *self.last_success.read()
    }

    /// Returns the duration since the last successful tick.
    pub fn time_since_success(&self) -> Option<Duration> {
        self.last_success.read().map(|t| t.elapsed())
    }

    /// Records a successful tick.
    pub fn record_success(&self, counts: ReconcileCounts) {
        let mut counts_lock = self.counts.write();
        let mut last_success = self.last_success.write();
        let mut last_error = self.last_error.write();
        let mut failure_count = self.failure_count.write();
        let mut runs = self.runs.write();

        *counts_lock = Some(counts);
        *last_success = Some(Instant::now());
        *last_error = None;
        *failure_count = 0;
        *runs += 1;
    }

    /// Records a failed tick. Previous counts are kept.
    pub fn record_failure(&self, error: impl Into<String>) {
        let mut last_error = self.last_error.write();
        let mut failure_count = self.failure_count.write();
        let mut runs = self.runs.write();

        *last_error = Some(error.into());
        *failure_count += 1;
        *runs += 1;
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Returns the number of consecutive failures.
    pub fn failure_count(&self) -> u32 {
        *self.failure_count.read()
    }

    /// Returns the number of ticks attempted.
    pub fn runs(&self) -> u64 {
        *self.runs.read()
    }

    /// Returns true if at least one tick succeeded and the last one did.
    pub fn is_healthy(&self) -> bool {
        self.counts.read().is_some() && self.last_error.read().is_none()
    }
}

impl Default for ReconcileState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTS: ReconcileCounts = ReconcileCounts {
        items: 3,
        orders: 1,
    };

    #[test]
    fn test_new_state() {
        let state = ReconcileState::new();
        assert!(state.counts().is_none());
        assert!(state.last_success().is_none());
        assert!(state.last_error().is_none());
        assert_eq!(state.failure_count(), 0);
        assert_eq!(state.runs(), 0);
        assert!(!state.is_healthy());
    }

    #[test]
    fn test_record_success() {
        let state = ReconcileState::new();
        state.record_success(COUNTS);

        assert_eq!(state.counts(), Some(COUNTS));
        assert!(state.last_success().is_some());
        assert!(state.time_since_success().is_some());
        assert!(state.is_healthy());
        assert_eq!(state.runs(), 1);
    }

    #[test]
    fn test_failure_keeps_counts_and_success_resets() {
        let state = ReconcileState::new();
        state.record_success(COUNTS);
        state.record_failure("store unavailable");
        state.record_failure("store unavailable");

        assert_eq!(state.failure_count(), 2);
        assert_eq!(state.counts(), Some(COUNTS));
        assert_eq!(state.last_error(), Some("store unavailable".to_string()));
        assert!(!state.is_healthy());

        state.record_success(COUNTS);
        assert_eq!(state.failure_count(), 0);
        assert!(state.last_error().is_none());
        assert_eq!(state.runs(), 4);
    }
}
