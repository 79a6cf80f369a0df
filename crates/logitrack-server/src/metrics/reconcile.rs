//! Reconciliation metrics.

use metrics::{counter, gauge};

/// Registra las metricas de reconciliacion.
pub fn register_reconcile_metrics() {
    metrics::describe_counter!(
        "logitrack_reconcile_runs_total",
        "Reconciliation ticks by outcome"
    );
    metrics::describe_gauge!(
        "logitrack_inventory_items",
        "Inventory items in the store at the last reconciliation"
    );
    metrics::describe_gauge!(
        "logitrack_orders",
        "Orders in the store at the last reconciliation"
    );
}

/// Registra un tick exitoso con los conteos leidos del store.
pub fn record_reconcile_success(items: u64, orders: u64) {
    counter!("logitrack_reconcile_runs_total", "outcome" => "success").increment(1);
    gauge!("logitrack_inventory_items").set(items as f64);
    gauge!("logitrack_orders").set(orders as f64);
}

/// Registra un tick fallido.
pub fn record_reconcile_failure() {
    counter!("logitrack_reconcile_runs_total", "outcome" => "failure").increment(1);
}
