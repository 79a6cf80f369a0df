//! Cache metrics recording.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("logitrack_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!(
        "logitrack_cache_misses_total",
        "Total number of cache misses"
    );
    metrics::describe_counter!(
        "logitrack_cache_errors_total",
        "Cache backend failures absorbed as misses"
    );
    metrics::describe_counter!(
        "logitrack_cache_evictions_total",
        "Total number of cache evictions"
    );
    metrics::describe_gauge!(
        "logitrack_cache_entries",
        "Current number of entries in the in-process cache"
    );
    metrics::describe_histogram!(
        "logitrack_cache_operation_seconds",
        "Time spent on cache operations"
    );
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos para poder consultar el hit rate sin exporter.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            errors: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra un cache hit
    pub fn record_hit(&self, class: &'static str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("logitrack_cache_hits_total", "class" => class).increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self, class: &'static str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("logitrack_cache_misses_total", "class" => class).increment(1);
    }

    /// Registra un fallo del backend que se absorbio
    pub fn record_error(&self, backend: &str, kind: &'static str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        counter!(
            "logitrack_cache_errors_total",
            "backend" => backend.to_string(),
            "kind" => kind
        )
        .increment(1);
    }

    /// Registra una eviction
    pub fn record_eviction(&self, reason: &'static str) {
        counter!("logitrack_cache_evictions_total", "reason" => reason).increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: u64) {
        gauge!("logitrack_cache_entries").set(count as f64);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("logitrack_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let misses = self.misses() as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de fallos absorbidos
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}
