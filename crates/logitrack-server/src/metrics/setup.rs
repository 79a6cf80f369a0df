//! Metrics setup and initialization.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::info;

use super::cache::register_cache_metrics;
use super::reconcile::register_reconcile_metrics;

// Buckets para histogramas (en segundos)
const BUCKETS: &[f64] = &[
    0.0001, // 100 microsegundos
    0.0005, // 500 microsegundos
    0.001,  // 1 milisegundo
    0.0025, // 2.5 milisegundos
    0.005,  // 5 milisegundos
    0.01,   // 10 milisegundos
    0.025,  // 25 milisegundos
    0.05,   // 50 milisegundos
    0.1,    // 100 milisegundos
    0.25,   // 250 milisegundos
    0.5,    // 500 milisegundos
    1.0,    // 1 segundo
];

/// Inicializa el sistema de metricas.
///
/// Con `listen` expone `/metrics` en esa direccion; sin el, las metricas
/// se registran pero no se exportan. Requiere un runtime de tokio activo.
pub fn init_metrics(listen: Option<SocketAddr>) -> Result<(), BuildError> {
    let builder = PrometheusBuilder::new().set_buckets(BUCKETS)?;

    match listen {
        Some(addr) => {
            builder.with_http_listener(addr).install()?;
            info!(%addr, "Prometheus exporter listening");
        },
        None => {
            builder.install_recorder()?;
            info!("Metrics recorder installed without exporter");
        },
    }

    register_cache_metrics();
    register_reconcile_metrics();
    Ok(())
}
