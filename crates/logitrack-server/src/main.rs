//! LogiTrack server binary.

use std::sync::Arc;

use anyhow::Context;
use logitrack_server::metrics::init_metrics;
use logitrack_server::{AppState, Settings};
use logitrack_store::MemoryStore;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load().context("failed to load settings")?;

    tracing::info!(
        "Starting LogiTrack server v{}",
        env!("CARGO_PKG_VERSION")
    );

    init_metrics(settings.metrics.listen).context("failed to initialize metrics")?;

    let store = Arc::new(MemoryStore::new());
    let state = AppState::from_settings(store, &settings.cache).await;
    tracing::info!(backend = state.cache().backend_name(), "Cache layer ready");

    let reconciler = if settings.reconcile.enabled {
        Some(
            state
                .reconcile_scheduler(settings.reconcile.config())
                .start(),
        )
    } else {
        tracing::info!("Reconciliation disabled");
        None
    };

    shutdown_signal().await;

    if let Some(handle) = reconciler {
        handle.shutdown().await;
    }

    tracing::info!(
        hit_rate = state.cache().metrics().hit_rate(),
        "LogiTrack server stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
