//! Mawid - event listing backend
//!
//! Binary entry point: wires the repository, cache coordinator, service and
//! router together and serves until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mawid::api::create_router;
use mawid::{AppState, CacheCoordinator, Config, EventService, MemoryEventRepository};

/// Main entry point for the Mawid server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the repository and the cache coordinator
/// 4. Start the cache sweeper and the recent events refresh (warms the cache)
/// 5. Create Axum router with all endpoints
/// 6. Serve until shutdown, then stop the cache background tasks
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mawid=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mawid server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, refresh_interval={}s, sweep_interval={}s, entity_ttl={}s, recent_ttl={}s, force_refresh={}",
        config.server_port,
        config.refresh_interval,
        config.sweep_interval,
        config.entity_ttl,
        config.recent_ttl,
        config.force_cache_refresh
    );

    let repo = Arc::new(MemoryEventRepository::new());
    let cache = CacheCoordinator::new(repo.clone(), config.cache_settings());
    cache.start();

    let state = AppState::new(EventService::new(repo, cache.clone()));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    cache.shutdown();
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
