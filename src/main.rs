//! Order Cache - a small order service over a Redis distributed cache

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_cache::api::{create_router, AppState};
use order_cache::cache::{DistributedStore, MemoryStore, RedisStore};
use order_cache::config::{Config, StoreBackend};
use order_cache::spawn_cleanup_task;

/// Main entry point for the order cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the configured store (Redis, or in-memory with a cleanup task)
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting order cache service");

    let config = Config::from_env()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;
    info!(
        "Configuration loaded: environment={:?}, backend={:?}, port={}",
        config.environment, config.backend, config.server_port
    );

    let shutdown = CancellationToken::new();
    let mut cleanup_handle = None;

    let store: Arc<dyn DistributedStore> = match config.backend {
        StoreBackend::Redis => {
            let store = RedisStore::connect(&config.redis_url(), config.redis_instance.clone())
                .await
                .with_context(|| format!("Failed to connect to Redis at {}", config.redis_endpoint))?;
            info!(
                "Connected to Redis at {} (instance prefix '{}')",
                config.redis_endpoint, config.redis_instance
            );
            Arc::new(store)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory cache store; entries are not shared between instances");
            let store = Arc::new(MemoryStore::new());
            cleanup_handle = Some(spawn_cleanup_task(
                store.clone(),
                config.cleanup_interval,
                shutdown.clone(),
            ));
            store
        }
    };

    let app = create_router(AppState::with_shutdown(store, shutdown.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    if let Some(handle) = cleanup_handle {
        if let Err(e) = handle.await {
            warn!("Cleanup task ended abnormally: {}", e);
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then cancels in-flight
/// cache calls and background tasks.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    shutdown.cancel();
    warn!("Cancelled in-flight cache operations");
}
