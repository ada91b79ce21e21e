//! HTTP server initialization and runtime setup.
//!
//! Handles the analytics database, registry cache store, registry client,
//! analytics worker and the Axum server lifecycle.

use crate::application::services::{AnalyticsRecorder, RedirectCache, StatsService};
use crate::config::Config;
use crate::domain::analytics_worker::run_analytics_worker;
use crate::domain::repositories::{AnalyticsRepository, KvStore};
use crate::infrastructure::assets::DirAssetStore;
use crate::infrastructure::cache::{MemoryKvStore, RedisKvStore};
use crate::infrastructure::persistence::PgAnalyticsRepository;
use crate::infrastructure::registry::HttpRegistrySource;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long shutdown waits for queued analytics events to be written.
const ANALYTICS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations (analytics sink)
/// - Redis registry cache (or in-process fallback)
/// - Registry HTTP client
/// - Background analytics worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The registry client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let store: Arc<dyn KvStore> = if let Some(redis_url) = &config.redis_url {
        match RedisKvStore::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Registry cache: Redis");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-process cache.", e);
                Arc::new(MemoryKvStore::new())
            }
        }
    } else {
        tracing::info!("Registry cache: in-process");
        Arc::new(MemoryKvStore::new())
    };

    if !store.health_check().await {
        tracing::warn!(
            "Registry cache store is not reachable; requests will fall back to the registry"
        );
    }

    let settings = config.redirect.clone();
    let registry = HttpRegistrySource::new(
        settings.registry_url.clone(),
        settings.registry_timeout,
        &settings.user_agent,
    )
    .context("Failed to build registry client")?;
    tracing::info!("Registry client ready: {}", registry.url());

    let analytics: Arc<dyn AnalyticsRepository> =
        Arc::new(PgAnalyticsRepository::new(Arc::new(pool)));

    let (event_tx, event_rx) = mpsc::channel(config.analytics_queue_capacity);
    let worker = tokio::spawn(run_analytics_worker(
        event_rx,
        analytics.clone(),
        config.analytics_worker_concurrency,
    ));
    tracing::info!("Analytics worker started");

    let state = AppState::new(
        RedirectCache::new(store, Arc::new(registry), settings),
        StatsService::new(analytics),
        AnalyticsRecorder::new(event_tx),
        Arc::new(DirAssetStore::new(&config.assets_dir)),
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the last event sender) is gone; the worker
    // exits once the queue is drained.
    match tokio::time::timeout(ANALYTICS_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => tracing::info!("Analytics worker drained"),
        Ok(Err(e)) => tracing::error!("Analytics worker failed: {}", e),
        Err(_) => tracing::warn!("Timed out waiting for analytics worker"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
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
