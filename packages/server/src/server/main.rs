// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use api_core::domains::auth::JwtService;
use api_core::domains::sync::{MirrorSync, SyncQueue, TracingDeadLetterSink};
use api_core::kernel::stores::{MemoryStore, PostgresStore, Store};
use api_core::kernel::ServerDeps;
use api_core::server::{build_app, AppOptions};
use api_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting swipr.ai API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(environment = %config.environment, "Configuration loaded");

    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            let store = PostgresStore::from_pool(pool);
            tracing::info!("Running database migrations...");
            store.run_migrations().await?;
            tracing::info!("Database ready");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    let sheets_client = config.sheets_client()?;
    let mirror = Arc::new(MirrorSync::new(
        store.clone(),
        sheets_client,
        config.mirror_config(),
        config.spreadsheet_id.clone(),
    ));

    let (sync_queue, sync_worker) = if config.sheets_sync_enabled {
        if config.sheets_credentials.is_none() {
            tracing::warn!("Sheets sync enabled without credentials, every sync will fail");
        }
        let (queue, handle) = SyncQueue::open(
            mirror.clone(),
            Arc::new(TracingDeadLetterSink),
            config.sync_queue_config(),
        );
        (queue, Some(handle))
    } else {
        tracing::info!("Sheets sync disabled");
        (SyncQueue::disabled(), None)
    };

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));
    let server_deps = ServerDeps::new(
        store,
        sync_queue,
        mirror,
        jwt_service,
        config.admin_password.clone(),
    );

    let app = build_app(
        server_deps,
        AppOptions {
            rate_limit_enabled: config.rate_limit_enabled,
        },
    );

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/api/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    if let Some(worker) = sync_worker {
        tracing::info!("Stopping sheets sync worker");
        worker.close().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
