use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fathom_api::auth::bootstrap::ensure_admin;
use fathom_api::background::maintenance_sweeper;
use fathom_api::config::ServerConfig;
use fathom_api::generation::runner_from_config;
use fathom_api::router::build_app_router;
use fathom_api::state::AppState;
use fathom_api::{telemetry, ws};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    telemetry::init_tracing("fathom_api=debug,tower_http=debug");

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        environment = ?config.environment,
        "Loaded server configuration"
    );

    // --- Database ---
    let pool = fathom_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    fathom_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    fathom_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Media directory ---
    tokio::fs::create_dir_all(&config.media_dir)
        .await
        .expect("Failed to create media directory");

    // --- Admin bootstrap ---
    if let Some(admin) = &config.admin_bootstrap {
        match ensure_admin(&pool, admin).await {
            Ok(true) => tracing::info!(email = %admin.email, "Bootstrap admin created"),
            Ok(false) => tracing::debug!(email = %admin.email, "Bootstrap admin already exists"),
            Err(e) => tracing::error!(error = %e, "Failed to bootstrap admin account"),
        }
    }

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Generation runner ---
    let generation = runner_from_config(
        pool.clone(),
        Arc::clone(&ws_manager),
        &config.generation,
        config.media_dir.clone(),
    )
    .expect("Failed to build generation client")
    .map(Arc::new);
    match &generation {
        Some(_) => tracing::info!("Lesson media generation enabled"),
        None => tracing::warn!("GENERATION_SERVICE_URL not set, lesson media generation disabled"),
    }

    // --- Maintenance sweeper ---
    let sweeper_cancel = CancellationToken::new();
    let sweeper_handle = tokio::spawn(maintenance_sweeper::run(
        pool.clone(),
        sweeper_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        generation,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweeper_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;
    tracing::info!("Maintenance sweeper stopped");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;
    heartbeat_handle.abort();

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
