//! # Reel Rentals API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load ApiConfig ──► init tracing ──► open SQLite + migrate             │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  bind listener ──► axum::serve ──► Ctrl+C / SIGTERM ──► close pool     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use reel_api::{build_router, ApiConfig, AppState};
use reel_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::load().context("loading configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting Reel Rentals API server...");
    info!(
        addr = %config.bind_address(),
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    let db_config = DbConfig::new(config.database_path.clone()).max_connections(config.db_max_connections);
    let db = Database::new(db_config)
        .await
        .context("opening database")?;
    info!("Database ready");

    let app = build_router(AppState::new(db.clone()));

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("binding {}", config.bind_address()))?;
    info!(addr = %config.bind_address(), "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
