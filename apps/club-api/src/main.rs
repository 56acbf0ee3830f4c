//! # Cue Club API server
//!
//! ```bash
//! CLUB_JWT_SECRET='long-random-secret' cargo run -p club-api
//! ```

use anyhow::Context;
use club_api::{create_router, AppConfig, AppState};
use cue_db::Database;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cue=debug,sqlx=warn")),
        )
        .with_target(true)
        .init();

    info!("Starting Cue Club API server...");

    let config = AppConfig::load().context("loading configuration")?;
    if config.auth.uses_dev_secret() {
        warn!("CLUB_JWT_SECRET not set, using the development secret");
    }
    info!(
        address = %config.bind_address(),
        database = %config.database.database_path.display(),
        rate_classes = config.rates.classes().len(),
        "Configuration loaded"
    );

    let db = Database::new(config.database.clone())
        .await
        .context("opening database")?;
    info!("Database ready");

    let state = AppState::from_config(db.clone(), &config);
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("binding {}", config.bind_address()))?;
    info!(address = %config.bind_address(), "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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
