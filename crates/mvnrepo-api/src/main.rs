//! # mvnrepo-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the artifact repository.
//! Binds to the configured port (default 8080).
//!
//! Set `LOG_FORMAT=json` for JSON log lines; `RUST_LOG` controls the filter.

use mvnrepo_api::{AppConfig, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::load().map_err(|e| {
        tracing::error!("Configuration failed: {e}");
        e
    })?;

    // The root must exist before readiness reports ready.
    tokio::fs::create_dir_all(&config.repository_root)
        .await
        .map_err(|e| {
            tracing::error!(
                "Cannot create repository root {}: {e}",
                config.repository_root.display()
            );
            e
        })?;
    tracing::info!(
        root = %config.repository_root.display(),
        default_repository = %config.default_repository,
        snapshot_retention = ?config.snapshot_retention,
        "repository configured"
    );

    let port = config.port;
    let app = mvnrepo_api::app(AppState::new(config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("mvnrepo listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("mvnrepo stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
