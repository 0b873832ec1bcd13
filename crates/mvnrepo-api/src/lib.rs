//! # mvnrepo-api — HTTP Service for the Artifact Repository
//!
//! Serves Maven-style artifact paths over HTTP, backed by the filesystem
//! content store in `mvnrepo-store`.
//!
//! ## API Surface
//!
//! | Path                                   | Module                 | Purpose                  |
//! |----------------------------------------|------------------------|--------------------------|
//! | `/`                                    | [`routes::index`]      | Banner page              |
//! | `/repositories/{repository_id}/{*path}`| [`routes::artifacts`]  | GET/HEAD/PUT artifacts   |
//! | `/{*path}`                             | [`routes::artifacts`]  | Same, default repository |
//! | `/health/*`                            | this module            | Liveness and readiness   |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! ServerHeader → TraceLayer → DefaultBodyLimit(disabled) → Handler
//! ```
//!
//! Uploads are streamed to disk, so no request body limit applies.

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;

pub use config::{AppConfig, ConfigError};
pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new()
        .merge(health)
        .merge(routes::index::router())
        .merge(routes::artifacts::router())
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::tracing_layer::layer())
        .layer(from_fn(middleware::server_header::server_header_middleware))
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 when the repository root is a directory.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    let root = state.store.root();
    match tokio::fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => (StatusCode::OK, "ready"),
        Ok(_) => {
            tracing::warn!(root = %root.display(), "repository root is not a directory");
            (StatusCode::SERVICE_UNAVAILABLE, "repository root unavailable")
        }
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "repository root unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "repository root unavailable")
        }
    }
}
