//! # mvnrepo-cli — Offline Tools for the Artifact Repository
//!
//! Provides the `mvnrepo` command-line interface. Commands work directly
//! on a repository root, without a running server.
//!
//! ## Subcommands
//!
//! - `mvnrepo resolve`: Parse an artifact path and show where it is stored.
//! - `mvnrepo tag`: Print the integrity tag the server would send as `ETag`.
//!
//! ```bash
//! mvnrepo resolve com/x/lib/1.0/lib-1.0-sources.jar --repository releases
//! mvnrepo tag repository/releases/com/x/lib/1.0/lib-1.0.jar
//! ```

pub mod resolve;
pub mod tag;

use std::future::Future;

use anyhow::{Context, Result};

/// Run `future` to completion on a single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}
