//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Holds the resolved configuration, the
//! content store rooted at the repository root, and the snapshot
//! retention policy.
//!
//! The server is stateless beyond the filesystem: nothing here is
//! mutated after startup.

use std::sync::Arc;

use mvnrepo_core::{
    ArtifactCoordinate, CoordinateError, RepositoryName, StorageLocation, ValidationError,
};
use mvnrepo_store::{policy_for, ContentStore, RetentionPolicy};
use thiserror::Error;

use crate::config::AppConfig;
use crate::extractors::ArtifactPath;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Resolved configuration.
    pub config: Arc<AppConfig>,
    /// Filesystem store rooted at `config.repository_root`.
    pub store: ContentStore,
    /// Hook run after every snapshot write.
    pub retention: Arc<dyn RetentionPolicy>,
}

impl AppState {
    /// Build state with the retention policy the config selects.
    pub fn new(config: AppConfig) -> Self {
        let retention = policy_for(config.snapshot_retention);
        Self::with_retention(config, retention)
    }

    /// Build state with an explicit retention policy.
    pub fn with_retention(config: AppConfig, retention: Arc<dyn RetentionPolicy>) -> Self {
        Self {
            store: ContentStore::new(config.repository_root.clone()),
            config: Arc::new(config),
            retention,
        }
    }

    /// Resolve a request path to a repository, coordinate and location.
    ///
    /// Requests without a repository segment fall back to the configured
    /// default repository.
    pub fn resolve(&self, path: &ArtifactPath) -> Result<ResolvedArtifact, ResolveError> {
        let repository = match &path.repository {
            Some(name) => RepositoryName::new(name.as_str())?,
            None => self.config.default_repository.clone(),
        };
        let coordinate = ArtifactCoordinate::parse(&path.artifact_path)?;
        let location = self.store.locate(&repository, &coordinate);
        Ok(ResolvedArtifact {
            request_path: path.describe(&self.config.default_repository),
            repository,
            coordinate,
            location,
        })
    }
}

/// A request path mapped onto the store.
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    /// Target repository.
    pub repository: RepositoryName,
    /// `{repository}/{artifact path}` as requested, for messages.
    pub request_path: String,
    /// Parsed coordinate.
    pub coordinate: ArtifactCoordinate,
    /// Where the artifact lives.
    pub location: StorageLocation,
}

/// Why a request path does not name an artifact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The repository segment is unusable.
    #[error(transparent)]
    Repository(#[from] ValidationError),
    /// The artifact path is underspecified or unsafe.
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}
