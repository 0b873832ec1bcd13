//! # Custom Extractors
//!
//! [`ArtifactPath`] pulls the optional repository segment and the
//! catch-all artifact path out of the matched route. Both route shapes
//! (`/repositories/{repository_id}/{*artifact_path}` and
//! `/{*artifact_path}`) feed the same handlers through it.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use mvnrepo_core::RepositoryName;

use crate::error::AppError;

/// Route parameter naming the repository.
pub const REPOSITORY_PARAM: &str = "repository_id";
/// Catch-all route parameter holding the artifact path.
pub const ARTIFACT_PARAM: &str = "artifact_path";

/// Repository and artifact path of a request, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPath {
    /// Repository segment, absent on the default-repository route.
    pub repository: Option<String>,
    /// Path below the repository, without a leading `/`.
    pub artifact_path: String,
}

impl ArtifactPath {
    /// `{repository}/{artifact path}`, naming the default repository when
    /// the request did not.
    pub fn describe(&self, default: &RepositoryName) -> String {
        let repository = self.repository.as_deref().unwrap_or(default.as_str());
        format!("{repository}/{}", self.artifact_path)
    }
}

impl<S> FromRequestParts<S> for ArtifactPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(mut params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self {
            repository: params.remove(REPOSITORY_PARAM),
            artifact_path: params.remove(ARTIFACT_PARAM).unwrap_or_default(),
        })
    }
}
