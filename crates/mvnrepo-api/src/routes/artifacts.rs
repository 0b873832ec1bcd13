//! # Artifact Routes
//!
//! | Method | Path | Effect |
//! |--------|------|--------|
//! | GET | `/repositories/{repository_id}/{*artifact_path}` | stream artifact |
//! | HEAD | same | headers only |
//! | PUT | same | store request body |
//!
//! The same three methods are served on `/{*artifact_path}` against the
//! configured default repository.
//!
//! Reads of paths that do not resolve to a coordinate answer 404, the
//! same as a missing artifact; writes of such paths answer 400. A read
//! never touches the filesystem beyond lookups.

use std::sync::Arc;
use std::time::SystemTime;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, IF_NONE_MATCH, LAST_MODIFIED};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mvnrepo_core::{ArtifactCoordinate, RepositoryName};
use mvnrepo_store::{ArtifactMetadata, IntegrityTag, StoreError};
use serde::Serialize;

use crate::error::AppError;
use crate::extractors::ArtifactPath;
use crate::state::{AppState, ResolveError, ResolvedArtifact};

const OCTET_STREAM: &str = "application/octet-stream";

/// Build the artifact router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/repositories/{repository_id}/{*artifact_path}",
            get(get_artifact).head(head_artifact).put(put_artifact),
        )
        .route(
            "/{*artifact_path}",
            get(get_artifact).head(head_artifact).put(put_artifact),
        )
}

/// Response body of a successful PUT.
#[derive(Debug, Serialize)]
pub struct StoredArtifact {
    /// Repository the artifact was stored in.
    pub repository: RepositoryName,
    /// Parsed coordinate of the stored file.
    pub coordinate: ArtifactCoordinate,
    /// Bytes written.
    pub bytes_written: u64,
}

async fn get_artifact(
    State(state): State<AppState>,
    path: ArtifactPath,
    request_headers: HeaderMap,
) -> Result<Response, AppError> {
    let resolved = resolve_for_read(&state, &path)?;
    let (metadata, body) = state
        .store
        .open(&resolved.location)
        .await
        .map_err(missing(&resolved))?;
    let tag = state
        .store
        .integrity_tag(&resolved.location)
        .await
        .map_err(missing(&resolved))?;

    if not_modified(&request_headers, &tag) {
        tracing::debug!(path = %resolved.request_path, "artifact not modified");
        return Ok((StatusCode::NOT_MODIFIED, validator_headers(&metadata, &tag)).into_response());
    }

    tracing::info!(
        repository = %resolved.repository,
        coordinate = %resolved.coordinate,
        bytes = metadata.size,
        "serving artifact"
    );
    Ok((artifact_headers(&metadata, &tag), Body::from_stream(body)).into_response())
}

async fn head_artifact(
    State(state): State<AppState>,
    path: ArtifactPath,
    request_headers: HeaderMap,
) -> Result<Response, AppError> {
    let resolved = resolve_for_read(&state, &path)?;
    let metadata = state
        .store
        .stat(&resolved.location)
        .await
        .map_err(missing(&resolved))?;
    let tag = state
        .store
        .integrity_tag(&resolved.location)
        .await
        .map_err(missing(&resolved))?;

    if not_modified(&request_headers, &tag) {
        return Ok((StatusCode::NOT_MODIFIED, validator_headers(&metadata, &tag)).into_response());
    }
    Ok((artifact_headers(&metadata, &tag), Body::empty()).into_response())
}

async fn put_artifact(
    State(state): State<AppState>,
    path: ArtifactPath,
    body: Body,
) -> Result<Json<StoredArtifact>, AppError> {
    let resolved = state
        .resolve(&path)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    tracing::debug!(
        folder = %resolved.location.folder().display(),
        "storing artifact"
    );
    let stream = body.into_data_stream().map_err(std::io::Error::other);
    let bytes_written = state.store.write(&resolved.location, stream).await?;
    tracing::info!(
        repository = %resolved.repository,
        coordinate = %resolved.coordinate,
        bytes = bytes_written,
        "stored artifact"
    );

    if resolved.coordinate.is_snapshot() {
        apply_retention(&state, &resolved).await;
    }

    Ok(Json(StoredArtifact {
        repository: resolved.repository,
        coordinate: resolved.coordinate,
        bytes_written,
    }))
}

/// Resolve a read request; unresolvable paths are reported as missing.
fn resolve_for_read(state: &AppState, path: &ArtifactPath) -> Result<ResolvedArtifact, AppError> {
    state.resolve(path).map_err(|e: ResolveError| {
        tracing::debug!(error = %e, "unresolvable read path");
        AppError::NotFound(does_not_exist(
            &path.describe(&state.config.default_repository),
        ))
    })
}

/// Map a store error to 404 naming the request path, or to a storage error.
fn missing(resolved: &ResolvedArtifact) -> impl FnOnce(StoreError) -> AppError + '_ {
    move |err| {
        if err.is_not_found() {
            AppError::NotFound(does_not_exist(&resolved.request_path))
        } else {
            err.into()
        }
    }
}

fn does_not_exist(request_path: &str) -> String {
    format!("{request_path} does not exist")
}

/// Run the retention policy off the async runtime. Failures are logged;
/// the artifact is already stored.
async fn apply_retention(state: &AppState, resolved: &ResolvedArtifact) {
    let policy = Arc::clone(&state.retention);
    let coordinate = resolved.coordinate.clone();
    let location = resolved.location.clone();
    let name = policy.name();

    match tokio::task::spawn_blocking(move || policy.apply(&coordinate, &location)).await {
        Ok(Ok(report)) => tracing::info!(
            policy = name,
            candidates = report.candidates.len(),
            removed = report.removed.len(),
            "snapshot retention applied"
        ),
        Ok(Err(e)) => tracing::warn!(policy = name, error = %e, "snapshot retention failed"),
        Err(e) => tracing::error!(policy = name, error = %e, "snapshot retention task failed"),
    }
}

fn artifact_headers(metadata: &ArtifactMetadata, tag: &IntegrityTag) -> HeaderMap {
    let mut headers = validator_headers(metadata, tag);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(metadata.size));
    headers
}

/// `Last-Modified` and `ETag`, also sent with 304 responses.
fn validator_headers(metadata: &ArtifactMetadata, tag: &IntegrityTag) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&http_date(metadata.modified)) {
        headers.insert(LAST_MODIFIED, value);
    }
    match HeaderValue::from_str(tag.as_str().trim()) {
        Ok(value) => {
            headers.insert(ETAG, value);
        }
        Err(_) => tracing::warn!(tag = %tag, "integrity tag is not a valid header value"),
    }
    headers
}

fn not_modified(request_headers: &HeaderMap, tag: &IntegrityTag) -> bool {
    request_headers
        .get_all(IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|candidate| tag.matches(candidate))
}

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
