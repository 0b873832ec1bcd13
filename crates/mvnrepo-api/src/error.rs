//! # API Error Types
//!
//! Maps resolution and storage failures to HTTP responses. Bodies are
//! plain text: artifact clients (Maven, Gradle, curl) print them as-is.
//!
//! Storage failures during PUT return the underlying system error text
//! so the publishing client can see why the upload was refused.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mvnrepo_store::StoreError;
use thiserror::Error;

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Artifact absent or path unresolvable on read (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Unresolvable path on write (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Filesystem failure while storing or reading an artifact (500).
    /// The message is returned to the client.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        match &self {
            Self::Storage(_) => {
                tracing::error!(code, error = %self, "request failed");
            }
            Self::NotFound(_) | Self::BadRequest(_) => {
                tracing::debug!(code, error = %self, "request rejected");
            }
        }

        let message = match self {
            Self::NotFound(m) | Self::BadRequest(m) | Self::Storage(m) => m,
        };

        (status, message).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            Self::Storage(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::path::PathBuf;

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("missing artifact".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn bad_request_status_code() {
        let err = AppError::BadRequest("underspecified".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "BAD_REQUEST");
    }

    #[test]
    fn storage_status_code() {
        let err = AppError::Storage("disk full".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "STORAGE_ERROR");
    }

    #[test]
    fn store_not_found_maps_to_404() {
        let err: AppError = StoreError::NotFound(PathBuf::from("/r/x.jar")).into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn store_io_failure_maps_to_storage() {
        let err: AppError = StoreError::CreateDir {
            path: PathBuf::from("/r/com"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        assert!(matches!(err, AppError::Storage(ref m) if m.contains("denied")));
    }

    #[tokio::test]
    async fn storage_body_carries_system_text() {
        let response = AppError::Storage("create file /r/x.jar: disk full".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"create file /r/x.jar: disk full");
    }

    #[tokio::test]
    async fn not_found_body_names_the_path() {
        let response = AppError::NotFound("com/x/lib/1.0/lib-1.0.jar does not exist".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"com/x/lib/1.0/lib-1.0.jar does not exist");
    }
}
