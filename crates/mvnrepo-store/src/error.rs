//! # Store Error Types
//!
//! Structured errors for content store, integrity tag and retention
//! operations. I/O variants keep the path they failed on and the
//! underlying `std::io::Error`, whose text is what operators see.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from filesystem-backed store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No regular file at the location.
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    /// Creating the Folder (or one of its ancestors) failed.
    #[error("create directory {}: {source}", path.display())]
    CreateDir {
        /// Directory being created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Creating the staging file for a write failed.
    #[error("create file {}: {source}", path.display())]
    CreateFile {
        /// File being created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Copying the request body into the staging file failed.
    #[error("copy into {}: {source}", path.display())]
    Copy {
        /// Destination of the copy.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Renaming the staging file over the target failed.
    #[error("commit {}: {source}", path.display())]
    Commit {
        /// Final artifact path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure (stat, open, read, remove).
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path the operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }

    /// Whether this error means the artifact is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn not_found_kind_maps_to_not_found() {
        let err = StoreError::io("/a/b.jar", Error::new(ErrorKind::NotFound, "gone"));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "/a/b.jar does not exist");
    }

    #[test]
    fn other_kinds_keep_system_text() {
        let err = StoreError::io("/a", Error::new(ErrorKind::PermissionDenied, "denied"));
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn create_dir_names_path_and_cause() {
        let err = StoreError::CreateDir {
            path: PathBuf::from("/ro/com/x"),
            source: Error::new(ErrorKind::PermissionDenied, "read-only file system"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("create directory /ro/com/x"));
        assert!(msg.contains("read-only file system"));
    }
}
