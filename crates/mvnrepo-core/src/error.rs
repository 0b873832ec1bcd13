//! # Error Hierarchy
//!
//! Structured errors for coordinate resolution, built with `thiserror`.
//! Parsing never panics on malformed input: every failure is one of the
//! variants below and carries the input that caused it.

use thiserror::Error;

/// Errors raised while turning a repository-relative path into an
/// [`ArtifactCoordinate`](crate::ArtifactCoordinate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// Too few segments to derive group, artifact and version.
    #[error("underspecified artifact path \"{path}\": {segments} segment(s), need at least 3")]
    Underspecified {
        /// The path as received.
        path: String,
        /// Number of `/`-separated segments found.
        segments: usize,
    },

    /// A segment that would become part of the storage path is unusable.
    #[error("invalid segment \"{segment}\" in artifact path \"{path}\"")]
    InvalidSegment {
        /// The path as received.
        path: String,
        /// The offending segment.
        segment: String,
    },
}

/// Validation errors for domain newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Repository names must be a single, non-traversing path segment.
    #[error("invalid repository name: \"{0}\" (expected a single path segment)")]
    InvalidRepositoryName(String),
}
