#![deny(missing_docs)]

//! # mvnrepo-core — Coordinate Resolution and Storage Addressing
//!
//! Foundational types every other crate in the workspace depends on. No
//! internal crate dependencies, no I/O.
//!
//! ## Two Directions
//!
//! 1. **Parse**: a repository-relative URL path becomes an
//!    [`ArtifactCoordinate`] via [`ArtifactCoordinate::parse`].
//! 2. **Resolve**: a coordinate becomes a canonical relative path
//!    ([`ArtifactCoordinate::relative_path`]) and, with a root and a
//!    [`RepositoryName`], an absolute [`StorageLocation`].
//!
//! The two directions agree: for every path that parses, resolving the
//! coordinate reproduces the path's group, artifact, version and file
//! name, which is what makes a PUT and a later GET of the same URL hit
//! the same file.
//!
//! ## Crate Policy
//!
//! - Pure functions over strings and paths. No filesystem access.
//! - Every fallible constructor returns a typed error; nothing panics on
//!   client-supplied input.
//! - A coordinate that parses always maps to a location inside its
//!   repository directory.

pub mod coordinate;
pub mod error;
pub mod location;
pub mod repository;

pub use coordinate::{ArtifactCoordinate, JARS_MARKER};
pub use error::{CoordinateError, ValidationError};
pub use location::{sidecar_for, StorageLocation, SIDECAR_SUFFIX};
pub use repository::RepositoryName;
