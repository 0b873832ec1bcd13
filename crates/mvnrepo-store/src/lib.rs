#![deny(missing_docs)]

//! # mvnrepo-store — Content Store, Integrity Tags, Retention
//!
//! Everything that touches the filesystem lives here:
//!
//! - [`ContentStore`]: exists/stat/read/write scoped under one repository
//!   root. Reads are streamed; writes are staged and renamed into place.
//! - [`IntegrityTag`]: `.sha1` sidecar content when present, otherwise the
//!   SHA-1 of the artifact computed on demand.
//! - [`RetentionPolicy`]: hook run after snapshot writes.
//!
//! Locations come from `mvnrepo-core`; this crate never parses paths.
//!
//! ## Crate Policy
//!
//! - Depends only on `mvnrepo-core` among workspace crates.
//! - Async I/O through `tokio::fs`, except retention policies, which are
//!   synchronous and meant for the blocking pool.
//! - A failed write never leaves a partial file at a storage location.

pub mod error;
pub mod integrity;
pub mod retention;
pub mod store;

pub use error::StoreError;
pub use integrity::{integrity_tag_at, sha1_file, IntegrityTag, TagSource};
pub use retention::{policy_for, EnumerateOnly, KeepLatest, RetentionPolicy, RetentionReport};
pub use store::{ArtifactMetadata, ByteStream, ContentStore};
