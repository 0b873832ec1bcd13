//! # Integrity Tags
//!
//! Cache validators for stored artifacts, exposed over HTTP as `ETag`.
//!
//! Published repositories ship a `.sha1` sidecar next to every binary.
//! When that sidecar exists its content is the tag, taken verbatim.
//! Otherwise the SHA-1 of the artifact is computed on demand by
//! streaming the file through the hasher.
//!
//! SHA-1 is kept for compatibility with existing sidecars and the
//! clients that compare against them.

use std::fmt;
use std::path::Path;

use mvnrepo_core::{sidecar_for, StorageLocation};
use sha1::{Digest, Sha1};
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::error::StoreError;
use crate::store::{is_file, ContentStore, READ_CHUNK};

/// Where a tag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource {
    /// Read from the `.sha1` sidecar.
    Sidecar,
    /// Computed from the artifact bytes.
    Computed,
}

/// A cache-validation string for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityTag {
    value: String,
    source: TagSource,
}

impl IntegrityTag {
    /// The tag exactly as read or computed.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Where the tag came from.
    pub fn source(&self) -> TagSource {
        self.source
    }

    /// Whether a client-supplied entity tag refers to this one.
    ///
    /// Surrounding quotes and a weak `W/` prefix are ignored; `*`
    /// matches any tag.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        if candidate == "*" {
            return true;
        }
        let candidate = candidate.strip_prefix("W/").unwrap_or(candidate);
        let candidate = candidate.trim_matches('"');
        candidate == self.value.trim()
    }
}

impl fmt::Display for IntegrityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl ContentStore {
    /// Integrity tag for an artifact that is expected to exist.
    ///
    /// Fails with [`StoreError::NotFound`] if neither the sidecar nor the
    /// artifact is present.
    pub async fn integrity_tag(
        &self,
        location: &StorageLocation,
    ) -> Result<IntegrityTag, StoreError> {
        integrity_tag_at(location.path()).await
    }
}

/// Integrity tag for the file at `path`, sidecar first.
pub async fn integrity_tag_at(path: &Path) -> Result<IntegrityTag, StoreError> {
    let sidecar = sidecar_for(path);
    if is_file(&sidecar).await {
        let raw = fs::read(&sidecar)
            .await
            .map_err(|e| StoreError::io(&sidecar, e))?;
        let value = String::from_utf8_lossy(&raw).into_owned();
        tracing::debug!(path = %path.display(), tag = %value, "integrity tag from sidecar");
        return Ok(IntegrityTag {
            value,
            source: TagSource::Sidecar,
        });
    }

    if !is_file(path).await {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let value = sha1_file(path).await?;
    tracing::debug!(path = %path.display(), tag = %value, "integrity tag computed");
    Ok(IntegrityTag {
        value,
        source: TagSource::Computed,
    })
}

/// Lowercase hex SHA-1 of a file's content, read in chunks.
pub async fn sha1_file(path: &Path) -> Result<String, StoreError> {
    let mut file = fs::File::open(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(to_hex(&hasher.finalize()))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
