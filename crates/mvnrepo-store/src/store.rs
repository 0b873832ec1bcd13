//! # Filesystem Content Store
//!
//! Artifacts live at the [`StorageLocation`] derived from their
//! coordinate, under a single repository root shared by every repository.
//!
//! ## Write Protocol
//!
//! A write streams the body into a hidden staging file in the target
//! Folder (`.{uuid}.part`), syncs it, then renames it over
//! the target. Readers see either the previous artifact or the new one,
//! never a prefix of it. If the copy fails, or the future is dropped
//! mid-copy, the staging file is removed and the previous artifact is
//! left as it was.
//!
//! Concurrent writes to one location are not serialized: whichever
//! rename lands last wins.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use mvnrepo_core::{ArtifactCoordinate, RepositoryName, StorageLocation};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::StoreError;

/// Chunk size for streamed reads.
pub(crate) const READ_CHUNK: usize = 64 * 1024;

const STAGING_SUFFIX: &str = ".part";

/// A streamed artifact body.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Size and modification time of a stored artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactMetadata {
    /// Length in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

/// Filesystem-backed store rooted at the repository root.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage location of `coordinate` within `repository`.
    pub fn locate(
        &self,
        repository: &RepositoryName,
        coordinate: &ArtifactCoordinate,
    ) -> StorageLocation {
        StorageLocation::new(&self.root, repository, coordinate)
    }

    /// Whether a regular file exists at the location.
    ///
    /// Missing ancestor directories count as absence, not as an error.
    pub async fn exists(&self, location: &StorageLocation) -> bool {
        is_file(location.path()).await
    }

    /// Size and modification time of the artifact.
    pub async fn stat(&self, location: &StorageLocation) -> Result<ArtifactMetadata, StoreError> {
        let path = location.path();
        let meta = fs::metadata(path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        if !meta.is_file() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let modified = meta.modified().map_err(|e| StoreError::io(path, e))?;
        Ok(ArtifactMetadata {
            size: meta.len(),
            modified,
        })
    }

    /// Open the artifact as a chunked byte stream.
    pub async fn read(&self, location: &StorageLocation) -> Result<ByteStream, StoreError> {
        let path = location.path();
        if !is_file(path).await {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let file = fs::File::open(path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        Ok(file_stream(file))
    }

    /// Open the artifact and stat the opened handle.
    ///
    /// The metadata describes exactly the bytes the stream yields, even if
    /// a concurrent write renames a new version over the path meanwhile.
    pub async fn open(
        &self,
        location: &StorageLocation,
    ) -> Result<(ArtifactMetadata, ByteStream), StoreError> {
        let path = location.path();
        let file = fs::File::open(path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        let meta = file.metadata().await.map_err(|e| StoreError::io(path, e))?;
        if !meta.is_file() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let modified = meta.modified().map_err(|e| StoreError::io(path, e))?;
        let metadata = ArtifactMetadata {
            size: meta.len(),
            modified,
        };
        Ok((metadata, file_stream(file)))
    }

    /// Stream `body` into the location, creating the Folder first.
    ///
    /// Returns the number of bytes written.
    pub async fn write<S>(&self, location: &StorageLocation, body: S) -> Result<u64, StoreError>
    where
        S: Stream<Item = std::io::Result<Bytes>>,
    {
        let folder = location.folder();
        fs::create_dir_all(folder)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: folder.to_path_buf(),
                source,
            })?;

        let mut staging = StagingFile::new(location);
        let mut file = fs::File::create(staging.path())
            .await
            .map_err(|source| StoreError::CreateFile {
                path: location.path().to_path_buf(),
                source,
            })?;

        let copy_err = |source| StoreError::Copy {
            path: location.path().to_path_buf(),
            source,
        };

        let mut body = std::pin::pin!(body);
        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(copy_err)?;
            file.write_all(&chunk).await.map_err(copy_err)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(copy_err)?;
        file.sync_all().await.map_err(copy_err)?;
        drop(file);

        fs::rename(staging.path(), location.path())
            .await
            .map_err(|source| StoreError::Commit {
                path: location.path().to_path_buf(),
                source,
            })?;
        staging.committed();

        tracing::debug!(path = %location, bytes = written, "committed artifact");
        Ok(written)
    }
}

pub(crate) async fn is_file(path: &Path) -> bool {
    matches!(fs::metadata(path).await, Ok(meta) if meta.is_file())
}

fn file_stream(file: fs::File) -> ByteStream {
    stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0u8; READ_CHUNK];
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok::<_, std::io::Error>(None);
        }
        buf.truncate(n);
        Ok(Some((Bytes::from(buf), file)))
    })
    .boxed()
}

/// Staging file that removes itself unless committed.
struct StagingFile {
    path: PathBuf,
    committed: bool,
}

impl StagingFile {
    fn new(location: &StorageLocation) -> Self {
        // Fixed length, so any name the filesystem accepts can be staged.
        let name = format!(".{}{STAGING_SUFFIX}", uuid::Uuid::new_v4().simple());
        Self {
            path: location.folder().join(name),
            committed: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn committed(&mut self) {
        self.committed = true;
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to remove staging file");
                }
            }
        }
    }
}
