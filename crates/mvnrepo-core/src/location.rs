//! # Storage Locations
//!
//! The inverse of coordinate parsing: an [`ArtifactCoordinate`] maps back
//! to a canonical relative path, and together with a repository root and
//! [`RepositoryName`] to an absolute [`StorageLocation`]:
//!
//! ```text
//! {root}/{repository}/{group with . as separator}/{artifact}/{version}/{file name}
//! ```
//!
//! Everything here is structural. No function in this module touches the
//! filesystem.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::coordinate::ArtifactCoordinate;
use crate::repository::RepositoryName;

/// Suffix of the precomputed digest file stored next to an artifact.
pub const SIDECAR_SUFFIX: &str = ".sha1";

impl ArtifactCoordinate {
    /// Canonical relative storage path, using the platform separator.
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.group_segments().collect();
        path.push(&self.artifact);
        path.push(&self.version);
        path.push(&self.file_name);
        path
    }

    /// Canonical relative path with `/` separators, as it appears in URLs.
    pub fn url_path(&self) -> String {
        self.group_segments()
            .chain([
                self.artifact.as_str(),
                self.version.as_str(),
                self.file_name.as_str(),
            ])
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Where one artifact lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    repository: RepositoryName,
    relative: PathBuf,
    path: PathBuf,
}

impl StorageLocation {
    /// Compose `root / repository / coordinate.relative_path()`.
    pub fn new(root: &Path, repository: &RepositoryName, coordinate: &ArtifactCoordinate) -> Self {
        let relative = coordinate.relative_path();
        let path = root.join(repository.as_str()).join(&relative);
        Self {
            repository: repository.clone(),
            relative,
            path,
        }
    }

    /// The repository this location belongs to.
    pub fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Path relative to the repository directory.
    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// Full path of the artifact file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The Folder: the directory that must exist before a write.
    pub fn folder(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    /// The artifact's file name.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// Path of the `.sha1` sidecar next to the artifact.
    pub fn sidecar_path(&self) -> PathBuf {
        sidecar_for(&self.path)
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Append [`SIDECAR_SUFFIX`] to a file path.
pub fn sidecar_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}
