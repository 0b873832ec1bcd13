//! # Snapshot Retention
//!
//! Runs after every successful write of a snapshot version. Candidates
//! are the regular files directly inside the written artifact's Folder
//! that are builds of the same artifact, classifier and packaging as the
//! written file: `lib-1.0-SNAPSHOT-sources.jar` and
//! `lib-1.0-20240101.120000-3-sources.jar` are candidates for each other,
//! `lib-1.0-SNAPSHOT.jar` is not. Hidden files, which include in-progress
//! staging files, are never candidates.
//!
//! A `.sha1` sidecar write has no candidates. Sidecars are only removed
//! together with the artifact they describe.
//!
//! Two policies:
//!
//! - [`EnumerateOnly`] lists candidates and removes nothing. This is the
//!   default.
//! - [`KeepLatest`] keeps the file just written plus the most recently
//!   modified candidates up to a fixed count, and removes the others
//!   together with their `.sha1` sidecars.
//!
//! Policies use blocking `std::fs` calls; async callers run them on the
//! blocking pool.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use mvnrepo_core::{sidecar_for, ArtifactCoordinate, StorageLocation, SIDECAR_SUFFIX};

use crate::error::StoreError;

/// Outcome of one policy run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionReport {
    /// Files the policy considered, newest first.
    pub candidates: Vec<PathBuf>,
    /// Files the policy deleted.
    pub removed: Vec<PathBuf>,
}

/// Hook invoked once per successful snapshot write.
pub trait RetentionPolicy: Send + Sync + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Apply the policy to the Folder of a freshly written artifact.
    fn apply(
        &self,
        coordinate: &ArtifactCoordinate,
        location: &StorageLocation,
    ) -> Result<RetentionReport, StoreError>;
}

/// Build the configured policy: `None` enumerates only.
pub fn policy_for(keep: Option<NonZeroUsize>) -> Arc<dyn RetentionPolicy> {
    match keep {
        Some(keep) => Arc::new(KeepLatest::new(keep)),
        None => Arc::new(EnumerateOnly),
    }
}

/// Lists candidates without removing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerateOnly;

impl RetentionPolicy for EnumerateOnly {
    fn name(&self) -> &'static str {
        "enumerate-only"
    }

    fn apply(
        &self,
        coordinate: &ArtifactCoordinate,
        location: &StorageLocation,
    ) -> Result<RetentionReport, StoreError> {
        let candidates = snapshot_candidates(coordinate, location)?;
        tracing::debug!(
            folder = %location.folder().display(),
            count = candidates.len(),
            "snapshot retention candidates"
        );
        Ok(RetentionReport {
            candidates: candidates.into_iter().map(|c| c.path).collect(),
            removed: Vec::new(),
        })
    }
}

/// Keeps the written file and the newest candidates, `keep` in total.
#[derive(Debug, Clone, Copy)]
pub struct KeepLatest {
    keep: NonZeroUsize,
}

impl KeepLatest {
    /// Policy retaining `keep` builds per artifact, classifier and packaging.
    pub fn new(keep: NonZeroUsize) -> Self {
        Self { keep }
    }
}

impl RetentionPolicy for KeepLatest {
    fn name(&self) -> &'static str {
        "keep-latest"
    }

    fn apply(
        &self,
        coordinate: &ArtifactCoordinate,
        location: &StorageLocation,
    ) -> Result<RetentionReport, StoreError> {
        let candidates = snapshot_candidates(coordinate, location)?;
        let written = location.path();

        // The file just written always survives, whatever its mtime says.
        let mut kept = usize::from(candidates.iter().any(|c| c.path == written));
        let mut removed = Vec::new();
        for candidate in candidates.iter().filter(|c| c.path != written) {
            if kept < self.keep.get() {
                kept += 1;
                continue;
            }
            remove_with_sidecar(&candidate.path)?;
            tracing::info!(path = %candidate.path.display(), "removed superseded snapshot");
            removed.push(candidate.path.clone());
        }

        Ok(RetentionReport {
            candidates: candidates.into_iter().map(|c| c.path).collect(),
            removed,
        })
    }
}

#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    modified: SystemTime,
}

/// Regular, non-hidden builds in the written file's Folder that share its
/// artifact, classifier and packaging, newest first. A missing Folder has
/// no candidates.
fn snapshot_candidates(
    coordinate: &ArtifactCoordinate,
    location: &StorageLocation,
) -> Result<Vec<Candidate>, StoreError> {
    let written = location.file_name();
    if written.ends_with(SIDECAR_SUFFIX) {
        return Ok(Vec::new());
    }
    let base = base_version(&coordinate.version);
    let Some(variant) = build_variant(written, &coordinate.artifact, base) else {
        tracing::debug!(file = written, "written file is not a snapshot build");
        return Ok(Vec::new());
    };

    let folder = location.folder();
    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(folder, e)),
    };

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(folder, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with('.') || build_variant(name, &coordinate.artifact, base) != Some(variant) {
            continue;
        }
        let meta = entry.metadata().map_err(|e| StoreError::io(entry.path(), e))?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().map_err(|e| StoreError::io(entry.path(), e))?;
        candidates.push(Candidate {
            path: entry.path(),
            modified,
        });
    }

    candidates.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.path.cmp(&a.path)));
    Ok(candidates)
}

/// `1.0-SNAPSHOT` -> `1.0`, matched case-insensitively.
fn base_version(version: &str) -> &str {
    const MARKER: &str = "-snapshot";
    let cut = version.len().saturating_sub(MARKER.len());
    match version.get(cut..) {
        Some(tail) if tail.eq_ignore_ascii_case(MARKER) => &version[..cut],
        _ => version,
    }
}

/// What follows the build marker in a snapshot file name: `.jar` for
/// `lib-1.0-SNAPSHOT.jar`, `-sources.jar` for
/// `lib-1.0-20240101.120000-3-sources.jar`. `None` when `name` is not a
/// build of `artifact` at `base`.
fn build_variant<'a>(name: &'a str, artifact: &str, base: &str) -> Option<&'a str> {
    let rest = name
        .strip_prefix(artifact)?
        .strip_prefix('-')?
        .strip_prefix(base)?
        .strip_prefix('-')?;
    let rest = strip_snapshot_marker(rest).or_else(|| strip_timestamp(rest))?;
    let packaged = rest.len() > 1 && (rest.starts_with('.') || rest.starts_with('-'));
    packaged.then_some(rest)
}

fn strip_snapshot_marker(s: &str) -> Option<&str> {
    const MARKER: &str = "snapshot";
    let head = s.get(..MARKER.len())?;
    head.eq_ignore_ascii_case(MARKER).then(|| &s[MARKER.len()..])
}

/// Strip a deploy timestamp and build number, `yyyyMMdd.HHmmss-N`.
fn strip_timestamp(s: &str) -> Option<&str> {
    let s = strip_digits(s, Some(8))?.strip_prefix('.')?;
    let s = strip_digits(s, Some(6))?.strip_prefix('-')?;
    strip_digits(s, None)
}

/// Strip exactly `count` leading ASCII digits, or at least one when `None`.
fn strip_digits(s: &str, count: Option<usize>) -> Option<&str> {
    let leading = s.bytes().take_while(u8::is_ascii_digit).count();
    match count {
        Some(n) if leading >= n => Some(&s[n..]),
        None if leading > 0 => Some(&s[leading..]),
        _ => None,
    }
}

fn remove_with_sidecar(path: &Path) -> Result<(), StoreError> {
    std::fs::remove_file(path).map_err(|e| StoreError::io(path, e))?;
    let sidecar = sidecar_for(path);
    match std::fs::remove_file(&sidecar) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io(sidecar, e)),
    }
}
