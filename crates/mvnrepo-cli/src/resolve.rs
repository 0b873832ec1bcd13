//! # Resolve Subcommand
//!
//! Parses an artifact path exactly as the server does and reports the
//! coordinate, the storage location under the repository root, and
//! whether a file is stored there. Nothing is created.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use mvnrepo_core::{ArtifactCoordinate, RepositoryName};
use mvnrepo_store::ContentStore;

/// Arguments for the `mvnrepo resolve` subcommand.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Artifact path below the repository, e.g. `com/x/lib/1.0/lib-1.0.jar`.
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Repository the path belongs to.
    #[arg(long, env = "DEFAULT_REPOSITORY", default_value = "releases")]
    pub repository: String,

    /// Repository root directory.
    #[arg(long, env = "REPOSITORY_PATH", default_value = "./repository")]
    pub root: PathBuf,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// What a path resolves to.
#[derive(Debug, Serialize)]
pub struct Resolution {
    /// Target repository.
    pub repository: RepositoryName,
    /// Parsed coordinate.
    pub coordinate: ArtifactCoordinate,
    /// Whether the version is a snapshot.
    pub snapshot: bool,
    /// Storage path under the root.
    pub location: PathBuf,
    /// Whether a regular file is stored at `location`.
    pub exists: bool,
    /// Integrity tag of the stored file, if any.
    pub integrity_tag: Option<String>,
}

/// Execute the resolve subcommand.
pub fn run_resolve(args: &ResolveArgs) -> Result<u8> {
    let resolution = crate::block_on(resolve(args))??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(0);
    }

    let c = &resolution.coordinate;
    println!("coordinate:  {c}");
    println!("group:       {}", c.group);
    println!("artifact:    {}", c.artifact);
    println!("version:     {}", c.version);
    println!("classifier:  {}", c.classifier().unwrap_or("-"));
    println!("packaging:   {}", c.packaging);
    println!("snapshot:    {}", resolution.snapshot);
    println!("repository:  {}", resolution.repository);
    println!("location:    {}", resolution.location.display());
    match &resolution.integrity_tag {
        Some(tag) => println!("stored:      yes (tag {tag})"),
        None => println!("stored:      no"),
    }
    Ok(0)
}

/// Resolve `args.path` against the repository root.
pub async fn resolve(args: &ResolveArgs) -> Result<Resolution> {
    let repository = RepositoryName::new(args.repository.as_str())
        .with_context(|| format!("invalid repository {:?}", args.repository))?;
    let path = args.path.trim_start_matches('/');
    let coordinate =
        ArtifactCoordinate::parse(path).with_context(|| format!("cannot resolve {path:?}"))?;

    let store = ContentStore::new(&args.root);
    let location = store.locate(&repository, &coordinate);
    let exists = store.exists(&location).await;
    let integrity_tag = if exists {
        let tag = store
            .integrity_tag(&location)
            .await
            .with_context(|| format!("failed to tag {location}"))?;
        Some(tag.as_str().trim().to_string())
    } else {
        None
    };
    tracing::debug!(path = %location, exists, "resolved artifact path");

    Ok(Resolution {
        snapshot: coordinate.is_snapshot(),
        location: location.path().to_path_buf(),
        repository,
        coordinate,
        exists,
        integrity_tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(root: &std::path::Path, path: &str) -> ResolveArgs {
        ResolveArgs {
            path: path.to_string(),
            repository: "r1".to_string(),
            root: root.to_path_buf(),
            json: false,
        }
    }

    #[tokio::test]
    async fn resolves_absent_artifact_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let resolution = resolve(&args(dir.path(), "/com/x/lib/1.0-SNAPSHOT/lib-1.0-SNAPSHOT.jar"))
            .await
            .unwrap();

        assert_eq!(resolution.coordinate.group, "com.x");
        assert!(resolution.snapshot);
        assert!(!resolution.exists);
        assert_eq!(resolution.integrity_tag, None);
        assert_eq!(
            resolution.location,
            dir.path().join("r1/com/x/lib/1.0-SNAPSHOT/lib-1.0-SNAPSHOT.jar")
        );
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn reports_tag_of_stored_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("r1/com/x/lib/1.0");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("lib-1.0.jar"), b"abc").unwrap();

        let resolution = resolve(&args(dir.path(), "com/x/lib/1.0/lib-1.0.jar"))
            .await
            .unwrap();
        assert!(resolution.exists);
        assert_eq!(
            resolution.integrity_tag.as_deref(),
            Some("a9993e364706816aba3e25717850c26c9cd0d89d")
        );
    }

    #[tokio::test]
    async fn rejects_underspecified_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(&args(dir.path(), "lib-1.0.jar")).await.unwrap_err();
        assert!(format!("{err:#}").contains("cannot resolve"));
    }

    #[tokio::test]
    async fn rejects_invalid_repository() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = args(dir.path(), "com/x/lib/1.0/lib.jar");
        bad.repository = "a/b".to_string();
        assert!(resolve(&bad).await.is_err());
    }
}
