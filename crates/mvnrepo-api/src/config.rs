//! # Server Configuration
//!
//! Resolved in three layers, later layers winning:
//!
//! 1. Built-in defaults (port 8080, root `./repository`, default
//!    repository `releases`, enumerate-only retention).
//! 2. An optional JSON file. Its path comes from `MVNREPO_CONFIG`; when
//!    that is unset, `config/config.json` is used if it exists.
//! 3. Environment variables `PORT`, `REPOSITORY_PATH`,
//!    `DEFAULT_REPOSITORY` and `SNAPSHOT_RETENTION`.
//!
//! ```json
//! {
//!   "Port": 8080,
//!   "RepositoryPath": "/var/lib/mvnrepo",
//!   "DefaultRepository": "releases",
//!   "SnapshotRetention": 5
//! }
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use mvnrepo_core::{RepositoryName, ValidationError};
use serde::Deserialize;
use thiserror::Error;

/// Config file consulted when `MVNREPO_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "config/config.json";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ROOT: &str = "./repository";
const DEFAULT_REPOSITORY: &str = "releases";

/// Errors raised while assembling [`AppConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("read config file {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid JSON of the expected shape.
    #[error("parse config file {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// `PORT` is not a valid port number.
    #[error("invalid port {0:?}")]
    InvalidPort(String),

    /// Snapshot retention must be a positive count.
    #[error("invalid snapshot retention {0:?}: expected a positive integer")]
    InvalidRetention(String),

    /// The default repository name is unusable.
    #[error(transparent)]
    Repository(#[from] ValidationError),
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// TCP port to listen on.
    pub port: u16,
    /// Directory under which every repository is stored.
    pub repository_root: PathBuf,
    /// Repository used by requests that do not name one.
    pub default_repository: RepositoryName,
    /// Snapshot files kept per Folder; `None` removes nothing.
    pub snapshot_retention: Option<NonZeroUsize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            repository_root: PathBuf::from(DEFAULT_ROOT),
            default_repository: RepositoryName::new(DEFAULT_REPOSITORY)
                .unwrap_or_else(|_| unreachable!("built-in repository name is valid")),
            snapshot_retention: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FileConfig {
    port: Option<u16>,
    repository_path: Option<PathBuf>,
    default_repository: Option<String>,
    snapshot_retention: Option<usize>,
}

impl AppConfig {
    /// Load from the config file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `env` to look up variables.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file = match env("MVNREPO_CONFIG") {
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };
        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "reading config file");
            config.apply_file(read_file(&path)?)?;
        }

        if let Some(port) = env("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(root) = env("REPOSITORY_PATH") {
            config.repository_root = PathBuf::from(root);
        }
        if let Some(name) = env("DEFAULT_REPOSITORY") {
            config.default_repository = RepositoryName::new(name)?;
        }
        if let Some(keep) = env("SNAPSHOT_RETENTION") {
            config.snapshot_retention = Some(parse_retention(&keep)?);
        }

        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<(), ConfigError> {
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(root) = file.repository_path {
            self.repository_root = root;
        }
        if let Some(name) = file.default_repository {
            self.default_repository = RepositoryName::new(name)?;
        }
        if let Some(keep) = file.snapshot_retention {
            self.snapshot_retention = Some(
                NonZeroUsize::new(keep)
                    .ok_or_else(|| ConfigError::InvalidRetention(keep.to_string()))?,
            );
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_retention(raw: &str) -> Result<NonZeroUsize, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidRetention(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(dir: &Path, json: &str) -> String {
        let path = dir.join("config.json");
        std::fs::write(&path, json).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = AppConfig::load_with(env_of(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_repository.as_str(), "releases");
        assert_eq!(config.snapshot_retention, None);
    }

    #[test]
    fn file_values_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"{"Port": 9000, "RepositoryPath": "/srv/repo", "DefaultRepository": "internal", "SnapshotRetention": 3}"#,
        );

        let config = AppConfig::load_with(env_of(&[("MVNREPO_CONFIG", &path)])).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.repository_root, PathBuf::from("/srv/repo"));
        assert_eq!(config.default_repository.as_str(), "internal");
        assert_eq!(config.snapshot_retention, NonZeroUsize::new(3));
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"Port": 9000, "DefaultRepository": "internal"}"#);

        let config = AppConfig::load_with(env_of(&[
            ("MVNREPO_CONFIG", &path),
            ("PORT", "9100"),
            ("DEFAULT_REPOSITORY", "snapshots"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.default_repository.as_str(), "snapshots");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"RepositoryPath": "data"}"#);

        let config = AppConfig::load_with(env_of(&[("MVNREPO_CONFIG", &path)])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.repository_root, PathBuf::from("data"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let err = AppConfig::load_with(env_of(&[("MVNREPO_CONFIG", missing.to_str().unwrap())]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "{ not json");
        let err = AppConfig::load_with(env_of(&[("MVNREPO_CONFIG", &path)])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn invalid_env_values_are_rejected() {
        assert!(matches!(
            AppConfig::load_with(env_of(&[("PORT", "http")])),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            AppConfig::load_with(env_of(&[("SNAPSHOT_RETENTION", "0")])),
            Err(ConfigError::InvalidRetention(_))
        ));
        assert!(matches!(
            AppConfig::load_with(env_of(&[("DEFAULT_REPOSITORY", "../etc")])),
            Err(ConfigError::Repository(_))
        ));
    }

    #[test]
    fn zero_retention_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"SnapshotRetention": 0}"#);
        assert!(matches!(
            AppConfig::load_with(env_of(&[("MVNREPO_CONFIG", &path)])),
            Err(ConfigError::InvalidRetention(_))
        ));
    }
}
