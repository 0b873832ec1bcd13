//! # Repository Names
//!
//! A repository is a named subdirectory of the repository root. The name
//! arrives either from the `{repositoryId}` URL segment or from the
//! configured default, and in both cases it becomes one path component,
//! so it is validated like one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated repository name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validate and wrap a repository name.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if invalid {
            return Err(ValidationError::InvalidRepositoryName(name));
        }
        Ok(Self(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RepositoryName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RepositoryName> for String {
    fn from(name: RepositoryName) -> Self {
        name.0
    }
}
