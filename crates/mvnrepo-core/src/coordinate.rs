//! # Artifact Coordinates
//!
//! Parses a repository-relative, `/`-separated path into an
//! [`ArtifactCoordinate`]. Maven paths carry no schema, so fields are
//! located by position counted from the end of the path:
//!
//! ```text
//! com/example/lib/1.0/lib-1.0-sources.jar
//! \_________/ \_/ \_/ \_________________/
//!    group    art ver      file name
//! ```
//!
//! Some layouts put one extra `jars/` directory between the version and
//! the file. When the second-to-last segment is that marker, every
//! positional index shifts by one.
//!
//! ## Classifier Heuristic
//!
//! The classifier is the last `-`-delimited token of the file name with
//! the packaging extension stripped, but only when that token contains
//! exactly one `.`. `lib-1.0.jar` has no classifier (the token `1.0.jar`
//! has two dots); `lib-1.0-sources.jar` has classifier `sources`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoordinateError;

/// Directory marker that inserts one extra level below the version.
pub const JARS_MARKER: &str = "jars";

const SNAPSHOT_SUFFIX: &str = "snapshot";

/// The identity of one artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactCoordinate {
    /// Dot-separated namespace, e.g. `com.example`. May be empty.
    pub group: String,
    /// Artifact name (one path segment).
    pub artifact: String,
    /// Version string (one path segment).
    pub version: String,
    /// Variant qualifier such as `sources`; empty when absent.
    pub classifier: String,
    /// File type, taken from the file name's final extension.
    pub packaging: String,
    /// The original last path segment, kept verbatim.
    pub file_name: String,
}

impl ArtifactCoordinate {
    /// Parse a repository-relative path (no leading repository segment).
    ///
    /// Never panics. Paths too short to name a group, artifact and
    /// version yield [`CoordinateError::Underspecified`]; segments that
    /// would escape the repository yield [`CoordinateError::InvalidSegment`].
    pub fn parse(path: &str) -> Result<Self, CoordinateError> {
        let segments: Vec<&str> = path.split('/').collect();
        let n = segments.len();

        let offset = usize::from(n >= 2 && segments[n - 2] == JARS_MARKER);
        if n < 3 + offset {
            return Err(CoordinateError::Underspecified {
                path: path.to_string(),
                segments: n,
            });
        }

        let file_name = segments[n - 1];
        let version = segments[n - 2 - offset];
        let artifact = segments[n - 3 - offset];
        let group_segments = &segments[..n - 3 - offset];

        for segment in group_segments
            .iter()
            .chain([&artifact, &version, &file_name])
        {
            check_segment(path, segment)?;
        }

        let packaging = packaging_of(file_name);
        let classifier = classifier_of(file_name, packaging);

        Ok(Self {
            group: group_segments.join("."),
            artifact: artifact.to_string(),
            version: version.to_string(),
            classifier,
            packaging: packaging.to_string(),
            file_name: file_name.to_string(),
        })
    }

    /// Whether the version ends in `snapshot`, ignoring case.
    pub fn is_snapshot(&self) -> bool {
        self.version.to_lowercase().ends_with(SNAPSHOT_SUFFIX)
    }

    /// The classifier, or `None` when the file carries none.
    pub fn classifier(&self) -> Option<&str> {
        if self.classifier.is_empty() {
            None
        } else {
            Some(&self.classifier)
        }
    }

    /// Group split into its path segments. Empty pieces are skipped.
    pub fn group_segments(&self) -> impl Iterator<Item = &str> {
        self.group.split('.').filter(|s| !s.is_empty())
    }
}

/// Maven-style `group:artifact:packaging[:classifier]:version`.
impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.packaging)?;
        if let Some(classifier) = self.classifier() {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.version)
    }
}

fn check_segment(path: &str, segment: &str) -> Result<(), CoordinateError> {
    let unusable = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['\\', '\0']);
    if unusable {
        return Err(CoordinateError::InvalidSegment {
            path: path.to_string(),
            segment: segment.to_string(),
        });
    }
    Ok(())
}

/// Substring after the final `.`, or the whole name when there is none.
fn packaging_of(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(_, extension)| extension)
}

fn classifier_of(file_name: &str, packaging: &str) -> String {
    let Some((_, last)) = file_name.rsplit_once('-') else {
        return String::new();
    };
    match last
        .strip_suffix(packaging)
        .and_then(|rest| rest.strip_suffix('.'))
    {
        Some(classifier) if last.matches('.').count() == 1 => classifier.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(path: &str) -> ArtifactCoordinate {
        ArtifactCoordinate::parse(path).unwrap()
    }

    #[test]
    fn parses_plain_jar() {
        let c = parse("com/x/lib/1.0/lib-1.0.jar");
        assert_eq!(c.group, "com.x");
        assert_eq!(c.artifact, "lib");
        assert_eq!(c.version, "1.0");
        assert_eq!(c.packaging, "jar");
        assert_eq!(c.file_name, "lib-1.0.jar");
        assert_eq!(c.classifier, "");
        assert_eq!(c.classifier(), None);
    }

    #[test]
    fn parses_classifier() {
        let c = parse("com/x/lib/1.0/lib-1.0-sources.jar");
        assert_eq!(c.classifier, "sources");
        assert_eq!(c.classifier(), Some("sources"));
        assert_eq!(c.packaging, "jar");
    }

    #[test]
    fn javadoc_classifier_on_deep_group() {
        let c = parse("org/apache/commons/commons-lang3/3.12.0/commons-lang3-3.12.0-javadoc.jar");
        assert_eq!(c.group, "org.apache.commons");
        assert_eq!(c.artifact, "commons-lang3");
        assert_eq!(c.version, "3.12.0");
        assert_eq!(c.classifier, "javadoc");
    }

    #[test]
    fn pom_has_no_classifier() {
        let c = parse("com/x/lib/2.3.1/lib-2.3.1.pom");
        assert_eq!(c.packaging, "pom");
        assert_eq!(c.classifier, "");
    }

    #[test]
    fn sidecar_packaging_is_last_extension() {
        let c = parse("com/x/lib/1.0/lib-1.0.jar.sha1");
        assert_eq!(c.packaging, "sha1");
        assert_eq!(c.classifier, "");
        assert_eq!(c.file_name, "lib-1.0.jar.sha1");
    }

    #[test]
    fn jars_marker_shifts_positions() {
        let plain = parse("com/x/lib/1.0/lib-1.0.jar");
        let shifted = parse("com/x/lib/1.0/jars/lib-1.0.jar");
        assert_eq!(shifted.group, plain.group);
        assert_eq!(shifted.artifact, plain.artifact);
        assert_eq!(shifted.version, plain.version);
        assert_eq!(shifted.file_name, plain.file_name);
    }

    #[test]
    fn empty_group_is_allowed() {
        let c = parse("lib/1.0/lib-1.0.jar");
        assert_eq!(c.group, "");
        assert_eq!(c.artifact, "lib");
        assert_eq!(c.group_segments().count(), 0);
    }

    #[test]
    fn file_without_extension_uses_whole_name_as_packaging() {
        let c = parse("com/x/lib/1.0/README");
        assert_eq!(c.packaging, "README");
        assert_eq!(c.classifier, "");
    }

    #[test]
    fn file_without_dash_has_no_classifier() {
        let c = parse("com/x/lib/1.0/lib.jar");
        assert_eq!(c.classifier, "");
    }

    #[test]
    fn underspecified_paths_are_errors() {
        for path in ["", "lib-1.0.jar", "1.0/lib-1.0.jar", "1.0/jars/lib-1.0.jar"] {
            match ArtifactCoordinate::parse(path) {
                Err(CoordinateError::Underspecified { .. }) => {}
                other => panic!("expected Underspecified for {path:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn traversal_segments_are_rejected() {
        for path in [
            "com/../lib/1.0/lib.jar",
            "com/x/lib/../lib.jar",
            "com//lib/1.0/lib.jar",
            "com/x/lib/1.0/",
            "com/x\\y/lib/1.0/lib.jar",
        ] {
            assert!(
                matches!(
                    ArtifactCoordinate::parse(path),
                    Err(CoordinateError::InvalidSegment { .. })
                ),
                "expected InvalidSegment for {path:?}"
            );
        }
    }

    #[test]
    fn snapshot_detection_ignores_case() {
        assert!(parse("com/x/lib/1.0-SNAPSHOT/lib-1.0-SNAPSHOT.jar").is_snapshot());
        assert!(parse("com/x/lib/1.0-snapshot/lib.jar").is_snapshot());
        assert!(!parse("com/x/lib/1.0/lib-1.0.jar").is_snapshot());
        assert!(!parse("com/x/lib/snapshot-1/lib.jar").is_snapshot());
    }

    #[test]
    fn display_is_maven_style() {
        assert_eq!(
            parse("com/x/lib/1.0/lib-1.0.jar").to_string(),
            "com.x:lib:jar:1.0"
        );
        assert_eq!(
            parse("com/x/lib/1.0/lib-1.0-sources.jar").to_string(),
            "com.x:lib:jar:sources:1.0"
        );
    }

    #[test]
    fn serializes_all_fields() {
        let c = parse("com/x/lib/1.0/lib-1.0-sources.jar");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["group"], "com.x");
        assert_eq!(json["classifier"], "sources");
        assert_eq!(json["file_name"], "lib-1.0-sources.jar");
    }
}
