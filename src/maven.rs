use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

/// Components of a module identifier in Maven coordinate form.
///
/// Distribution modules are identified by coordinates such as
/// `net.minecraftforge:forge:1.12.2-14.23.5.2860` or, for sidecar manifests,
/// `net.minecraftforge:forge:1.12.2-14.23.5.2860@json`. Accepted shapes:
///   `groupId:artifactId:version`
///   `groupId:artifactId:version:classifier`
///   `groupId:artifactId:version[:classifier]@extension`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MavenComponents {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub classifier: Option<String>,
    /// File extension. Defaults to `"jar"`.
    pub extension: String,
}

impl MavenComponents {
    /// Parse a module identifier into its Maven components.
    pub fn parse(identifier: &str) -> CoreResult<Self> {
        // Split off @extension first
        let (coord, extension) = match identifier.rfind('@') {
            Some(idx) => (&identifier[..idx], Some(&identifier[idx + 1..])),
            None => (identifier, None),
        };

        let parts: Vec<&str> = coord.split(':').collect();

        match parts.len() {
            3 => Ok(Self {
                group: parts[0].to_string(),
                artifact: parts[1].to_string(),
                version: parts[2].to_string(),
                classifier: None,
                extension: extension.unwrap_or("jar").to_string(),
            }),
            4 => Ok(Self {
                group: parts[0].to_string(),
                artifact: parts[1].to_string(),
                version: parts[2].to_string(),
                classifier: Some(parts[3].to_string()),
                extension: extension.unwrap_or("jar").to_string(),
            }),
            _ => Err(CoreError::InvalidMavenCoordinate(identifier.to_string())),
        }
    }

    /// Group portion as a path (`net/minecraftforge`).
    pub fn group_path(&self) -> String {
        self.group.replace('.', "/")
    }

    /// `artifact-version[-classifier].extension`
    pub fn filename(&self) -> String {
        match &self.classifier {
            Some(c) => format!("{}-{}-{}.{}", self.artifact, self.version, c, self.extension),
            None => format!("{}-{}.{}", self.artifact, self.version, self.extension),
        }
    }

    /// Repo-relative path in Maven layout:
    /// `<group_path>/<artifact>/<version>/<filename>`.
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(self.group_path())
            .join(&self.artifact)
            .join(&self.version)
            .join(self.filename())
    }

    /// Full URL under the given repository base.
    pub fn url(&self, repo_base: &str) -> String {
        let base = repo_base.trim_end_matches('/');
        format!(
            "{}/{}/{}/{}/{}",
            base,
            self.group_path(),
            self.artifact,
            self.version,
            self.filename()
        )
    }
}

impl fmt::Display for MavenComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classifier {
            Some(c) => write!(
                f,
                "{}:{}:{}:{}@{}",
                self.group, self.artifact, self.version, c, self.extension
            ),
            None => write!(
                f,
                "{}:{}:{}@{}",
                self.group, self.artifact, self.version, self.extension
            ),
        }
    }
}
