pub mod version;

pub use version::{PlatformVersion, ReleaseChannel};

use std::{fmt::Display, str::FromStr};

use regex_lite::Regex;

use crate::model::ParseError;

pub const CENTRAL_REPOSITORY_ID: &str = "central";
pub const MILESTONES_REPOSITORY_ID: &str = "spring-milestones";
pub const SNAPSHOTS_REPOSITORY_ID: &str = "spring-snapshots";

/// A Maven artifact coordinate, `groupId:artifactId` with an optional version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

impl Coordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Coordinate {
        Coordinate {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
        }
    }

    pub fn versioned(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Coordinate {
        Coordinate {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: Some(version.into()),
        }
    }

    /// The version-less `groupId:artifactId` identity.
    pub fn identity(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl FromStr for Coordinate {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let re = Regex::new(
            r"^(?P<group>[^:\s]+):(?P<artifact>[^:\s]+)(?::(?P<version>[^:\s]+))?$",
        )
        .unwrap();
        let captures = re
            .captures(value)
            .ok_or_else(|| ParseError::InvalidCoordinate(value.to_string()))?;
        let part = |name: &str| captures.name(name).map(|m| m.as_str().to_string());

        Ok(Coordinate {
            group_id: part("group")
                .ok_or_else(|| ParseError::InvalidCoordinate(value.to_string()))?,
            artifact_id: part("artifact")
                .ok_or_else(|| ParseError::InvalidCoordinate(value.to_string()))?,
            version: part("version"),
        })
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, version),
            None => write!(f, "{}:{}", self.group_id, self.artifact_id),
        }
    }
}

/// A `(groupId, artifactId, version)` entry contributed by a BOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ManagedDependency {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> ManagedDependency {
        ManagedDependency {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }
}

impl Display for ManagedDependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A remote Maven repository endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: String,
    pub url: String,
    pub snapshots_enabled: bool,
}

impl Repository {
    pub fn new(id: impl Into<String>, url: impl Into<String>, snapshots_enabled: bool) -> Repository {
        Repository {
            id: id.into(),
            url: url.into(),
            snapshots_enabled,
        }
    }

    pub fn central() -> Repository {
        Repository::new(
            CENTRAL_REPOSITORY_ID,
            "https://repo.maven.apache.org/maven2",
            false,
        )
    }

    pub fn spring_milestones() -> Repository {
        Repository::new(
            MILESTONES_REPOSITORY_ID,
            "https://repo.spring.io/milestone",
            false,
        )
    }

    pub fn spring_snapshots() -> Repository {
        Repository::new(
            SNAPSHOTS_REPOSITORY_ID,
            "https://repo.spring.io/snapshot",
            true,
        )
    }

    /// Looks up one of the well-known repositories by id.
    pub fn builtin(id: &str) -> Option<Repository> {
        match id {
            CENTRAL_REPOSITORY_ID => Some(Repository::central()),
            MILESTONES_REPOSITORY_ID => Some(Repository::spring_milestones()),
            SNAPSHOTS_REPOSITORY_ID => Some(Repository::spring_snapshots()),
            _ => None,
        }
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.url)
    }
}
