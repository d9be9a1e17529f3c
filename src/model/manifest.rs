use std::{collections::BTreeMap, path::Path};

use log::{debug, error};
use serde::Deserialize;

use crate::model::{
    maven::{PlatformVersion, Repository},
    ParseError,
};

/// Placeholder in a BOM version template replaced by the platform version.
const PLATFORM_PLACEHOLDER: &str = "{platform}";

/// The bomvet.toml manifest: the dependencies to verify, the BOM definitions
/// they reference and the repository catalog.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct Manifest {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryDefinition>,
    #[serde(default)]
    pub boms: BTreeMap<String, BomDefinition>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencyDefinition>,
    #[serde(default, rename = "known-bad")]
    pub known_bad: KnownBad,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct RepositoryDefinition {
    pub url: String,
    #[serde(default)]
    pub snapshots: bool,
}

/// A BOM reference: a coordinate template resolved against the platform
/// version, plus the repositories and additional BOMs it implies.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct BomDefinition {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(default)]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub additional: Vec<String>,
}

impl BomDefinition {
    /// The concrete BOM version for a platform, substituting `{platform}`.
    pub fn resolve_version(&self, platform: &PlatformVersion) -> String {
        self.version
            .replace(PLATFORM_PLACEHOLDER, &platform.to_string())
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct DependencyDefinition {
    pub group: String,
    pub artifact: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub boms: Vec<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub starter: bool,
}

/// Coordinates with a known upstream publishing defect: resolution failures
/// matching one of these exactly are reported as "no result" instead of
/// failing the verification.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct KnownBad {
    #[serde(default)]
    pub coordinates: Vec<String>,
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Manifest, ParseError> {
        debug!(
            "Attempting to read manifest from bomvet file {}",
            path.display()
        );
        let contents = std::fs::read_to_string(path)?;

        let manifest = Manifest::from_toml_str(&contents);
        if let Err(err) = &manifest {
            error!("Could not build a valid manifest from a bomvet toml file due to err {err}")
        }
        manifest
    }

    pub fn from_toml_str(data: &str) -> Result<Manifest, ParseError> {
        Ok(toml::from_str(data)?)
    }

    /// The platform version to resolve against: an explicit override wins
    /// over the manifest's `platform` key.
    pub fn platform_version(
        &self,
        explicit: Option<&str>,
    ) -> Result<PlatformVersion, ParseError> {
        explicit
            .or(self.platform.as_deref())
            .ok_or_else(|| ParseError::MissingKey("platform".to_string()))?
            .parse()
    }

    /// Looks up a repository id in the manifest catalog, falling back to the
    /// well-known repositories.
    pub fn repository(&self, id: &str) -> Option<Repository> {
        self.repositories
            .get(id)
            .map(|definition| Repository::new(id, &definition.url, definition.snapshots))
            .or_else(|| Repository::builtin(id))
    }

    pub fn bom(&self, id: &str) -> Option<&BomDefinition> {
        self.boms.get(id)
    }

    pub fn dependency(&self, id: &str) -> Option<&DependencyDefinition> {
        self.dependencies.get(id)
    }

    pub fn is_known_bad(&self, coordinate: &str) -> bool {
        self.known_bad
            .coordinates
            .iter()
            .any(|known| known == coordinate)
    }
}
