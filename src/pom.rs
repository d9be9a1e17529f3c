use std::collections::HashMap;

use log::{debug, trace};
use serde::Deserialize;
use thiserror::Error;

use crate::model::maven::ManagedDependency;

#[derive(Error, Debug)]
pub enum PomError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] serde_xml_rs::Error),
}

/// Dependency scope as declared in a POM. Unknown scopes are treated as
/// compile, matching Maven's behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
    System,
    Import,
}

impl Scope {
    pub fn parse(value: Option<&str>) -> Scope {
        match value {
            Some("runtime") => Scope::Runtime,
            Some("provided") => Scope::Provided,
            Some("test") => Scope::Test,
            Some("system") => Scope::System,
            Some("import") => Scope::Import,
            _ => Scope::Compile,
        }
    }

    /// Whether the scope is part of the compile+runtime classpath.
    pub fn on_runtime_classpath(self) -> bool {
        matches!(self, Scope::Compile | Scope::Runtime)
    }
}

/// A dependency declaration read from a POM, with interpolated coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

/// An artifact descriptor (`pom.xml`), reduced to the parts dependency
/// resolution needs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pom {
    #[serde(default)]
    group_id: Option<String>,
    pub artifact_id: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    pub packaging: Option<String>,
    #[serde(default)]
    parent: Option<Parent>,
    #[serde(default)]
    properties: Option<HashMap<String, String>>,
    #[serde(default)]
    dependency_management: Option<DependencyManagement>,
    #[serde(default)]
    dependencies: Option<Dependencies>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Parent {
    group_id: String,
    artifact_id: String,
    version: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct DependencyManagement {
    #[serde(default)]
    dependencies: Option<Dependencies>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
struct Dependencies {
    #[serde(default, rename = "dependency")]
    entries: Vec<PomDependency>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct PomDependency {
    group_id: String,
    artifact_id: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    optional: Option<String>,
}

impl PomDependency {
    fn is_optional(&self) -> bool {
        self.optional.as_deref() == Some("true")
    }

    fn scope(&self) -> Scope {
        Scope::parse(self.scope.as_deref())
    }
}

impl Pom {
    pub fn parse(xml: &str) -> Result<Pom, PomError> {
        Ok(serde_xml_rs::from_str(xml)?)
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|parent| parent.group_id.as_str()))
    }

    pub fn version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|parent| parent.version.as_str()))
    }

    /// The managed dependencies declared by this POM, in document order.
    /// Import-scoped entries and entries with unresolvable versions are
    /// skipped.
    pub fn managed_dependencies(&self) -> Vec<ManagedDependency> {
        let mut managed = Vec::new();
        for entry in self.managed_entries() {
            if entry.scope() == Scope::Import {
                trace!(
                    "Skipping import-scoped managed entry {}:{}",
                    entry.group_id,
                    entry.artifact_id
                );
                continue;
            }
            let Some((group_id, artifact_id, version)) = self.interpolated_coordinate(entry) else {
                continue;
            };
            let Some(version) = version else {
                debug!(
                    "Managed entry {group_id}:{artifact_id} in {} has no version, skipping",
                    self.artifact_id
                );
                continue;
            };
            managed.push(ManagedDependency::new(group_id, artifact_id, version));
        }
        managed
    }

    /// The first managed version this POM declares for a coordinate.
    pub fn managed_version(&self, group_id: &str, artifact_id: &str) -> Option<String> {
        self.managed_dependencies()
            .into_iter()
            .find(|managed| managed.matches(group_id, artifact_id))
            .map(|managed| managed.version)
    }

    /// The non-optional compile and runtime dependencies of this POM.
    pub fn classpath_dependencies(&self) -> Vec<DeclaredDependency> {
        let entries = match &self.dependencies {
            Some(dependencies) => &dependencies.entries,
            None => return Vec::new(),
        };
        entries
            .iter()
            .filter(|entry| !entry.is_optional() && entry.scope().on_runtime_classpath())
            .filter_map(|entry| {
                let (group_id, artifact_id, version) = self.interpolated_coordinate(entry)?;
                Some(DeclaredDependency {
                    group_id,
                    artifact_id,
                    version,
                })
            })
            .collect()
    }

    fn managed_entries(&self) -> impl Iterator<Item = &PomDependency> {
        self.dependency_management
            .iter()
            .flat_map(|management| management.dependencies.iter())
            .flat_map(|dependencies| dependencies.entries.iter())
    }

    /// Interpolates the coordinate of an entry; `None` when the group or
    /// artifact reference an undefined property. An unresolvable version
    /// degrades to a missing one so that managed defaults can still apply.
    fn interpolated_coordinate(
        &self,
        entry: &PomDependency,
    ) -> Option<(String, String, Option<String>)> {
        let group_id = self.interpolate(&entry.group_id)?;
        let artifact_id = self.interpolate(&entry.artifact_id)?;
        let version = match &entry.version {
            Some(version) => match self.interpolate(version) {
                Some(version) => Some(version),
                None => {
                    debug!(
                        "Version `{version}` of {group_id}:{artifact_id} in {} references an \
                         undefined property",
                        self.artifact_id
                    );
                    None
                }
            },
            None => None,
        };
        Some((group_id, artifact_id, version))
    }

    /// Expands `${...}` references against the POM's properties and the
    /// project coordinates; `None` when a reference cannot be resolved.
    pub fn interpolate(&self, value: &str) -> Option<String> {
        let mut current = value.to_string();
        // A property may expand to another reference; bound the rewrites.
        for _ in 0..5 {
            if !current.contains("${") {
                return Some(current);
            }
            current = self.interpolate_once(&current)?;
        }
        if current.contains("${") {
            None
        } else {
            Some(current)
        }
    }

    fn interpolate_once(&self, value: &str) -> Option<String> {
        let mut result = String::new();
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            let end = rest[start..].find('}')? + start;
            result.push_str(&rest[..start]);
            result.push_str(&self.property(&rest[start + 2..end])?);
            rest = &rest[end + 1..];
        }
        result.push_str(rest);
        Some(result)
    }

    fn property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" | "groupId" => {
                self.group_id().map(str::to_string)
            }
            "project.artifactId" | "pom.artifactId" => Some(self.artifact_id.clone()),
            "project.version" | "pom.version" | "version" => self.version().map(str::to_string),
            "project.parent.version" => self
                .parent
                .as_ref()
                .map(|parent| parent.version.clone()),
            key => self
                .properties
                .as_ref()
                .and_then(|properties| properties.get(key).cloned()),
        }
    }
}
