use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use log::{debug, info, warn};

use crate::{
    cache::{HttpPomCache, ResolutionCache},
    model::{
        manifest::{DependencyDefinition, Manifest},
        maven::PlatformVersion,
    },
    resolver::{
        managed_dependencies, repositories_for, resolve_graph, resolve_version,
        CachedDescriptorResolver, DescriptorResolver, ResolutionError,
    },
};

/// Every dependency flagged as a starter must pull this in transitively.
pub const STARTER_ARTIFACT: &str = "org.springframework.boot:spring-boot-starter";

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Resolution succeeded and all invariants hold.
    Resolved {
        version: String,
        artifacts: BTreeSet<String>,
    },
    /// A starter dependency whose graph does not include the starter.
    MissingStarter { version: String },
    /// Resolution failed on a coordinate from the known-bad allow-list.
    KnownBad { coordinate: String },
    Failed { reason: String },
}

impl Outcome {
    pub fn is_defect(&self) -> bool {
        matches!(self, Outcome::MissingStarter { .. } | Outcome::Failed { .. })
    }
}

#[derive(Debug)]
pub struct DependencyReport {
    pub id: String,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct VerificationReport {
    pub dependencies: Vec<DependencyReport>,
}

impl VerificationReport {
    pub fn defects(&self) -> impl Iterator<Item = &DependencyReport> {
        self.dependencies
            .iter()
            .filter(|report| report.outcome.is_defect())
    }

    pub fn has_defects(&self) -> bool {
        self.defects().next().is_some()
    }
}

/// Scratch directories created by worker threads, kept only so they can be
/// disposed in bulk at the end of a run.
#[derive(Default)]
struct ScratchRegistry {
    directories: Mutex<Vec<PathBuf>>,
}

impl ScratchRegistry {
    fn register(&self, directory: PathBuf) {
        if let Ok(mut directories) = self.directories.lock() {
            directories.push(directory);
        }
    }

    /// Best-effort recursive deletion; failures are swallowed.
    fn dispose(&self) {
        let Ok(mut directories) = self.directories.lock() else {
            return;
        };
        for directory in directories.drain(..) {
            if std::fs::remove_dir_all(&directory).is_err() {
                debug!("Could not remove scratch directory {}", directory.display());
            }
        }
    }
}

/// Verifies every dependency in the manifest against a platform version,
/// spread over worker threads. Each worker owns one resolver with its own
/// scratch local repository; the parsed-descriptor cache is shared. A failed
/// dependency is reported, never aborts the run.
pub fn verify(
    manifest: &Manifest,
    platform: &PlatformVersion,
    cache_root: &Path,
    cache: Arc<ResolutionCache>,
    threads: usize,
    timeout: Duration,
) -> VerificationReport {
    let tasks: Vec<(&String, &DependencyDefinition)> = manifest.dependencies.iter().collect();
    if tasks.is_empty() {
        return VerificationReport::default();
    }

    let threads = threads.clamp(1, tasks.len());
    let chunk_size = tasks.len().div_ceil(threads);
    let registry = ScratchRegistry::default();
    let mut reports: Vec<DependencyReport> = Vec::new();

    std::thread::scope(|scope| {
        let mut handles = Vec::new();
        for (index, chunk) in tasks.chunks(chunk_size).enumerate() {
            let cache = Arc::clone(&cache);
            let registry = &registry;
            handles.push(scope.spawn(move || -> Vec<DependencyReport> {
                let scratch = cache_root.join(format!("scratch-{index}"));
                let http = match HttpPomCache::new(scratch.clone(), timeout) {
                    Ok(http) => {
                        registry.register(scratch);
                        http
                    }
                    Err(error) => {
                        return chunk
                            .iter()
                            .map(|(id, _)| DependencyReport {
                                id: (*id).clone(),
                                outcome: Outcome::Failed {
                                    reason: error.to_string(),
                                },
                            })
                            .collect();
                    }
                };
                let resolver = CachedDescriptorResolver::new(http, cache);
                chunk
                    .iter()
                    .map(|(id, dependency)| {
                        info!("Verifying {id}");
                        DependencyReport {
                            id: (*id).clone(),
                            outcome: verify_dependency(&resolver, manifest, dependency, platform),
                        }
                    })
                    .collect()
            }));
        }
        for handle in handles {
            match handle.join() {
                Ok(mut chunk_reports) => reports.append(&mut chunk_reports),
                Err(_) => warn!("A verification worker thread panicked"),
            }
        }
    });

    registry.dispose();
    reports.sort_by(|left, right| left.id.cmp(&right.id));
    VerificationReport {
        dependencies: reports,
    }
}

/// Verifies a single dependency, mapping allow-listed failures to a
/// known-bad outcome instead of a defect.
pub fn verify_dependency<R: DescriptorResolver>(
    resolver: &R,
    manifest: &Manifest,
    dependency: &DependencyDefinition,
    platform: &PlatformVersion,
) -> Outcome {
    match resolve_dependency(resolver, manifest, dependency, platform) {
        Ok((version, artifacts)) => {
            if dependency.starter && !artifacts.contains(STARTER_ARTIFACT) {
                Outcome::MissingStarter { version }
            } else {
                Outcome::Resolved { version, artifacts }
            }
        }
        Err(error) => match error.offending_coordinate() {
            Some(coordinate) if manifest.is_known_bad(coordinate) => {
                warn!("Ignoring known-bad coordinate {coordinate}");
                Outcome::KnownBad {
                    coordinate: coordinate.to_string(),
                }
            }
            _ => Outcome::Failed {
                reason: error.to_string(),
            },
        },
    }
}

/// Resolves a dependency end to end: repositories, BOM chain, concrete
/// version, transitive identity set.
pub fn resolve_dependency<R: DescriptorResolver>(
    resolver: &R,
    manifest: &Manifest,
    dependency: &DependencyDefinition,
    platform: &PlatformVersion,
) -> Result<(String, BTreeSet<String>), ResolutionError> {
    let repositories = repositories_for(manifest, dependency, platform)?;
    let managed = managed_dependencies(
        resolver,
        manifest,
        &dependency.boms,
        platform,
        &repositories,
    )?;
    let version = resolve_version(
        &dependency.group,
        &dependency.artifact,
        dependency.version.as_deref(),
        &managed,
    )
    .ok_or_else(|| ResolutionError::VersionNotFound {
        coordinate: format!("{}:{}", dependency.group, dependency.artifact),
    })?
    .to_string();
    let artifacts = resolve_graph(
        resolver,
        &dependency.group,
        &dependency.artifact,
        &version,
        &repositories,
        &managed,
    )?;
    Ok((version, artifacts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::testing::FakeResolver;
    use pretty_assertions::assert_eq;

    const BOM_POM: &str = r#"<project>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-dependencies</artifactId>
        <version>3.2.0</version>
        <packaging>pom</packaging>
        <dependencyManagement><dependencies>
            <dependency>
                <groupId>org.springframework.boot</groupId>
                <artifactId>spring-boot-starter-web</artifactId>
                <version>3.2.0</version>
            </dependency>
        </dependencies></dependencyManagement>
    </project>"#;

    const WEB_STARTER_POM: &str = r#"<project>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-starter-web</artifactId>
        <version>3.2.0</version>
        <dependencies>
            <dependency>
                <groupId>org.springframework.boot</groupId>
                <artifactId>spring-boot-starter</artifactId>
                <version>3.2.0</version>
            </dependency>
        </dependencies>
    </project>"#;

    const STARTER_POM: &str = r#"<project>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-starter</artifactId>
        <version>3.2.0</version>
    </project>"#;

    fn manifest() -> Manifest {
        Manifest::from_toml_str(
            r#"
            platform = "3.2.0"

            [boms.spring-boot]
                group = "org.springframework.boot"
                artifact = "spring-boot-dependencies"
                version = "{platform}"

            [dependencies.web]
                group = "org.springframework.boot"
                artifact = "spring-boot-starter-web"
                boms = ["spring-boot"]
                starter = true

            [known-bad]
                coordinates = ["com.example:broken:1.0.0"]
            "#,
        )
        .unwrap()
    }

    fn resolver() -> FakeResolver {
        FakeResolver::new()
            .with_pom(
                "org.springframework.boot:spring-boot-dependencies:3.2.0",
                BOM_POM,
            )
            .with_pom(
                "org.springframework.boot:spring-boot-starter-web:3.2.0",
                WEB_STARTER_POM,
            )
            .with_pom(
                "org.springframework.boot:spring-boot-starter:3.2.0",
                STARTER_POM,
            )
    }

    #[test]
    fn bom_managed_version_resolves_end_to_end() {
        let manifest = manifest();
        let platform = manifest.platform_version(None).unwrap();
        let dependency = manifest.dependency("web").unwrap();

        let (version, artifacts) =
            resolve_dependency(&resolver(), &manifest, dependency, &platform).unwrap();
        assert_eq!(version, "3.2.0");
        assert!(artifacts.contains(STARTER_ARTIFACT));
    }

    #[test]
    fn starter_with_starter_in_graph_is_ok() {
        let manifest = manifest();
        let platform = manifest.platform_version(None).unwrap();
        let dependency = manifest.dependency("web").unwrap();

        let outcome = verify_dependency(&resolver(), &manifest, dependency, &platform);
        assert!(matches!(outcome, Outcome::Resolved { ref version, .. } if version == "3.2.0"));
        assert!(!outcome.is_defect());
    }

    #[test]
    fn starter_without_starter_in_graph_is_a_defect() {
        let resolver = FakeResolver::new()
            .with_pom(
                "org.springframework.boot:spring-boot-dependencies:3.2.0",
                BOM_POM,
            )
            .with_pom(
                "org.springframework.boot:spring-boot-starter-web:3.2.0",
                r#"<project>
                    <groupId>org.springframework.boot</groupId>
                    <artifactId>spring-boot-starter-web</artifactId>
                    <version>3.2.0</version>
                </project>"#,
            );

        let manifest = manifest();
        let platform = manifest.platform_version(None).unwrap();
        let dependency = manifest.dependency("web").unwrap();

        let outcome = verify_dependency(&resolver, &manifest, dependency, &platform);
        assert_eq!(
            outcome,
            Outcome::MissingStarter {
                version: "3.2.0".to_string()
            }
        );
        assert!(outcome.is_defect());
    }

    #[test]
    fn known_bad_failures_become_no_result() {
        let manifest = Manifest::from_toml_str(
            r#"
            platform = "3.2.0"

            [dependencies.broken]
                group = "com.example"
                artifact = "broken"
                version = "1.0.0"

            [known-bad]
                coordinates = ["com.example:broken:1.0.0"]
            "#,
        )
        .unwrap();
        let platform = manifest.platform_version(None).unwrap();
        let dependency = manifest.dependency("broken").unwrap();

        let outcome = verify_dependency(&FakeResolver::new(), &manifest, dependency, &platform);
        assert_eq!(
            outcome,
            Outcome::KnownBad {
                coordinate: "com.example:broken:1.0.0".to_string()
            }
        );
        assert!(!outcome.is_defect());
    }

    #[test]
    fn unlisted_failures_propagate_as_defects() {
        let manifest = Manifest::from_toml_str(
            r#"
            platform = "3.2.0"

            [dependencies.ghost]
                group = "com.example"
                artifact = "ghost"
                version = "1.0.0"
            "#,
        )
        .unwrap();
        let platform = manifest.platform_version(None).unwrap();
        let dependency = manifest.dependency("ghost").unwrap();

        let outcome = verify_dependency(&FakeResolver::new(), &manifest, dependency, &platform);
        assert!(matches!(outcome, Outcome::Failed { ref reason } if reason.contains("com.example:ghost:1.0.0")));
        assert!(outcome.is_defect());
    }

    #[test]
    fn missing_version_is_reported_not_panicked() {
        let manifest = Manifest::from_toml_str(
            r#"
            platform = "3.2.0"

            [dependencies.unmanaged]
                group = "com.example"
                artifact = "unmanaged"
            "#,
        )
        .unwrap();
        let platform = manifest.platform_version(None).unwrap();
        let dependency = manifest.dependency("unmanaged").unwrap();

        let outcome = verify_dependency(&FakeResolver::new(), &manifest, dependency, &platform);
        assert!(matches!(outcome, Outcome::Failed { ref reason } if reason.contains("no version")));
    }

    #[test]
    fn empty_manifest_verifies_clean() {
        let scratch = tempfile::tempdir().unwrap();
        let report = verify(
            &Manifest::default(),
            &"3.2.0".parse().unwrap(),
            scratch.path(),
            Arc::new(ResolutionCache::new()),
            4,
            Duration::from_secs(1),
        );
        assert!(!report.has_defects());
        assert!(report.dependencies.is_empty());
    }

    #[test]
    fn scratch_directories_are_disposed_after_a_run() {
        let scratch = tempfile::tempdir().unwrap();
        // Resolution fails (no repositories will have this artifact), but the
        // run itself completes and cleans up its scratch directories.
        let manifest = Manifest::from_toml_str(
            r#"
            [dependencies.unmanaged]
                group = "com.example"
                artifact = "unmanaged"
            "#,
        )
        .unwrap();
        let report = verify(
            &manifest,
            &"3.2.0".parse().unwrap(),
            scratch.path(),
            Arc::new(ResolutionCache::new()),
            2,
            Duration::from_secs(1),
        );
        assert_eq!(report.dependencies.len(), 1);
        assert!(!scratch.path().join("scratch-0").exists());
    }
}
