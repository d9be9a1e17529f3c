use log::{error, info, warn};

use crate::{
    cache::{HttpPomCache, ResolutionCache},
    model::{
        manifest::{DependencyDefinition, Manifest},
        maven::Coordinate,
    },
    resolver::{channel_repositories, CachedDescriptorResolver},
    verify::{self, Outcome},
};
use std::{error::Error, path::Path, time::Duration};

/// Handler to verify command
pub fn do_verify(
    root: &Path,
    manifest_file_name: &Path,
    cache_directory: &Path,
    platform: Option<&str>,
    threads: usize,
    timeout: Duration,
) -> Result<(), Box<dyn Error>> {
    let manifest = Manifest::from_file(&root.join(manifest_file_name))?;
    let platform = manifest.platform_version(platform)?;

    info!(
        "Verifying {} dependencies against platform {platform}",
        manifest.dependencies.len()
    );
    let report = verify::verify(
        &manifest,
        &platform,
        cache_directory,
        ResolutionCache::shared(),
        threads,
        timeout,
    );

    for dependency in &report.dependencies {
        match &dependency.outcome {
            Outcome::Resolved { version, artifacts } => {
                info!(
                    "{}: resolved {version} with {} artifacts",
                    dependency.id,
                    artifacts.len()
                );
            }
            Outcome::KnownBad { coordinate } => {
                warn!("{}: skipped known-bad {coordinate}", dependency.id);
            }
            Outcome::MissingStarter { version } => {
                error!(
                    "{}: {version} does not pull in {}",
                    dependency.id,
                    verify::STARTER_ARTIFACT
                );
            }
            Outcome::Failed { reason } => error!("{}: {reason}", dependency.id),
        }
    }

    let defects = report.defects().count();
    if defects > 0 {
        return Err(format!(
            "{defects} of {} dependencies failed verification",
            report.dependencies.len()
        )
        .into());
    }
    Ok(())
}

/// Handler to resolve command
pub fn do_resolve(
    root: &Path,
    manifest_file_name: &Path,
    cache_directory: &Path,
    dependency_id: &str,
    platform: Option<&str>,
    timeout: Duration,
) -> Result<(), Box<dyn Error>> {
    let manifest = Manifest::from_file(&root.join(manifest_file_name))?;
    let platform = manifest.platform_version(platform)?;
    // A manifest id, or an ad-hoc coordinate resolved against every
    // manifest BOM.
    let ad_hoc;
    let dependency = match manifest.dependency(dependency_id) {
        Some(dependency) => dependency,
        None => {
            let coordinate: Coordinate = dependency_id.parse().map_err(|_| {
                format!("`{dependency_id}` is neither a manifest dependency id nor a coordinate")
            })?;
            ad_hoc = DependencyDefinition {
                group: coordinate.group_id,
                artifact: coordinate.artifact_id,
                version: coordinate.version,
                boms: manifest.boms.keys().cloned().collect(),
                repository: None,
                starter: false,
            };
            &ad_hoc
        }
    };

    let http = HttpPomCache::new(cache_directory.to_path_buf(), timeout)?;
    let resolver = CachedDescriptorResolver::new(http, ResolutionCache::shared());
    let (version, artifacts) =
        verify::resolve_dependency(&resolver, &manifest, dependency, &platform)?;

    println!(
        "{}:{}:{version}",
        dependency.group, dependency.artifact
    );
    for artifact in &artifacts {
        println!("  {artifact}");
    }
    Ok(())
}

/// Handler to repositories command
pub fn do_repositories(
    root: &Path,
    manifest_file_name: &Path,
    platform: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let manifest = Manifest::from_file(&root.join(manifest_file_name))?;
    let platform = manifest.platform_version(platform)?;

    for repository in channel_repositories(&platform) {
        println!("{repository}");
    }
    Ok(())
}

pub fn do_clear_cache(cache_directory: &Path) -> Result<(), Box<dyn Error>> {
    if cache_directory.exists() {
        info!("Clearing bomvet POM cache {}.", cache_directory.display());
        std::fs::remove_dir_all(cache_directory)?;
    }
    Ok(())
}
