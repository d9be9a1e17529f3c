use std::{error::Error, path::PathBuf, time::Duration};

use crate::cli::command_handlers::{do_clear_cache, do_repositories, do_resolve, do_verify};

mod builder;

pub use builder::BomvetBuilder;

pub struct Bomvet {
    root: PathBuf,
    manifest_file_name: PathBuf,
    cache_directory: PathBuf,
    http_timeout: Duration,
}

impl Bomvet {
    pub fn builder() -> BomvetBuilder {
        BomvetBuilder::default()
    }

    /// Verifies every dependency in the manifest against a platform version.
    /// Fails if any dependency has a resolution defect.
    pub fn verify(&self, platform: Option<&str>, threads: usize) -> Result<(), Box<dyn Error>> {
        do_verify(
            &self.root,
            &self.manifest_file_name,
            &self.cache_directory,
            platform,
            threads,
            self.http_timeout,
        )
    }

    /// Resolves one manifest dependency and prints its transitive artifacts.
    pub fn resolve(&self, dependency_id: &str, platform: Option<&str>) -> Result<(), Box<dyn Error>> {
        do_resolve(
            &self.root,
            &self.manifest_file_name,
            &self.cache_directory,
            dependency_id,
            platform,
            self.http_timeout,
        )
    }

    /// Prints the repositories resolution would consult for a platform.
    pub fn repositories(&self, platform: Option<&str>) -> Result<(), Box<dyn Error>> {
        do_repositories(&self.root, &self.manifest_file_name, platform)
    }

    pub fn clear_cache(&self) -> Result<(), Box<dyn Error>> {
        do_clear_cache(&self.cache_directory)
    }
}
