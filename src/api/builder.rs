use std::{env, error::Error, path::PathBuf, time::Duration};

use home::home_dir;

use crate::Bomvet;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct BomvetBuilder {
    // All other paths are relative to `root`
    root: Option<PathBuf>,
    manifest_file_name: Option<PathBuf>,
    cache_directory_path: Option<PathBuf>,
    http_timeout: Option<Duration>,
}

impl BomvetBuilder {
    /// Project root directory.
    ///
    /// Defaults to the current directory.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Name of the bomvet manifest toml file.
    ///
    /// Defaults to `bomvet.toml`.
    pub fn manifest_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_file_name = Some(path.into());
        self
    }

    /// Location of the bomvet POM cache directory.
    ///
    /// Defaults to `$HOME/.bomvet/cache`.
    pub fn cache_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_directory_path = Some(path.into());
        self
    }

    /// Timeout applied to each repository HTTP request.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    pub fn try_build(self) -> Result<Bomvet, Box<dyn Error>> {
        let Self {
            root,
            manifest_file_name,
            cache_directory_path,
            http_timeout,
        } = self;
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let manifest_file_name = manifest_file_name.unwrap_or_else(|| PathBuf::from("bomvet.toml"));

        let cache_directory = root.join(cache_directory_path.unwrap_or_else(default_cache_directory));

        let http_timeout = http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT);

        Ok(Bomvet {
            root,
            manifest_file_name,
            cache_directory,
            http_timeout,
        })
    }
}

fn default_cache_directory() -> PathBuf {
    let mut cache_directory =
        home_dir().expect("Could not find home dir. Please define $HOME env variable.");
    cache_directory.push(".bomvet/cache");
    cache_directory
}
