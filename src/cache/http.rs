use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use log::{debug, trace};
use reqwest::{blocking::Client, StatusCode};
use thiserror::Error;

use crate::{flock::FileLock, model::maven::Repository};

const LOCK_FILE_NAME: &str = ".lock";

/// A local repository of fetched POM documents. Only descriptors are ever
/// downloaded, never jar payloads: the use case is dependency-graph
/// verification, not compilation.
pub struct HttpPomCache {
    location: PathBuf,
    client: Client,
    _lock: FileLock,
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{coordinate} was not found in any configured repository ({repositories})")]
    NotFound {
        coordinate: String,
        repositories: String,
    },
    #[error("unexpected status {status} fetching {url}")]
    Status { status: StatusCode, url: String },
    #[error("cache location {location} is not a directory")]
    BadLocation { location: String },
    #[error("cache lock cannot be acquired")]
    Lock(#[from] crate::flock::Error),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

impl HttpPomCache {
    pub fn new(location: PathBuf, timeout: Duration) -> Result<HttpPomCache, CacheError> {
        if location.exists() {
            if !location.is_dir() {
                return Err(CacheError::BadLocation {
                    location: location.to_str().unwrap_or("").to_string(),
                });
            }
        } else {
            fs::create_dir_all(&location)?;
        }

        let lock = Self::acquire_lock(&location)?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bomvet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpPomCache {
            location,
            client,
            _lock: lock,
        })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Reads the POM for a coordinate, consulting the repositories in order
    /// and keeping a local copy for later lookups. Snapshot versions are only
    /// requested from snapshot-enabled repositories.
    pub fn fetch_pom(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        repositories: &[Repository],
    ) -> Result<String, CacheError> {
        let relative = pom_relative_path(group_id, artifact_id, version);
        let local = self.location.join(&relative);
        if local.exists() {
            trace!("Serving {relative} from the local repository");
            return Ok(fs::read_to_string(local)?);
        }

        let coordinate = format!("{group_id}:{artifact_id}:{version}");
        for repository in repositories {
            if version.contains("SNAPSHOT") && !repository.snapshots_enabled {
                trace!("Skipping {repository}: snapshots are not enabled");
                continue;
            }
            let url = format!("{}/{relative}", repository.url.trim_end_matches('/'));
            debug!("Fetching {coordinate} from {url}");
            let response = self.client.get(&url).send()?;
            match response.status() {
                status if status.is_success() => {
                    let body = response.text()?;
                    if let Some(parent) = local.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&local, &body)?;
                    return Ok(body);
                }
                StatusCode::NOT_FOUND | StatusCode::GONE => {
                    trace!("{coordinate} is not in {}", repository.id);
                }
                status => return Err(CacheError::Status { status, url }),
            }
        }

        Err(CacheError::NotFound {
            coordinate,
            repositories: repositories
                .iter()
                .map(|repository| repository.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    fn acquire_lock(location: &Path) -> Result<FileLock, CacheError> {
        let location = location.join(LOCK_FILE_NAME);
        debug!(
            "Acquiring a lock on the cache location: {}",
            location.display()
        );
        let lock = FileLock::new(&location)?;
        trace!("Acquired a lock on the cache location");
        Ok(lock)
    }
}

fn pom_relative_path(group_id: &str, artifact_id: &str, version: &str) -> String {
    format!(
        "{}/{artifact_id}/{version}/{artifact_id}-{version}.pom",
        group_id.replace('.', "/")
    )
}
