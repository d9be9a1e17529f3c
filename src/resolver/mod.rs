mod bom;
mod cached;
mod graph;
mod http;
mod repositories;
mod version;

#[cfg(test)]
pub(crate) mod testing;

pub use bom::{bom_chain, managed_dependencies};
pub use cached::CachedDescriptorResolver;
pub use graph::resolve_graph;
pub use repositories::{channel_repositories, repositories_for};
pub use version::resolve_version;

use std::sync::Arc;

use thiserror::Error;

use crate::{
    cache::CacheError,
    model::maven::Repository,
    pom::{Pom, PomError},
};

/// Reads the artifact descriptor (POM) for a concrete coordinate.
pub trait DescriptorResolver {
    fn descriptor(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        repositories: &[Repository],
    ) -> Result<Arc<Pom>, ResolutionError>;
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("could not read the descriptor of {coordinate}: {source}")]
    Descriptor {
        coordinate: String,
        #[source]
        source: CacheError,
    },
    #[error("malformed POM for {coordinate}: {source}")]
    MalformedDescriptor {
        coordinate: String,
        #[source]
        source: PomError,
    },
    #[error("no version for {coordinate}: none given explicitly and none managed by the configured BOMs")]
    VersionNotFound { coordinate: String },
    #[error("unknown BOM id `{0}`")]
    UnknownBom(String),
    #[error("unknown repository id `{0}`")]
    UnknownRepository(String),
}

impl ResolutionError {
    /// The coordinate this failure is about, used to match the known-bad
    /// allow-list. Configuration errors have no offending coordinate.
    pub fn offending_coordinate(&self) -> Option<&str> {
        match self {
            ResolutionError::Descriptor { coordinate, .. } => Some(coordinate),
            ResolutionError::MalformedDescriptor { coordinate, .. } => Some(coordinate),
            ResolutionError::VersionNotFound { coordinate } => Some(coordinate),
            ResolutionError::UnknownBom(_) | ResolutionError::UnknownRepository(_) => None,
        }
    }
}
