use std::sync::Arc;

use crate::{cache::HttpPomCache, model::maven::Repository, pom::Pom};

use super::{DescriptorResolver, ResolutionError};

impl DescriptorResolver for HttpPomCache {
    fn descriptor(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        repositories: &[Repository],
    ) -> Result<Arc<Pom>, ResolutionError> {
        let coordinate = format!("{group_id}:{artifact_id}:{version}");
        let xml = self
            .fetch_pom(group_id, artifact_id, version, repositories)
            .map_err(|source| ResolutionError::Descriptor {
                coordinate: coordinate.clone(),
                source,
            })?;
        let pom = Pom::parse(&xml)
            .map_err(|source| ResolutionError::MalformedDescriptor { coordinate, source })?;
        Ok(Arc::new(pom))
    }
}
