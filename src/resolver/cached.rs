use std::sync::Arc;

use log::trace;

use crate::{cache::ResolutionCache, model::maven::Repository, pom::Pom};

use super::{DescriptorResolver, ResolutionError};

/// Memoizes descriptor reads in a shared process-wide cache so repeated
/// resolutions of the same coordinate skip the network.
pub struct CachedDescriptorResolver<R> {
    inner: R,
    cache: Arc<ResolutionCache>,
}

impl<R> CachedDescriptorResolver<R> {
    pub fn new(inner: R, cache: Arc<ResolutionCache>) -> Self {
        Self { inner, cache }
    }
}

impl<R> DescriptorResolver for CachedDescriptorResolver<R>
where
    R: DescriptorResolver,
{
    fn descriptor(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        repositories: &[Repository],
    ) -> Result<Arc<Pom>, ResolutionError> {
        let key = format!("{group_id}:{artifact_id}:{version}");
        if let Some(pom) = self.cache.get(&key) {
            trace!("Descriptor of {key} served from the resolution cache");
            return Ok(pom);
        }
        let pom = self
            .inner
            .descriptor(group_id, artifact_id, version, repositories)?;
        Ok(self.cache.insert_if_absent(key, pom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::testing::FakeResolver;
    use pretty_assertions::assert_eq;

    fn fake() -> FakeResolver {
        FakeResolver::new().with_pom(
            "com.example:demo:1.0.0",
            "<project><groupId>com.example</groupId>\
             <artifactId>demo</artifactId>\
             <version>1.0.0</version></project>",
        )
    }

    #[test]
    fn repeated_reads_hit_the_source_once() {
        let resolver = CachedDescriptorResolver::new(fake(), Arc::new(ResolutionCache::new()));

        let first = resolver
            .descriptor("com.example", "demo", "1.0.0", &[])
            .unwrap();
        let second = resolver
            .descriptor("com.example", "demo", "1.0.0", &[])
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.inner.calls(), 1);
    }

    #[test]
    fn the_cache_is_shared_between_resolvers() {
        let cache = Arc::new(ResolutionCache::new());
        let first = CachedDescriptorResolver::new(fake(), cache.clone());
        // The second resolver's source is empty: a miss would fail.
        let second = CachedDescriptorResolver::new(FakeResolver::new(), cache);

        first
            .descriptor("com.example", "demo", "1.0.0", &[])
            .unwrap();
        let pom = second
            .descriptor("com.example", "demo", "1.0.0", &[])
            .unwrap();
        assert_eq!(pom.artifact_id, "demo");
        assert_eq!(second.inner.calls(), 0);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = Arc::new(ResolutionCache::new());
        let resolver = CachedDescriptorResolver::new(FakeResolver::new(), cache.clone());

        assert!(resolver.descriptor("com.example", "demo", "1.0.0", &[]).is_err());
        assert!(cache.is_empty());
    }
}
