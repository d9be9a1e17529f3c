use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::{
    cache::CacheError,
    model::maven::Repository,
    pom::Pom,
};

use super::{DescriptorResolver, ResolutionError};

/// An in-memory descriptor source for tests, counting how many reads reach
/// it so caching behavior can be asserted.
#[derive(Default)]
pub struct FakeResolver {
    poms: HashMap<String, Arc<Pom>>,
    calls: AtomicUsize,
}

impl FakeResolver {
    pub fn new() -> FakeResolver {
        FakeResolver::default()
    }

    pub fn with_pom(mut self, coordinate: &str, xml: &str) -> FakeResolver {
        let pom = Pom::parse(xml).expect("test POM should parse");
        self.poms.insert(coordinate.to_string(), Arc::new(pom));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DescriptorResolver for FakeResolver {
    fn descriptor(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        _repositories: &[Repository],
    ) -> Result<Arc<Pom>, ResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let coordinate = format!("{group_id}:{artifact_id}:{version}");
        self.poms
            .get(&coordinate)
            .cloned()
            .ok_or_else(|| ResolutionError::Descriptor {
                coordinate: coordinate.clone(),
                source: CacheError::NotFound {
                    coordinate,
                    repositories: "fake".to_string(),
                },
            })
    }
}
