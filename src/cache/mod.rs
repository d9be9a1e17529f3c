mod http;

pub use http::{CacheError, HttpPomCache};

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::pom::Pom;

/// Process-wide memo of parsed descriptors keyed by
/// `groupId:artifactId:version`. Entries are never evicted; a coordinate
/// always resolves to the same descriptor within a process lifetime.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    poms: DashMap<String, Arc<Pom>>,
}

impl ResolutionCache {
    pub fn new() -> ResolutionCache {
        ResolutionCache::default()
    }

    /// The cache shared by every resolver in this process.
    pub fn shared() -> Arc<ResolutionCache> {
        static SHARED: OnceLock<Arc<ResolutionCache>> = OnceLock::new();
        SHARED
            .get_or_init(|| Arc::new(ResolutionCache::new()))
            .clone()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Pom>> {
        self.poms.get(key).map(|entry| entry.value().clone())
    }

    /// Stores a descriptor unless one is already present, returning the
    /// retained value. Concurrent computations for the same key may race;
    /// the first write wins and all callers observe that value.
    pub fn insert_if_absent(&self, key: String, pom: Arc<Pom>) -> Arc<Pom> {
        self.poms.entry(key).or_insert(pom).value().clone()
    }

    pub fn len(&self) -> usize {
        self.poms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pom(artifact_id: &str) -> Arc<Pom> {
        Arc::new(
            Pom::parse(&format!(
                "<project><groupId>com.example</groupId>\
                 <artifactId>{artifact_id}</artifactId>\
                 <version>1.0.0</version></project>"
            ))
            .unwrap(),
        )
    }

    #[test]
    fn first_write_wins() {
        let cache = ResolutionCache::new();
        let first = pom("demo");
        let second = pom("demo");

        let retained = cache.insert_if_absent("com.example:demo:1.0.0".to_string(), first.clone());
        assert!(Arc::ptr_eq(&retained, &first));

        let retained = cache.insert_if_absent("com.example:demo:1.0.0".to_string(), second);
        assert!(Arc::ptr_eq(&retained, &first));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_returns_retained_value() {
        let cache = ResolutionCache::new();
        assert_eq!(cache.get("com.example:demo:1.0.0"), None);

        let stored = pom("demo");
        cache.insert_if_absent("com.example:demo:1.0.0".to_string(), stored.clone());
        let loaded = cache.get("com.example:demo:1.0.0").unwrap();
        assert!(Arc::ptr_eq(&loaded, &stored));
    }
}
