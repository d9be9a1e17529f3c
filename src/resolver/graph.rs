use std::collections::{BTreeSet, HashSet, VecDeque};

use log::trace;

use crate::model::maven::{ManagedDependency, Repository};

use super::{resolve_version, DescriptorResolver, ResolutionError};

/// Resolves the compile+runtime transitive closure of an artifact, returning
/// the `groupId:artifactId` identity of every artifact in the graph. Versions
/// missing from a descriptor fall back to the descriptor's own dependency
/// management, then to the request's managed list.
pub fn resolve_graph<R: DescriptorResolver>(
    resolver: &R,
    group_id: &str,
    artifact_id: &str,
    version: &str,
    repositories: &[Repository],
    managed: &[ManagedDependency],
) -> Result<BTreeSet<String>, ResolutionError> {
    let mut artifacts = BTreeSet::new();
    let mut visited: HashSet<(String, String)> = HashSet::new();
    let mut queue = VecDeque::from([(
        group_id.to_string(),
        artifact_id.to_string(),
        version.to_string(),
    )]);

    while let Some((group_id, artifact_id, version)) = queue.pop_front() {
        // Breadth-first, so on a version conflict the declaration nearest to
        // the root wins, like Maven's nearest-definition rule.
        if !visited.insert((group_id.clone(), artifact_id.clone())) {
            continue;
        }
        artifacts.insert(format!("{group_id}:{artifact_id}"));

        let pom = resolver.descriptor(&group_id, &artifact_id, &version, repositories)?;
        for dependency in pom.classpath_dependencies() {
            let version = match &dependency.version {
                Some(version) => version.clone(),
                None => pom
                    .managed_version(&dependency.group_id, &dependency.artifact_id)
                    .or_else(|| {
                        resolve_version(&dependency.group_id, &dependency.artifact_id, None, managed)
                            .map(str::to_string)
                    })
                    .ok_or_else(|| ResolutionError::VersionNotFound {
                        coordinate: format!("{}:{}", dependency.group_id, dependency.artifact_id),
                    })?,
            };
            trace!(
                "{group_id}:{artifact_id} pulls in {}:{}:{version}",
                dependency.group_id,
                dependency.artifact_id
            );
            queue.push_back((dependency.group_id, dependency.artifact_id, version));
        }
    }

    Ok(artifacts)
}
