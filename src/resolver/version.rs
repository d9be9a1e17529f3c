use crate::model::maven::ManagedDependency;

/// Picks the concrete version for a coordinate. An explicit version always
/// wins; otherwise the first matching managed entry decides, which is what
/// makes earlier BOMs take precedence over later ones.
pub fn resolve_version<'a>(
    group_id: &str,
    artifact_id: &str,
    explicit: Option<&'a str>,
    managed: &'a [ManagedDependency],
) -> Option<&'a str> {
    if let Some(version) = explicit {
        return Some(version);
    }
    managed
        .iter()
        .find(|entry| entry.matches(group_id, artifact_id))
        .map(|entry| entry.version.as_str())
}
