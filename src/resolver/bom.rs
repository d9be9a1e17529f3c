use std::collections::HashSet;

use log::debug;

use crate::model::{
    manifest::{BomDefinition, Manifest},
    maven::{ManagedDependency, PlatformVersion, Repository},
};

use super::{DescriptorResolver, ResolutionError};

/// Expands BOM ids into the flattened definition chain. A BOM's additional
/// BOMs are expanded depth-first, in declared order, before the BOM itself,
/// and the whole chain of an earlier id comes before the next top-level id.
/// Ids already expanded are skipped, which also makes cycles harmless.
pub fn bom_chain<'a>(
    manifest: &'a Manifest,
    ids: &[String],
) -> Result<Vec<&'a BomDefinition>, ResolutionError> {
    fn go<'a>(
        manifest: &'a Manifest,
        ids: &[String],
        seen: &mut HashSet<String>,
        chain: &mut Vec<&'a BomDefinition>,
    ) -> Result<(), ResolutionError> {
        for id in ids {
            if !seen.insert(id.clone()) {
                continue;
            }
            let bom = manifest
                .bom(id)
                .ok_or_else(|| ResolutionError::UnknownBom(id.clone()))?;
            go(manifest, &bom.additional, seen, chain)?;
            chain.push(bom);
        }
        Ok(())
    }

    let mut chain = Vec::new();
    go(manifest, ids, &mut HashSet::new(), &mut chain)?;
    Ok(chain)
}

/// The flattened managed-dependency list of a BOM chain. Entries keep chain
/// order, so the first-match rule downstream gives earlier BOMs precedence.
pub fn managed_dependencies<R: DescriptorResolver>(
    resolver: &R,
    manifest: &Manifest,
    ids: &[String],
    platform: &PlatformVersion,
    repositories: &[Repository],
) -> Result<Vec<ManagedDependency>, ResolutionError> {
    let mut managed = Vec::new();
    for bom in bom_chain(manifest, ids)? {
        let version = bom.resolve_version(platform);
        debug!(
            "Reading managed dependencies of {}:{}:{version}",
            bom.group, bom.artifact
        );
        let pom = resolver.descriptor(&bom.group, &bom.artifact, &version, repositories)?;
        managed.extend(pom.managed_dependencies());
    }
    Ok(managed)
}
