use log::debug;

use crate::model::{
    manifest::{DependencyDefinition, Manifest},
    maven::{PlatformVersion, ReleaseChannel, Repository},
};

use super::{bom::bom_chain, ResolutionError};

/// Spring Boot 4 milestones are published to Maven central, so the
/// milestones repository stops being added from that generation on.
const MILESTONES_ON_CENTRAL_FROM_MAJOR: u32 = 4;

/// The repositories to consult for a dependency: central, then the
/// dependency's own repository, then the repositories of its BOM chain, then
/// whatever the platform's release channel implies. Ids are de-duplicated,
/// first write wins.
pub fn repositories_for(
    manifest: &Manifest,
    dependency: &DependencyDefinition,
    platform: &PlatformVersion,
) -> Result<Vec<Repository>, ResolutionError> {
    let mut repositories = vec![Repository::central()];

    if let Some(id) = &dependency.repository {
        insert(&mut repositories, lookup(manifest, id)?);
    }
    for bom in bom_chain(manifest, &dependency.boms)? {
        for id in &bom.repositories {
            insert(&mut repositories, lookup(manifest, id)?);
        }
    }
    for repository in channel_repositories(platform) {
        insert(&mut repositories, repository);
    }

    Ok(repositories)
}

/// The repositories implied by the platform version alone: central plus the
/// milestone/snapshot repositories of its release channel.
pub fn channel_repositories(platform: &PlatformVersion) -> Vec<Repository> {
    let mut repositories = vec![Repository::central()];
    let milestones_on_central = platform.major >= MILESTONES_ON_CENTRAL_FROM_MAJOR;
    match platform.release_channel() {
        ReleaseChannel::Ga => {}
        ReleaseChannel::Milestone => {
            if milestones_on_central {
                debug!("Milestones for {platform} are expected on central");
            } else {
                repositories.push(Repository::spring_milestones());
            }
        }
        ReleaseChannel::Snapshot => {
            // Maintenance lines no longer publish milestones.
            if !milestones_on_central && !platform.is_maintenance_release() {
                repositories.push(Repository::spring_milestones());
            }
            repositories.push(Repository::spring_snapshots());
        }
    }
    repositories
}

fn lookup(manifest: &Manifest, id: &str) -> Result<Repository, ResolutionError> {
    manifest
        .repository(id)
        .ok_or_else(|| ResolutionError::UnknownRepository(id.to_string()))
}

fn insert(repositories: &mut Vec<Repository>, repository: Repository) {
    if repositories.iter().all(|known| known.id != repository.id) {
        repositories.push(repository);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(repositories: &[Repository]) -> Vec<&str> {
        repositories
            .iter()
            .map(|repository| repository.id.as_str())
            .collect()
    }

    fn dependency(repository: Option<&str>, boms: &[&str]) -> DependencyDefinition {
        DependencyDefinition {
            group: "org.springframework.boot".to_string(),
            artifact: "spring-boot-starter-web".to_string(),
            version: None,
            boms: boms.iter().map(|id| id.to_string()).collect(),
            repository: repository.map(str::to_string),
            starter: false,
        }
    }

    fn platform(value: &str) -> PlatformVersion {
        value.parse().unwrap()
    }

    #[test]
    fn ga_release_only_uses_central() {
        for value in ["3.2.0", "2.7.18.RELEASE"] {
            assert_eq!(ids(&channel_repositories(&platform(value))), vec!["central"]);
        }
    }

    #[test]
    fn milestone_adds_the_milestones_repository() {
        assert_eq!(
            ids(&channel_repositories(&platform("3.2.0-M1"))),
            vec!["central", "spring-milestones"]
        );
        assert_eq!(
            ids(&channel_repositories(&platform("3.2.0-RC1"))),
            vec!["central", "spring-milestones"]
        );
    }

    #[test]
    fn milestones_move_to_central_for_the_next_generation() {
        assert_eq!(ids(&channel_repositories(&platform("4.0.0-M1"))), vec!["central"]);
        assert_eq!(
            ids(&channel_repositories(&platform("4.0.0-SNAPSHOT"))),
            vec!["central", "spring-snapshots"]
        );
    }

    #[test]
    fn snapshot_adds_milestones_and_snapshots() {
        assert_eq!(
            ids(&channel_repositories(&platform("3.2.0-SNAPSHOT"))),
            vec!["central", "spring-milestones", "spring-snapshots"]
        );
    }

    #[test]
    fn maintenance_snapshot_skips_milestones() {
        assert_eq!(
            ids(&channel_repositories(&platform("3.2.1-SNAPSHOT"))),
            vec!["central", "spring-snapshots"]
        );
    }

    #[test]
    fn dependency_repository_comes_before_channel_repositories() {
        let manifest = Manifest::from_toml_str(
            r#"
            [repositories.company]
                url = "https://repo.example.com/releases"
            "#,
        )
        .unwrap();

        let repositories = repositories_for(
            &manifest,
            &dependency(Some("company"), &[]),
            &platform("3.2.0-M1"),
        )
        .unwrap();
        assert_eq!(ids(&repositories), vec!["central", "company", "spring-milestones"]);
    }

    #[test]
    fn bom_repositories_are_collected_across_the_chain() {
        let manifest = Manifest::from_toml_str(
            r#"
            [boms.spring-cloud]
                group = "org.springframework.cloud"
                artifact = "spring-cloud-dependencies"
                version = "2023.0.0"
                repositories = ["spring-milestones"]
                additional = ["spring-boot"]

            [boms.spring-boot]
                group = "org.springframework.boot"
                artifact = "spring-boot-dependencies"
                version = "{platform}"
                repositories = ["spring-snapshots"]
            "#,
        )
        .unwrap();

        let repositories = repositories_for(
            &manifest,
            &dependency(None, &["spring-cloud"]),
            &platform("3.2.0"),
        )
        .unwrap();
        // The chain expands additional BOMs first, and duplicates keep their
        // first position.
        assert_eq!(
            ids(&repositories),
            vec!["central", "spring-snapshots", "spring-milestones"]
        );
    }

    #[test]
    fn unknown_repository_id_fails() {
        let manifest = Manifest::default();
        let error = repositories_for(
            &manifest,
            &dependency(Some("nowhere"), &[]),
            &platform("3.2.0"),
        )
        .unwrap_err();
        assert!(matches!(error, ResolutionError::UnknownRepository(id) if id == "nowhere"));
    }
}
