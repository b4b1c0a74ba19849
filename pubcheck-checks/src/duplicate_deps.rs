//! Duplicate-dependency detection and resolution.
//!
//! The manifest encoding keeps dependency keys unique, but the same package
//! can still be declared under more than one repository. Groups are built
//! per package name; a group spanning several repositories is a conflict,
//! resolved deterministically in favor of the repository that comes first
//! in the configured registry order.

use std::fmt;

use camino::Utf8Path;
use tracing::{error, info, warn};

use pubcheck_engine::Check;
use pubcheck_manifest::{MANIFEST_FILE_NAME, Package, render_patch};
use pubcheck_registry::Registry;
use pubcheck_types::{DepKey, Repository};

/// One package name and the repositories it is declared under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub package: String,
    pub repositories: Vec<String>,
}

impl fmt::Display for DuplicateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.package)
    }
}

pub struct DuplicateDepsCheck<'a> {
    pkg: &'a mut Package,
    registry: &'a Registry,
}

impl<'a> DuplicateDepsCheck<'a> {
    pub const NAME: &'static str = "duplicate-dependencies";

    pub fn new(pkg: &'a mut Package, registry: &'a Registry) -> Self {
        Self { pkg, registry }
    }

    /// The highest-priority configured repository in the group, or `None`
    /// when the group names only unconfigured repositories. Unconfigured
    /// members are warned about and excluded; they are never selected.
    fn winner(&self, group: &DuplicateGroup) -> Option<&'a Repository> {
        let registry = self.registry;
        for repo in &group.repositories {
            if !registry.contains(repo) {
                warn!("repository '{repo}' is not configured, skipping it");
            }
        }
        registry.first_of(group.repositories.iter().map(String::as_str))
    }
}

impl Check for DuplicateDepsCheck<'_> {
    type Item = DuplicateGroup;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn items(&mut self) -> anyhow::Result<Vec<DuplicateGroup>> {
        let mut groups: Vec<DuplicateGroup> = Vec::new();
        for (key, _) in self.pkg.manifest.dependencies() {
            match groups.iter().position(|g| g.package == key.name) {
                Some(i) => groups[i].repositories.push(key.repository),
                None => groups.push(DuplicateGroup {
                    package: key.name,
                    repositories: vec![key.repository],
                }),
            }
        }
        Ok(groups)
    }

    fn validate(&mut self, item: &DuplicateGroup) -> anyhow::Result<bool> {
        Ok(item.repositories.len() == 1)
    }

    fn show(&mut self, item: &DuplicateGroup) {
        error!(
            "'{}' is declared more than once: {}",
            item.package,
            item.repositories.join(", ")
        );
    }

    fn diff(&mut self, item: &DuplicateGroup) {
        let Some(winner) = self.winner(item) else {
            warn!(
                "none of the repositories declaring '{}' are configured; cannot pick one to keep",
                item.package
            );
            return;
        };
        info!(
            "the dependency on '{}' from '{}' will be kept, as it comes first in the registry",
            item.package, winner.name
        );

        let before = self.pkg.manifest.to_toml_string();
        let mut preview = self.pkg.manifest.clone();
        for repo in &item.repositories {
            if *repo != winner.name {
                preview.remove_dependency(&DepKey::new(repo.clone(), item.package.clone()));
            }
        }
        let patch = render_patch(
            Utf8Path::new(MANIFEST_FILE_NAME),
            &before,
            &preview.to_toml_string(),
        );
        info!("proposed manifest change:\n{patch}");
    }

    fn fix(&mut self, item: &DuplicateGroup) -> anyhow::Result<()> {
        let Some(winner) = self.winner(item) else {
            warn!(
                "none of the repositories declaring '{}' are configured; leaving it untouched",
                item.package
            );
            return Ok(());
        };

        for repo in &item.repositories {
            if *repo != winner.name {
                let key = DepKey::new(repo.clone(), item.package.clone());
                info!("removing dependency {key}");
                self.pkg.manifest.remove_dependency(&key);
            }
        }
        self.pkg.write_manifest()?;
        Ok(())
    }
}
