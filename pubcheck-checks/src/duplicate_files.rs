//! Detection of files already published by another package.
//!
//! Every file in the package tree is searched by basename against every
//! configured repository; a result whose path matches the file's location
//! and whose owning package is not the package under validation means the
//! file is already shipped elsewhere. One request per file per repository,
//! so the CLI keeps this check opt-in.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use fs_err as fs;
use tracing::{debug, error, info};

use pubcheck_engine::Check;
use pubcheck_manifest::{MANIFEST_FILE_NAME, Package};
use pubcheck_registry::Registry;

use crate::files::find_files;
use crate::ports::SearchProvider;

pub struct DuplicateFilesCheck<'a> {
    pkg: &'a Package,
    registry: &'a Registry,
    search: &'a dyn SearchProvider,
    /// Item -> the qualified names of the packages already shipping it.
    matches: BTreeMap<Utf8PathBuf, Vec<String>>,
}

impl<'a> DuplicateFilesCheck<'a> {
    pub const NAME: &'static str = "duplicate-files";

    pub fn new(pkg: &'a Package, registry: &'a Registry, search: &'a dyn SearchProvider) -> Self {
        Self {
            pkg,
            registry,
            search,
            matches: BTreeMap::new(),
        }
    }
}

impl Check for DuplicateFilesCheck<'_> {
    type Item = Utf8PathBuf;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn items(&mut self) -> anyhow::Result<Vec<Utf8PathBuf>> {
        let files = find_files(self.pkg.root(), &["**/*"])?;
        Ok(files
            .into_iter()
            .filter(|f| f != MANIFEST_FILE_NAME)
            .collect())
    }

    fn validate(&mut self, item: &Utf8PathBuf) -> anyhow::Result<bool> {
        info!("checking {item}");
        let Some(basename) = item.file_name() else {
            return Ok(true);
        };
        let own = self.pkg.spec();
        let wire_path = format!("/{item}");

        let mut owners = Vec::new();
        for repository in self.registry.iter() {
            debug!(repository = %repository.name, "searching for '{basename}'");
            for candidate in self.search.search(basename, repository) {
                if candidate.path == wire_path && candidate.package_name() != own {
                    owners.push(candidate.name.clone());
                }
            }
        }

        if owners.is_empty() {
            Ok(true)
        } else {
            self.matches.insert(item.clone(), owners);
            Ok(false)
        }
    }

    fn show(&mut self, item: &Utf8PathBuf) {
        let owners = self
            .matches
            .get(item)
            .map(|o| o.join(", "))
            .unwrap_or_default();
        error!("{item} is already present in {owners}");
    }

    fn diff(&mut self, item: &Utf8PathBuf) {
        info!("{item} would be removed from the package");
    }

    fn fix(&mut self, item: &Utf8PathBuf) -> anyhow::Result<()> {
        fs::remove_file(self.pkg.root().join(item))?;
        info!("{item} has been removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubcheck_engine::{RunOptions, run_check};
    use pubcheck_types::{Candidate, Repository};

    struct StubSearch {
        results: Vec<Candidate>,
    }

    impl SearchProvider for StubSearch {
        fn search(&self, _term: &str, _repository: &Repository) -> Vec<Candidate> {
            self.results.clone()
        }
    }

    fn fixture() -> (tempfile::TempDir, Package, Registry) {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
        fs::write(
            root.join(MANIFEST_FILE_NAME),
            "name = \"gcc\"\ncategory = \"sys-devel\"\nversion = \"9.2.0\"\ndescription = \"The GNU compiler collection.\"\n",
        )
        .expect("write manifest");
        fs::create_dir_all(root.join("usr/bin")).expect("mkdir");
        fs::write(root.join("usr/bin/cc"), b"x").expect("write file");
        let pkg = Package::load(&root).expect("load package");
        let registry = Registry::new(vec![Repository::new("stable", "https://s.example.org")]);
        (dir, pkg, registry)
    }

    #[test]
    fn file_owned_by_another_package_fails_and_fix_removes_it() {
        let (_dir, pkg, registry) = fixture();
        let search = StubSearch {
            results: vec![Candidate {
                name: "stable::sys-devel/clang".to_string(),
                path: "/usr/bin/cc".to_string(),
                all_versions: true,
            }],
        };

        let mut check = DuplicateFilesCheck::new(&pkg, &registry, &search);
        let report =
            run_check(&mut check, RunOptions { diff: true, fix: true }).expect("run");
        assert!(!report.passed());
        assert_eq!(report.failures, vec!["usr/bin/cc"]);
        assert!(!pkg.root().join("usr/bin/cc").exists());
    }

    #[test]
    fn match_on_own_package_passes() {
        let (_dir, pkg, registry) = fixture();
        let search = StubSearch {
            results: vec![Candidate {
                name: "stable::sys-devel/gcc".to_string(),
                path: "/usr/bin/cc".to_string(),
                all_versions: true,
            }],
        };

        let mut check = DuplicateFilesCheck::new(&pkg, &registry, &search);
        let report = run_check(&mut check, RunOptions::default()).expect("run");
        assert!(report.passed());
    }

    #[test]
    fn path_mismatch_passes() {
        let (_dir, pkg, registry) = fixture();
        let search = StubSearch {
            results: vec![Candidate {
                name: "stable::sys-devel/clang".to_string(),
                path: "/usr/bin/other-cc".to_string(),
                all_versions: true,
            }],
        };

        let mut check = DuplicateFilesCheck::new(&pkg, &registry, &search);
        let report = run_check(&mut check, RunOptions::default()).expect("run");
        assert!(report.passed());
    }

    #[test]
    fn manifest_is_never_an_item() {
        let (_dir, pkg, registry) = fixture();
        let search = StubSearch { results: vec![] };
        let mut check = DuplicateFilesCheck::new(&pkg, &registry, &search);
        let items = check.items().expect("items");
        assert!(!items.iter().any(|i| i == MANIFEST_FILE_NAME));
        assert!(items.contains(&Utf8PathBuf::from("usr/bin/cc")));
    }
}
