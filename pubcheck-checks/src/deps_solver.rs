//! Native-library dependency resolution.
//!
//! For every binary shipped by the package, every shared library it needs
//! must be provided by a declared manifest dependency. Libraries with no
//! matching declaration are looked up on the configured repositories in
//! priority order; an unambiguous single-candidate match is queued as a new
//! dependency and `fix` writes it into the manifest.

use std::collections::{BTreeMap, HashMap};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, error, info, warn};

use pubcheck_engine::Check;
use pubcheck_manifest::{MANIFEST_FILE_NAME, Package, render_patch};
use pubcheck_registry::Registry;
use pubcheck_types::{Candidate, DepKey};

use crate::files::find_files;
use crate::ports::{BinaryInspector, SearchProvider};

/// Candidate binaries: anything under the binary directories, plus shared
/// objects under the multilib library directories.
const BINARY_PATTERNS: &[&str] = &[
    "usr/bin/**/*",
    "usr/sbin/**/*",
    "usr/lib32/**/*.so",
    "usr/lib64/**/*.so",
];

/// Outcome of resolving one needed library, cached for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A declared dependency already provides the library.
    AlreadySatisfied,
    /// Exactly one repository candidate was accepted; the dependency key is
    /// queued for addition.
    Resolved(DepKey),
    /// Candidates were found but none could be accepted automatically.
    Ambiguous,
    /// No repository returned any candidate.
    Missing,
}

pub struct DepsSolverCheck<'a> {
    pkg: &'a mut Package,
    registry: &'a Registry,
    search: &'a dyn SearchProvider,
    inspector: &'a dyn BinaryInspector,

    /// Per-library resolution cache: a library needed by many binaries is
    /// searched at most once per run, whatever the outcome.
    already_solved: BTreeMap<String, Resolution>,
    /// Library -> every candidate any repository returned for it.
    missing_deps: BTreeMap<String, Vec<Candidate>>,
    /// Library -> accepted dependency key, pending addition by `fix`.
    new_deps: BTreeMap<String, DepKey>,
    /// Item -> the libraries it needs, recorded during `validate` for
    /// `show`/`diff`/`fix`.
    item_libs: HashMap<Utf8PathBuf, Vec<String>>,
}

impl<'a> DepsSolverCheck<'a> {
    pub const NAME: &'static str = "native-dependencies";

    pub fn new(
        pkg: &'a mut Package,
        registry: &'a Registry,
        search: &'a dyn SearchProvider,
        inspector: &'a dyn BinaryInspector,
    ) -> Self {
        Self {
            pkg,
            registry,
            search,
            inspector,
            already_solved: BTreeMap::new(),
            missing_deps: BTreeMap::new(),
            new_deps: BTreeMap::new(),
            item_libs: HashMap::new(),
        }
    }

    /// Every candidate found for `lib` so far, across repositories.
    pub fn candidates_for(&self, lib: &str) -> &[Candidate] {
        self.missing_deps.get(lib).map(Vec::as_slice).unwrap_or(&[])
    }

    fn resolve(&mut self, lib: &str) -> Resolution {
        if let Some(resolution) = self.already_solved.get(lib) {
            debug!("'{lib}' already handled this run: {resolution:?}");
            return resolution.clone();
        }

        // Reserve the cache slot before resolution completes, so the
        // library is searched at most once per run even when resolution
        // fails partway through.
        self.already_solved
            .insert(lib.to_string(), Resolution::Missing);
        let resolution = self.resolve_remotely(lib);
        self.already_solved
            .insert(lib.to_string(), resolution.clone());

        if let Resolution::Resolved(key) = &resolution {
            self.new_deps.insert(lib.to_string(), key.clone());
        }
        resolution
    }

    fn resolve_remotely(&mut self, lib: &str) -> Resolution {
        let registry = self.registry;
        let search = self.search;

        for repository in registry.iter() {
            info!(repository = %repository.name, "looking up '{lib}'");
            let candidates = search.search(lib, repository);
            if candidates.is_empty() {
                continue;
            }

            let found = self.missing_deps.entry(lib.to_string()).or_default();
            for candidate in &candidates {
                if !found.contains(candidate) {
                    found.push(candidate.clone());
                }
            }

            if candidates
                .iter()
                .any(|c| self.pkg.manifest.declares_package(c.package_name()))
            {
                return Resolution::AlreadySatisfied;
            }

            if let [only] = candidates.as_slice()
                && only.all_versions
            {
                let key = DepKey::new(&repository.name, only.package_name());
                return Resolution::Resolved(key);
            }

            // Several candidates, or a candidate that only matches some
            // versions: ambiguous for this repository. Later repositories
            // may still resolve it.
            debug!(
                repository = %repository.name,
                "'{lib}' is ambiguous here ({} candidate(s))",
                candidates.len()
            );
        }

        if self.missing_deps.get(lib).is_some_and(|c| !c.is_empty()) {
            Resolution::Ambiguous
        } else {
            Resolution::Missing
        }
    }

    /// Accepted resolutions relevant to `item` that the manifest does not
    /// declare yet.
    fn pending_additions(&self, item: &Utf8Path) -> Vec<DepKey> {
        let Some(libs) = self.item_libs.get(item) else {
            return Vec::new();
        };
        libs.iter()
            .filter_map(|lib| self.new_deps.get(lib))
            .filter(|key| !self.pkg.manifest.contains_dependency(key))
            .cloned()
            .collect()
    }
}

impl Check for DepsSolverCheck<'_> {
    type Item = Utf8PathBuf;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn items(&mut self) -> anyhow::Result<Vec<Utf8PathBuf>> {
        let root = self.pkg.root();
        let mut binaries = Vec::new();
        for candidate in find_files(root, BINARY_PATTERNS)? {
            if self.inspector.is_binary(&root.join(&candidate)) {
                binaries.push(candidate);
            }
        }
        Ok(binaries)
    }

    fn validate(&mut self, item: &Utf8PathBuf) -> anyhow::Result<bool> {
        info!("checking {item}");
        let libs = self.inspector.needed_libraries(&self.pkg.root().join(item))?;
        debug!("found needed libraries: {libs:?}");

        let mut satisfied = true;
        for lib in &libs {
            if self.resolve(lib) != Resolution::AlreadySatisfied {
                satisfied = false;
            }
        }
        self.item_libs.insert(item.clone(), libs);
        Ok(satisfied)
    }

    fn show(&mut self, item: &Utf8PathBuf) {
        error!("{item} needs libraries no declared dependency provides:");
        let Some(libs) = self.item_libs.get(item) else {
            return;
        };
        for lib in libs {
            match self.already_solved.get(lib) {
                None | Some(Resolution::AlreadySatisfied) => {}
                Some(Resolution::Resolved(key)) => {
                    info!("  {lib}: provided by '{key}', not declared yet");
                }
                Some(Resolution::Ambiguous) => {
                    let names: Vec<&str> = self
                        .candidates_for(lib)
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect();
                    warn!(
                        "  {lib}: several candidates, not picking one: {}",
                        names.join(", ")
                    );
                }
                Some(Resolution::Missing) => {
                    error!("  {lib}: no candidate found in any repository");
                }
            }
        }
    }

    fn diff(&mut self, item: &Utf8PathBuf) {
        let additions = self.pending_additions(item);
        if additions.is_empty() {
            info!("no automatic remediation available for {item}");
            return;
        }

        let before = self.pkg.manifest.to_toml_string();
        let mut preview = self.pkg.manifest.clone();
        for key in &additions {
            preview.add_dependency(key, "*");
        }
        let patch = render_patch(
            Utf8Path::new(MANIFEST_FILE_NAME),
            &before,
            &preview.to_toml_string(),
        );
        info!("proposed manifest change for {item}:\n{patch}");
    }

    fn fix(&mut self, item: &Utf8PathBuf) -> anyhow::Result<()> {
        let additions = self.pending_additions(item);
        if additions.is_empty() {
            return Ok(());
        }

        for key in &additions {
            info!("adding dependency {key} = \"*\"");
            self.pkg.manifest.add_dependency(key, "*");
        }
        self.pkg.write_manifest()?;
        Ok(())
    }
}
