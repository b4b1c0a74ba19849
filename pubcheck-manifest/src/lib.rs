//! Package and manifest access for pubcheck.
//!
//! A package is a directory tree plus a `manifest.toml` describing metadata
//! and dependencies. Checks mutate the manifest in place through [`Manifest`]
//! and persist it with [`Package::write_manifest`]; edits go through
//! `toml_edit` so user formatting and comments survive a fix.

mod diff;
mod error;

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use toml_edit::{DocumentMut, Item, value};

use pubcheck_types::DepKey;

pub use diff::render_patch;
pub use error::ManifestError;

/// File name of the package manifest, relative to the package root.
pub const MANIFEST_FILE_NAME: &str = "manifest.toml";

/// The parsed package manifest.
///
/// Field reads go against the underlying document, so a mutation is visible
/// to every later read within the same run.
#[derive(Debug, Clone)]
pub struct Manifest {
    doc: DocumentMut,
}

impl Manifest {
    /// Parse a manifest, validating that the metadata fields are present and
    /// that every dependency key is well-formed.
    pub fn parse(contents: &str) -> Result<Self, ManifestError> {
        let doc: DocumentMut = contents.parse()?;
        let manifest = Self { doc };

        for field in ["name", "category", "version", "description"] {
            if manifest.str_field(field).is_none() {
                return Err(ManifestError::MissingField { field });
            }
        }
        if let Some(table) = manifest.doc.get("dependencies") {
            let table = table
                .as_table()
                .ok_or(ManifestError::DependenciesNotATable)?;
            for (key, _) in table.iter() {
                key.parse::<DepKey>()
                    .map_err(|source| ManifestError::InvalidDepKey {
                        key: key.to_string(),
                        source,
                    })?;
            }
        }

        Ok(manifest)
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.doc.get(field).and_then(Item::as_str)
    }

    pub fn name(&self) -> &str {
        self.str_field("name").unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.str_field("category").unwrap_or_default()
    }

    pub fn version(&self) -> &str {
        self.str_field("version").unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.str_field("description").unwrap_or_default()
    }

    pub fn set_version(&mut self, version: &str) {
        self.doc["version"] = value(version);
    }

    pub fn set_description(&mut self, description: &str) {
        self.doc["description"] = value(description);
    }

    /// Declared dependencies in manifest insertion order.
    pub fn dependencies(&self) -> Vec<(DepKey, String)> {
        let Some(table) = self.doc.get("dependencies").and_then(Item::as_table) else {
            return Vec::new();
        };
        table
            .iter()
            .filter_map(|(key, item)| {
                let key = key.parse::<DepKey>().ok()?;
                let req = item.as_str().unwrap_or("*").to_string();
                Some((key, req))
            })
            .collect()
    }

    pub fn contains_dependency(&self, key: &DepKey) -> bool {
        self.dependencies().iter().any(|(k, _)| k == key)
    }

    /// Whether any declared dependency names this package, under any
    /// repository.
    pub fn declares_package(&self, package: &str) -> bool {
        self.dependencies().iter().any(|(k, _)| k.name == package)
    }

    pub fn add_dependency(&mut self, key: &DepKey, req: &str) {
        self.doc["dependencies"][key.to_string().as_str()] = value(req);
    }

    /// Remove one declared dependency. Returns whether the key was present.
    pub fn remove_dependency(&mut self, key: &DepKey) -> bool {
        self.doc
            .get_mut("dependencies")
            .and_then(Item::as_table_mut)
            .and_then(|table| table.remove(&key.to_string()))
            .is_some()
    }

    /// Serialized manifest contents, formatting preserved.
    pub fn to_toml_string(&self) -> String {
        self.doc.to_string()
    }
}

/// A package under validation: its root directory and its manifest.
#[derive(Debug, Clone)]
pub struct Package {
    root: Utf8PathBuf,
    pub manifest: Manifest,
}

impl Package {
    pub fn load(root: impl Into<Utf8PathBuf>) -> Result<Self, ManifestError> {
        let root = root.into();
        let contents = fs::read_to_string(root.join(MANIFEST_FILE_NAME))?;
        let manifest = Manifest::parse(&contents)?;
        Ok(Self { root, manifest })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.root.join(MANIFEST_FILE_NAME)
    }

    /// The package's qualified name, `"category/name"`.
    pub fn spec(&self) -> String {
        format!("{}/{}", self.manifest.category(), self.manifest.name())
    }

    /// Persist the in-memory manifest back to disk.
    pub fn write_manifest(&self) -> Result<(), ManifestError> {
        fs::write(self.manifest_path(), self.manifest.to_toml_string())?;
        Ok(())
    }
}
