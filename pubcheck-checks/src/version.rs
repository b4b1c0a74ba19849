//! Manifest version well-formedness check.

use semver::Version;
use tracing::{error, info, warn};

use camino::Utf8Path;
use pubcheck_engine::Check;
use pubcheck_manifest::{MANIFEST_FILE_NAME, Package, render_patch};

/// The manifest version must be a well-formed semantic version.
pub struct VersionCheck<'a> {
    pkg: &'a mut Package,
}

impl<'a> VersionCheck<'a> {
    pub const NAME: &'static str = "version";

    pub fn new(pkg: &'a mut Package) -> Self {
        Self { pkg }
    }
}

/// Pad a bare `major` or `major.minor` version with zeroed components.
/// Anything else is left for a human to repair.
fn pad_version(version: &str) -> Option<String> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.is_empty()
        || parts.len() > 2
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }
    let mut padded = version.to_string();
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    Version::parse(&padded).ok()?;
    Some(padded)
}

impl Check for VersionCheck<'_> {
    type Item = String;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn items(&mut self) -> anyhow::Result<Vec<String>> {
        Ok(vec![self.pkg.spec()])
    }

    fn validate(&mut self, _item: &String) -> anyhow::Result<bool> {
        Ok(Version::parse(self.pkg.manifest.version()).is_ok())
    }

    fn show(&mut self, item: &String) {
        match Version::parse(self.pkg.manifest.version()) {
            Ok(_) => {}
            Err(err) => error!(
                "the version of {item} ('{}') is not a valid semantic version: {err}",
                self.pkg.manifest.version()
            ),
        }
    }

    fn diff(&mut self, _item: &String) {
        let Some(padded) = pad_version(self.pkg.manifest.version()) else {
            warn!(
                "version '{}' cannot be repaired automatically",
                self.pkg.manifest.version()
            );
            return;
        };
        let before = self.pkg.manifest.to_toml_string();
        let mut preview = self.pkg.manifest.clone();
        preview.set_version(&padded);
        let patch = render_patch(
            Utf8Path::new(MANIFEST_FILE_NAME),
            &before,
            &preview.to_toml_string(),
        );
        info!("proposed manifest change:\n{patch}");
    }

    fn fix(&mut self, _item: &String) -> anyhow::Result<()> {
        let Some(padded) = pad_version(self.pkg.manifest.version()) else {
            warn!(
                "version '{}' cannot be repaired automatically",
                self.pkg.manifest.version()
            );
            return Ok(());
        };
        info!("rewriting version as \"{padded}\"");
        self.pkg.manifest.set_version(&padded);
        self.pkg.write_manifest()?;
        Ok(())
    }
}
