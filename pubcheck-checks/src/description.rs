//! Manifest description syntax check.

use tracing::{error, info, warn};

use camino::Utf8Path;
use pubcheck_engine::Check;
use pubcheck_manifest::{MANIFEST_FILE_NAME, Package, render_patch};

/// The description must be non-empty, start with an uppercase letter, and
/// end with a full stop.
pub struct DescriptionCheck<'a> {
    pkg: &'a mut Package,
}

impl<'a> DescriptionCheck<'a> {
    pub const NAME: &'static str = "description";

    pub fn new(pkg: &'a mut Package) -> Self {
        Self { pkg }
    }
}

fn issues(description: &str) -> Vec<&'static str> {
    let mut out = Vec::new();
    let Some(first) = description.chars().next() else {
        return vec!["it is empty"];
    };
    if first.is_lowercase() {
        out.push("it does not start with an uppercase letter");
    }
    if !description.ends_with('.') {
        out.push("it does not end with a full stop");
    }
    out
}

/// A repaired description, or `None` when no mechanical repair applies.
fn repair(description: &str) -> Option<String> {
    let mut chars = description.chars();
    let first = chars.next()?;
    let mut out: String = first.to_uppercase().chain(chars).collect();
    if !out.ends_with('.') {
        out.push('.');
    }
    Some(out)
}

impl Check for DescriptionCheck<'_> {
    type Item = String;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn items(&mut self) -> anyhow::Result<Vec<String>> {
        Ok(vec![self.pkg.spec()])
    }

    fn validate(&mut self, _item: &String) -> anyhow::Result<bool> {
        Ok(issues(self.pkg.manifest.description()).is_empty())
    }

    fn show(&mut self, item: &String) {
        for issue in issues(self.pkg.manifest.description()) {
            error!("the description of {item} is malformed: {issue}");
        }
    }

    fn diff(&mut self, _item: &String) {
        let Some(repaired) = repair(self.pkg.manifest.description()) else {
            warn!("an empty description cannot be repaired automatically");
            return;
        };
        let before = self.pkg.manifest.to_toml_string();
        let mut preview = self.pkg.manifest.clone();
        preview.set_description(&repaired);
        let patch = render_patch(
            Utf8Path::new(MANIFEST_FILE_NAME),
            &before,
            &preview.to_toml_string(),
        );
        info!("proposed manifest change:\n{patch}");
    }

    fn fix(&mut self, _item: &String) -> anyhow::Result<()> {
        let Some(repaired) = repair(self.pkg.manifest.description()) else {
            warn!("an empty description cannot be repaired automatically");
            return Ok(());
        };
        info!("rewriting description as \"{repaired}\"");
        self.pkg.manifest.set_description(&repaired);
        self.pkg.write_manifest()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn well_formed_description_has_no_issues() {
        assert!(issues("The GNU compiler collection.").is_empty());
    }

    #[test]
    fn empty_description_is_one_issue() {
        assert_eq!(issues(""), vec!["it is empty"]);
    }

    #[test]
    fn lowercase_start_and_missing_stop_are_reported_together() {
        let found = issues("a compiler");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn digit_start_only_needs_the_full_stop() {
        assert_eq!(issues("7-Zip archiver"), vec!["it does not end with a full stop"]);
    }

    #[test]
    fn repair_capitalizes_and_terminates() {
        assert_eq!(repair("a compiler"), Some("A compiler.".to_string()));
        assert_eq!(
            repair("The GNU compiler collection."),
            Some("The GNU compiler collection.".to_string())
        );
        assert_eq!(repair(""), None);
    }
}
