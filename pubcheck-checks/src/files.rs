//! Item sources for file-based checks.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use glob::glob;
use tracing::warn;

/// Enumerate package files matching any of `patterns` (relative to `root`),
/// returning paths relative to `root` in traversal order. Directories are
/// skipped; unreadable entries are warned about and skipped.
pub fn find_files(root: &Utf8Path, patterns: &[&str]) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let mut out: Vec<Utf8PathBuf> = Vec::new();
    for pattern in patterns {
        let full = root.join(pattern);
        let paths = glob(full.as_str()).with_context(|| format!("bad glob pattern '{full}'"))?;
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    warn!("skipping unreadable entry while matching '{pattern}': {err}");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let path = Utf8PathBuf::from_path_buf(path)
                .map_err(|p| anyhow::anyhow!("non UTF-8 path: {}", p.display()))?;
            let rel = path
                .strip_prefix(root)
                .with_context(|| format!("strip {root} from {path}"))?
                .to_owned();
            if !out.contains(&rel) {
                out.push(rel);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_err as fs;

    fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir")
    }

    #[test]
    fn finds_files_and_skips_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = utf8_root(&dir);
        fs::create_dir_all(root.join("usr/bin/nested")).expect("mkdir");
        fs::write(root.join("usr/bin/app"), b"x").expect("write");
        fs::write(root.join("usr/bin/nested/tool"), b"x").expect("write");

        let files = find_files(&root, &["usr/bin/**/*"]).expect("glob");
        assert_eq!(files.len(), 2);
        assert!(files.contains(&Utf8PathBuf::from("usr/bin/app")));
        assert!(files.contains(&Utf8PathBuf::from("usr/bin/nested/tool")));
    }

    #[test]
    fn overlapping_patterns_do_not_duplicate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = utf8_root(&dir);
        fs::create_dir_all(root.join("usr/bin")).expect("mkdir");
        fs::write(root.join("usr/bin/app"), b"x").expect("write");

        let files = find_files(&root, &["usr/bin/**/*", "usr/**/*"]).expect("glob");
        assert_eq!(files, vec![Utf8PathBuf::from("usr/bin/app")]);
    }

    #[test]
    fn missing_tree_is_empty_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = utf8_root(&dir);
        let files = find_files(&root, &["usr/sbin/**/*"]).expect("glob");
        assert!(files.is_empty());
    }
}
