//! Binary classification and needed-library extraction.
//!
//! The one fact pubcheck needs from a binary is the ordered list of shared
//! libraries it declares as required at link time (`DT_NEEDED`). Everything
//! else about the object format stays inside this crate.

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use goblin::elf::Elf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{path} is not a parseable ELF object: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: goblin::error::Error,
    },
}

/// Whether the file parses as an ELF object.
///
/// Classification failure of any kind (not an ELF, truncated file, read or
/// permission error) means "not a binary"; it is never an error. Callers
/// filter candidate files through this before extracting.
pub fn is_binary(path: &Utf8Path) -> bool {
    let Ok(bytes) = fs::read(path) else {
        return false;
    };
    Elf::parse(&bytes).is_ok()
}

/// The shared-library names the binary at `path` requires at link time, in
/// declaration order with exact duplicates skipped.
///
/// A binary without a dynamic section (statically linked, or no runtime
/// dependencies) yields an empty list.
pub fn needed_libraries(path: &Utf8Path) -> Result<Vec<String>, ExtractError> {
    let bytes = fs::read(path)?;
    let elf = Elf::parse(&bytes).map_err(|source| ExtractError::Parse {
        path: path.to_owned(),
        source,
    })?;
    Ok(dedup_preserving_order(&elf.libraries))
}

fn dedup_preserving_order(libraries: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(libraries.len());
    for lib in libraries {
        if !out.iter().any(|seen| seen == lib) {
            out.push((*lib).to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_file_is_not_a_binary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("script.sh");
        fs::write(&path, "#!/bin/sh\necho hello\n").expect("write file");
        let path = Utf8PathBuf::from_path_buf(path).expect("utf8 path");
        assert!(!is_binary(&path));
    }

    #[test]
    fn empty_file_is_not_a_binary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty");
        fs::write(&path, b"").expect("write file");
        let path = Utf8PathBuf::from_path_buf(path).expect("utf8 path");
        assert!(!is_binary(&path));
    }

    #[test]
    fn truncated_magic_is_not_a_binary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("truncated");
        // ELF magic with nothing after it.
        fs::write(&path, b"\x7fELF").expect("write file");
        let path = Utf8PathBuf::from_path_buf(path).expect("utf8 path");
        assert!(!is_binary(&path));
    }

    #[test]
    fn missing_file_is_not_a_binary() {
        assert!(!is_binary(Utf8Path::new("/nonexistent/definitely-missing")));
    }

    #[test]
    fn extraction_on_non_elf_reports_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("not-elf");
        fs::write(&path, "plain text").expect("write file");
        let path = Utf8PathBuf::from_path_buf(path).expect("utf8 path");
        let err = needed_libraries(&path).expect_err("not an ELF");
        assert!(matches!(err, ExtractError::Parse { .. }));
    }

    #[test]
    fn dedup_keeps_first_appearance_order() {
        let libs = ["libc.so.6", "libssl.so.3", "libc.so.6", "libz.so.1"];
        assert_eq!(
            dedup_preserving_order(&libs),
            vec!["libc.so.6", "libssl.so.3", "libz.so.1"]
        );
    }

    #[test]
    fn dedup_of_empty_input_is_empty() {
        assert!(dedup_preserving_order(&[]).is_empty());
    }
}
