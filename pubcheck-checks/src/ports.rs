//! Port traits abstracting network and binary-format access away from the
//! checks, so the resolver logic can be driven against in-memory
//! implementations in tests.

use camino::Utf8Path;

use pubcheck_search::HttpSearchClient;
use pubcheck_types::{Candidate, Repository};

/// Repository search access.
///
/// Implementations tolerate lookup failures internally: a failed lookup is
/// an empty candidate list, never an error.
pub trait SearchProvider {
    fn search(&self, term: &str, repository: &Repository) -> Vec<Candidate>;
}

impl SearchProvider for HttpSearchClient {
    fn search(&self, term: &str, repository: &Repository) -> Vec<Candidate> {
        HttpSearchClient::search(self, term, repository)
    }
}

/// Binary classification and needed-library extraction.
pub trait BinaryInspector {
    /// Whether the file is a recognized binary. Classification failure is
    /// "no", not an error.
    fn is_binary(&self, path: &Utf8Path) -> bool;

    /// The shared-library names the binary requires, in declaration order,
    /// deduplicated.
    fn needed_libraries(&self, path: &Utf8Path) -> anyhow::Result<Vec<String>>;
}

/// ELF-backed [`BinaryInspector`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ElfInspector;

impl BinaryInspector for ElfInspector {
    fn is_binary(&self, path: &Utf8Path) -> bool {
        pubcheck_elf::is_binary(path)
    }

    fn needed_libraries(&self, path: &Utf8Path) -> anyhow::Result<Vec<String>> {
        Ok(pubcheck_elf::needed_libraries(path)?)
    }
}
