use serde::Deserialize;

/// One configured remote package repository.
///
/// Repositories are read-only for pubcheck: they are queried, never mutated.
/// Priority is not a field; it is the repository's position in the configured
/// registry order (lower index = higher priority).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name: String,
    pub url: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
