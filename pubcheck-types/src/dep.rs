use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A manifest dependency key: one declared dependency, identified by the
/// repository it is pinned to and the package name within that repository.
///
/// Encoded in the manifest as `"repo::package"`. The package part may itself
/// carry a category (`"stable::sys-libs/zlib"`); the key does not interpret
/// it further.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepKey {
    pub repository: String,
    pub name: String,
}

impl DepKey {
    pub fn new(repository: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for DepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.repository, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepKeyError {
    #[error("dependency key '{0}' is missing the '::' separator")]
    MissingSeparator(String),
    #[error("dependency key '{0}' has an empty repository part")]
    EmptyRepository(String),
    #[error("dependency key '{0}' has an empty package part")]
    EmptyName(String),
}

impl FromStr for DepKey {
    type Err = DepKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (repository, name) = s
            .split_once("::")
            .ok_or_else(|| DepKeyError::MissingSeparator(s.to_string()))?;
        if repository.is_empty() {
            return Err(DepKeyError::EmptyRepository(s.to_string()));
        }
        if name.is_empty() {
            return Err(DepKeyError::EmptyName(s.to_string()));
        }
        Ok(Self::new(repository, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repo_and_package() {
        let key: DepKey = "stable::openssl".parse().expect("valid key");
        assert_eq!(key.repository, "stable");
        assert_eq!(key.name, "openssl");
    }

    #[test]
    fn keeps_category_in_package_part() {
        let key: DepKey = "unstable::sys-libs/zlib".parse().expect("valid key");
        assert_eq!(key.repository, "unstable");
        assert_eq!(key.name, "sys-libs/zlib");
    }

    #[test]
    fn splits_on_first_separator_only() {
        let key: DepKey = "stable::odd::name".parse().expect("valid key");
        assert_eq!(key.repository, "stable");
        assert_eq!(key.name, "odd::name");
    }

    #[test]
    fn rejects_missing_separator() {
        let err = "openssl".parse::<DepKey>().expect_err("no separator");
        assert_eq!(err, DepKeyError::MissingSeparator("openssl".to_string()));
    }

    #[test]
    fn rejects_empty_parts() {
        assert!(matches!(
            "::zlib".parse::<DepKey>(),
            Err(DepKeyError::EmptyRepository(_))
        ));
        assert!(matches!(
            "stable::".parse::<DepKey>(),
            Err(DepKeyError::EmptyName(_))
        ));
    }

    #[test]
    fn display_round_trips() {
        let key = DepKey::new("beta", "net-libs/curl");
        assert_eq!(key.to_string(), "beta::net-libs/curl");
        assert_eq!(key.to_string().parse::<DepKey>().expect("round trip"), key);
    }
}
