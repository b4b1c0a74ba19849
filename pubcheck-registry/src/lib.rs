//! Configuration file loading for pubcheck.
//!
//! Discovers and loads `pubcheck.toml`, which declares the remote package
//! repositories as an ordered list. List order is priority order: the first
//! repository wins conflicts and is queried first during dependency
//! resolution. The registry is loaded once at process start and is immutable
//! for the duration of a run.

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use pubcheck_types::Repository;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "pubcheck.toml";

/// Top-level configuration from pubcheck.toml.
///
/// ```toml
/// [[repositories]]
/// name = "stable"
/// url = "https://stable.pkgs.example.org"
///
/// [[repositories]]
/// name = "unstable"
/// url = "https://unstable.pkgs.example.org"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PubcheckConfig {
    /// Remote repositories in priority order.
    pub repositories: Vec<Repository>,
}

impl PubcheckConfig {
    pub fn into_registry(self) -> Registry {
        Registry::new(self.repositories)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: toml::de::Error,
    },
}

/// Discover the pubcheck.toml config file in the given directory.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a pubcheck.toml config file.
pub fn load_config(path: &Utf8Path) -> Result<PubcheckConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Load config from a directory, or return the default (no repositories)
/// if no file is found.
pub fn load_or_default(dir: &Utf8Path) -> Result<PubcheckConfig, ConfigError> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(PubcheckConfig::default()),
    }
}

/// The ordered set of configured repositories.
///
/// A repository's priority is its position: index 0 is the highest-priority
/// repository.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    repositories: Vec<Repository>,
}

impl Registry {
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self { repositories }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        self.repositories.iter()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Priority index of a repository, if configured.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.repositories.iter().position(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// The highest-priority repository among `names`, or `None` when none of
    /// them is configured. Order of `names` is irrelevant; only registry
    /// order decides.
    pub fn first_of<'a, I>(&self, names: I) -> Option<&Repository>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = names.into_iter().collect();
        self.repositories
            .iter()
            .find(|r| names.contains(&r.name.as_str()))
    }
}
