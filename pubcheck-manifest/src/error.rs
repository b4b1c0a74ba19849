use thiserror::Error;

use pubcheck_types::DepKeyError;

/// Errors from manifest loading, validation, and persistence.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("manifest is not valid TOML: {0}")]
    Parse(#[from] toml_edit::TomlError),

    #[error("manifest is missing the '{field}' field")]
    MissingField { field: &'static str },

    #[error("manifest [dependencies] is not a table")]
    DependenciesNotATable,

    #[error("manifest dependency '{key}' is malformed: {source}")]
    InvalidDepKey { key: String, source: DepKeyError },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dep_key_names_the_offender() {
        let err = ManifestError::InvalidDepKey {
            key: "zlib".to_string(),
            source: DepKeyError::MissingSeparator("zlib".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("zlib"));
        assert!(msg.contains("separator"));
    }
}
