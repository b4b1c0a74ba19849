use serde::Deserialize;

/// One result returned by a repository's search endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Candidate {
    /// Canonical package name. Content searches return the qualified form
    /// `"repo::category/package"`; other search kinds return a bare name.
    pub name: String,

    /// Path of the matched file within the package, with a leading `/`.
    #[serde(default)]
    pub path: String,

    /// Whether every published version of the package matches the search.
    /// Only an all-versions match is safe to accept as an unambiguous
    /// resolution.
    #[serde(default)]
    pub all_versions: bool,
}

impl Candidate {
    /// The package name with any `repo::` qualifier stripped, suitable for
    /// comparison against the package part of a manifest dependency key.
    pub fn package_name(&self) -> &str {
        match self.name.split_once("::") {
            Some((_, name)) => name,
            None => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_api_response() {
        let raw = r#"[
            {"name": "stable::sys-libs/zlib", "path": "/usr/lib64/libz.so", "all_versions": true},
            {"name": "openssl"}
        ]"#;
        let candidates: Vec<Candidate> = serde_json::from_str(raw).expect("valid response");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "stable::sys-libs/zlib");
        assert!(candidates[0].all_versions);
        assert_eq!(candidates[1].path, "");
        assert!(!candidates[1].all_versions);
    }

    #[test]
    fn package_name_strips_repository_qualifier() {
        let qualified = Candidate {
            name: "stable::sys-libs/zlib".to_string(),
            path: String::new(),
            all_versions: true,
        };
        assert_eq!(qualified.package_name(), "sys-libs/zlib");

        let bare = Candidate {
            name: "openssl".to_string(),
            path: String::new(),
            all_versions: true,
        };
        assert_eq!(bare.package_name(), "openssl");
    }
}
