//! `[package]` section configuration.
//!
//! Project metadata stamped into the banner of every script and style
//! artifact. When the section is missing, the metadata is read from a
//! `package.json` next to the config file.

use super::{defaults, error::ConfigError};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// `[package]` section in sitepipe.toml - project metadata.
///
/// # Example
/// ```toml
/// [package]
/// name = "my-sites"
/// version = "1.2.3"
/// author = "Alice"
/// license = "MIT"
/// repository = "https://github.com/alice/my-sites"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    #[serde(default = "defaults::package::name")]
    #[educe(Default = defaults::package::name())]
    pub name: String,

    #[serde(default = "defaults::package::version")]
    #[educe(Default = defaults::package::version())]
    pub version: String,

    #[serde(default = "defaults::package::author")]
    #[educe(Default = defaults::package::author())]
    pub author: String,

    #[serde(default = "defaults::package::license")]
    #[educe(Default = defaults::package::license())]
    pub license: String,

    /// Repository URL shown at the end of the banner.
    #[serde(default)]
    pub repository: String,
}

/// The subset of `package.json` the banner needs.
#[derive(Debug, Deserialize)]
struct PackageJson {
    name: Option<String>,
    version: Option<String>,
    author: Option<Person>,
    license: Option<String>,
    repository: Option<Repository>,
}

/// `"author": "Alice <a@x.io>"` or `"author": { "name": "Alice" }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Person {
    Short(String),
    Full { name: String },
}

/// `"repository": "https://..."` or `"repository": { "type": "git", "url": "..." }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Repository {
    Short(String),
    Full { url: String },
}

impl Person {
    fn into_name(self) -> String {
        match self {
            // npm shorthand: "Name <email> (url)"
            Self::Short(s) => s
                .split(['<', '('])
                .next()
                .unwrap_or_default()
                .trim()
                .to_owned(),
            Self::Full { name } => name,
        }
    }
}

impl Repository {
    fn into_url(self) -> String {
        match self {
            Self::Short(url) | Self::Full { url } => url,
        }
    }
}

impl PackageConfig {
    /// Parse metadata from `package.json` content, filling gaps with defaults.
    pub fn from_package_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let json: PackageJson = serde_json::from_str(content)
            .map_err(|err| ConfigError::PackageJson(path.to_path_buf(), err))?;

        let mut package = Self::default();
        if let Some(name) = json.name {
            package.name = name;
        }
        if let Some(version) = json.version {
            package.version = version;
        }
        if let Some(author) = json.author {
            package.author = author.into_name();
        }
        if let Some(license) = json.license {
            package.license = license;
        }
        if let Some(repository) = json.repository {
            package.repository = repository.into_url();
        }
        Ok(package)
    }

    /// Load metadata from a `package.json` file, if it exists.
    pub fn load_package_json(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.is_file() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_package_json(&content, path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::super::PipelineConfig;
    use super::*;

    #[test]
    fn test_package_section() {
        let config = r#"
            [package]
            name = "x"
            version = "1.2.3"
            author = "A"
            license = "MIT"
            repository = "https://example.com"
        "#;
        let config: PipelineConfig = toml::from_str(config).unwrap();
        let package = config.package.unwrap();

        assert_eq!(package.name, "x");
        assert_eq!(package.version, "1.2.3");
        assert_eq!(package.author, "A");
        assert_eq!(package.repository, "https://example.com");
    }

    #[test]
    fn test_package_json_object_forms() {
        let json = r#"{
            "name": "boilerplate",
            "version": "2.0.1",
            "author": { "name": "Chris", "url": "https://example.com" },
            "license": "ISC",
            "repository": { "type": "git", "url": "https://github.com/c/b" }
        }"#;
        let package = PackageConfig::from_package_json(json, Path::new("package.json")).unwrap();

        assert_eq!(package.name, "boilerplate");
        assert_eq!(package.version, "2.0.1");
        assert_eq!(package.author, "Chris");
        assert_eq!(package.license, "ISC");
        assert_eq!(package.repository, "https://github.com/c/b");
    }

    #[test]
    fn test_package_json_string_forms() {
        let json = r#"{
            "name": "b",
            "author": "Chris Ferdinandi <chris@example.com> (https://example.com)",
            "repository": "https://github.com/c/b"
        }"#;
        let package = PackageConfig::from_package_json(json, Path::new("package.json")).unwrap();

        assert_eq!(package.author, "Chris Ferdinandi");
        assert_eq!(package.repository, "https://github.com/c/b");
        // Missing fields fall back to defaults
        assert_eq!(package.version, "0.0.0");
        assert_eq!(package.license, "MIT");
    }

    #[test]
    fn test_package_json_invalid() {
        let result = PackageConfig::from_package_json("{ nope", Path::new("package.json"));
        assert!(matches!(result, Err(ConfigError::PackageJson(..))));
    }

    #[test]
    fn test_package_json_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PackageConfig::load_package_json(&dir.path().join("package.json")).unwrap();
        assert!(result.is_none());
    }
}
