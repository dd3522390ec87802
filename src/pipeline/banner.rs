//! File header banner stamped onto script and style artifacts.

use crate::config::PackageConfig;
use chrono::Datelike;

/// Rendered banner line, including the trailing newline.
///
/// ```text
/// /*! <name> v<version> | (c) <year> <author> | <license> License | <repository> */
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner(String);

impl Banner {
    pub fn new(package: &PackageConfig, year: i32) -> Self {
        Self(format!(
            "/*! {} v{} | (c) {} {} | {} License | {} */\n",
            package.name, package.version, year, package.author, package.license, package.repository
        ))
    }

    /// Banner for the current local year.
    pub fn current(package: &PackageConfig) -> Self {
        Self::new(package, chrono::Local::now().year())
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prepend the banner to `content`.
    pub fn stamp(&self, content: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() + content.len());
        out.extend_from_slice(self.0.as_bytes());
        out.extend_from_slice(content);
        out
    }
}
