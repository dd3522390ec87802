//! `[features]` section configuration.
//!
//! Turns individual build stages on or off. Read once at startup.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[features]` section in sitepipe.toml - stage toggles.
///
/// # Example
/// ```toml
/// [features]
/// polyfills = false   # one bundle per script directory
/// transpile = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FeatureToggles {
    /// Remove the output root before building.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub clean: bool,

    /// Lint, bundle and minify scripts.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub scripts: bool,

    /// Split each script directory into bundles with and without polyfills.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub polyfills: bool,

    /// Compile, prefix and minify stylesheets.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub styles: bool,

    /// Optimize SVG files.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub svgs: bool,

    /// Copy static files.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub copy: bool,

    /// Transpile typed sources to plain scripts.
    #[serde(default = "defaults::r#true", alias = "typescript")]
    #[educe(Default = true)]
    pub transpile: bool,

    /// Serve the output and reload browsers after rebuilds in watch mode.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub reload: bool,
}
