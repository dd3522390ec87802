//! `[tools]` section configuration.
//!
//! Command lines for the collaborators that run outside the process, and
//! the browser targets used by the style prefixer.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[tools]` section in sitepipe.toml.
///
/// Each command is the program followed by fixed arguments; the input file
/// path is appended. An empty `lint` command disables linting.
///
/// # Example
/// ```toml
/// [tools]
/// lint = ["eslint", "--no-eslintrc"]
/// styles = ["sass", "--no-source-map", "--style=expanded"]
/// transpile = ["esbuild", "--loader=ts"]
/// browsers = ["chrome 100", "safari 15"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Script linter. Invoked once with every script input.
    #[serde(default = "defaults::tools::lint")]
    #[educe(Default = defaults::tools::lint())]
    pub lint: Vec<String>,

    /// Style compiler. Prints compiled CSS to stdout.
    #[serde(default = "defaults::tools::styles")]
    #[educe(Default = defaults::tools::styles())]
    pub styles: Vec<String>,

    /// Transpiler. Prints the plain script to stdout.
    #[serde(default = "defaults::tools::transpile")]
    #[educe(Default = defaults::tools::transpile())]
    pub transpile: Vec<String>,

    /// Browser targets as `"<browser> <major>"`.
    #[serde(default = "defaults::tools::browsers")]
    #[educe(Default = defaults::tools::browsers())]
    pub browsers: Vec<String>,
}
