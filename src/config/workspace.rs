//! `[workspace]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[workspace]` section in sitepipe.toml - where the sites live.
///
/// # Example
/// ```toml
/// [workspace]
/// root = "websites"    # every directory below is one site
/// default = "default"  # chosen when the prompt answer matches nothing
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceSettings {
    /// Directory containing one subdirectory per site (relative to project root).
    #[serde(default = "defaults::workspace::root")]
    #[educe(Default = defaults::workspace::root())]
    pub root: PathBuf,

    /// Fallback site name for unrecognized prompt answers.
    #[serde(default = "defaults::workspace::default")]
    #[educe(Default = defaults::workspace::default())]
    pub default: String,
}

#[cfg(test)]
mod tests {
    use super::super::PipelineConfig;
    use std::path::Path;

    #[test]
    fn test_workspace_defaults() {
        let config: PipelineConfig = toml::from_str("").unwrap();
        assert_eq!(config.workspace.root, Path::new("websites"));
        assert_eq!(config.workspace.default, "default");
    }

    #[test]
    fn test_workspace_override() {
        let config = r#"
            [workspace]
            root = "sites"
            default = "main"
        "#;
        let config: PipelineConfig = toml::from_str(config).unwrap();
        assert_eq!(config.workspace.root, Path::new("sites"));
        assert_eq!(config.workspace.default, "main");
    }
}
