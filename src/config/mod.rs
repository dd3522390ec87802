//! Pipeline configuration management for `sitepipe.toml`.
//!
//! The file is optional; every section has defaults.
//!
//! # Sections
//!
//! | Section       | Purpose                                          |
//! |---------------|--------------------------------------------------|
//! | `[package]`   | Banner metadata (falls back to `package.json`)   |
//! | `[features]`  | Stage toggles                                    |
//! | `[workspace]` | Sites root and fallback site name                |
//! | `[tools]`     | External collaborator commands, browser targets  |
//! | `[serve]`     | Development server (interface, ports)            |
//!
//! # Example
//!
//! ```toml
//! [package]
//! name = "my-sites"
//! version = "1.0.0"
//! author = "Alice"
//! repository = "https://github.com/alice/my-sites"
//!
//! [features]
//! polyfills = false
//!
//! [serve]
//! port = 8080
//! ```

mod defaults;
mod error;
mod features;
mod package;
mod serve;
mod tools;
mod workspace;

pub use error::ConfigError;
pub use features::FeatureToggles;
pub use package::PackageConfig;
pub use serve::ServeConfig;
pub use tools::ToolsConfig;
pub use workspace::WorkspaceSettings;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing sitepipe.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Absolute project root (set after loading)
    #[serde(skip)]
    #[educe(Default = PathBuf::from("./"))]
    pub root: PathBuf,

    /// Banner metadata
    #[serde(default)]
    pub package: Option<PackageConfig>,

    /// Stage toggles
    #[serde(default)]
    pub features: FeatureToggles,

    /// Sites root settings
    #[serde(default)]
    pub workspace: WorkspaceSettings,

    /// External collaborators
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl PipelineConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the configuration for a CLI invocation.
    ///
    /// A missing config file is not an error; defaults are used.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        config.root = normalize_path(root);
        config.workspace.root = normalize_path(&config.root.join(&config.workspace.root));

        if config.package.is_none() {
            config.package = PackageConfig::load_package_json(&config.root.join("package.json"))?;
        }

        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Banner metadata, with defaults when none was configured.
    pub fn package(&self) -> PackageConfig {
        self.package.clone().unwrap_or_default()
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Some(Commands::Watch { interface, port }) = &cli.command {
            update_option(&mut self.serve.interface, interface.as_ref());
            update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.workspace.default.is_empty() || self.workspace.default.contains(['.', '/']) {
            bail!(ConfigError::Validation(
                "[workspace.default] must be a plain directory name".into()
            ));
        }

        if self.serve.port == self.serve.reload_port {
            bail!(ConfigError::Validation(
                "[serve.port] and [serve.reload_port] must differ".into()
            ));
        }

        if self.features.styles && self.tools.styles.is_empty() {
            bail!(ConfigError::Validation(
                "[tools.styles] must have at least one element".into()
            ));
        }

        if self.features.transpile && self.tools.transpile.is_empty() {
            bail!(ConfigError::Validation(
                "[tools.transpile] must have at least one element".into()
            ));
        }

        Ok(())
    }
}

/// Update config option if CLI value is provided
fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
    if let Some(option) = cli_option {
        *config_option = option.clone();
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}
