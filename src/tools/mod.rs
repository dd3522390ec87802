//! Transform collaborators.
//!
//! The pipeline never looks inside a transform: scripts are minified, styles
//! compiled, prefixed and minified, SVGs optimized and typed sources
//! transpiled by implementations of [`Transform`], bundled in a [`Toolchain`].
//!
//! | Concern          | Default implementation          |
//! |------------------|---------------------------------|
//! | script lint      | external command (`jshint`)     |
//! | script minify    | `minify-js` parser and printer  |
//! | style compile    | external command (`sass`)       |
//! | style prefix     | `lightningcss` with targets     |
//! | style minify     | `lightningcss` minifying printer|
//! | svg optimize     | `usvg` re-serialization         |
//! | transpile        | external command (`babel`)      |

mod command;
mod script;
mod style;
mod svg;

pub use command::{CommandLinter, CommandTransform};
pub use script::ScriptMinifier;
pub use style::{StyleMinifier, StylePrefixer, parse_browsers};
pub use svg::SvgOptimizer;

use crate::config::ToolsConfig;
use anyhow::Result;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// A content transform applied to one file.
pub trait Transform: Send + Sync {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Transform `input`, the current content of the file at `path`.
    fn apply(&self, path: &Path, input: &[u8]) -> Result<Vec<u8>>;
}

/// Checks a set of files without producing output.
pub trait Linter: Send + Sync {
    fn lint(&self, files: &[PathBuf]) -> Result<()>;
}

/// Every collaborator a build run needs.
#[derive(Clone)]
pub struct Toolchain {
    /// `None` disables linting
    pub linter: Option<Arc<dyn Linter>>,
    pub script_minifier: Arc<dyn Transform>,
    pub style_compiler: Arc<dyn Transform>,
    pub style_prefixer: Arc<dyn Transform>,
    pub style_minifier: Arc<dyn Transform>,
    pub svg_optimizer: Arc<dyn Transform>,
    pub transpiler: Arc<dyn Transform>,
}

impl Toolchain {
    /// Build the default toolchain from `[tools]`.
    ///
    /// External commands run with `root` as working directory.
    pub fn from_config(tools: &ToolsConfig, root: &Path) -> Result<Self> {
        let browsers = parse_browsers(&tools.browsers)?;

        let linter: Option<Arc<dyn Linter>> = if tools.lint.is_empty() {
            None
        } else {
            Some(Arc::new(CommandLinter::new(tools.lint.clone(), root)))
        };

        Ok(Self {
            linter,
            script_minifier: Arc::new(ScriptMinifier),
            style_compiler: Arc::new(CommandTransform::new("style compiler", tools.styles.clone(), root)),
            style_prefixer: Arc::new(StylePrefixer::new(browsers.clone())),
            style_minifier: Arc::new(StyleMinifier::new(browsers)),
            svg_optimizer: Arc::new(SvgOptimizer),
            transpiler: Arc::new(CommandTransform::new("transpiler", tools.transpile.clone(), root)),
        })
    }
}

#[cfg(test)]
pub mod testing {
    //! Stub collaborators for stage and build tests.

    use super::*;
    use anyhow::bail;

    /// Returns its input unchanged.
    pub struct Identity(pub &'static str);

    impl Transform for Identity {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(&self, _path: &Path, input: &[u8]) -> Result<Vec<u8>> {
            Ok(input.to_vec())
        }
    }

    /// Drops whitespace and `//` line comments; enough to tell minified apart.
    pub struct Squash;

    impl Transform for Squash {
        fn name(&self) -> &'static str {
            "squash"
        }

        fn apply(&self, _path: &Path, input: &[u8]) -> Result<Vec<u8>> {
            let text = String::from_utf8_lossy(input);
            Ok(text
                .lines()
                .filter(|l| !l.trim_start().starts_with("//"))
                .flat_map(|l| l.split_whitespace())
                .collect::<String>()
                .into_bytes())
        }
    }

    /// Fails on any content containing `ERROR`.
    pub struct Strict(pub &'static str);

    impl Transform for Strict {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(&self, path: &Path, input: &[u8]) -> Result<Vec<u8>> {
            if String::from_utf8_lossy(input).contains("ERROR") {
                bail!("syntax error in {}", path.display());
            }
            Ok(input.to_vec())
        }
    }

    /// Records every linted batch.
    #[derive(Default)]
    pub struct RecordingLinter(pub parking_lot::Mutex<Vec<Vec<PathBuf>>>);

    impl Linter for RecordingLinter {
        fn lint(&self, files: &[PathBuf]) -> Result<()> {
            self.0.lock().push(files.to_vec());
            Ok(())
        }
    }

    /// Toolchain of stubs that never leaves the process.
    pub fn stub_toolchain() -> Toolchain {
        Toolchain {
            linter: None,
            script_minifier: Arc::new(Squash),
            style_compiler: Arc::new(Strict("style compiler")),
            style_prefixer: Arc::new(Identity("style prefixer")),
            style_minifier: Arc::new(Squash),
            svg_optimizer: Arc::new(Squash),
            transpiler: Arc::new(Strict("transpiler")),
        }
    }
}
