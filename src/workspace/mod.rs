//! Workspace ("site") selection and path layout.
//!
//! A workspace is one directory under the sites root:
//!
//! ```text
//! websites/<name>/
//! ├── src/
//! │   ├── js/       *.js and bundle directories → dist/js/
//! │   ├── sass/     **/*.{scss,sass}            → dist/css/
//! │   ├── svg/      *.svg                       → dist/svg/
//! │   ├── copy/     **/*                        → dist/
//! │   └── **/*.ts                               → dist/**/*.js
//! └── dist/
//! ```
//!
//! Every path is derived from the name once; the resulting [`Workspace`] is
//! immutable and shared by reference with every stage and rebuild.

mod prompt;
mod resolver;

pub use prompt::{Prompt, StdinPrompt};
pub use resolver::Resolver;

use std::path::{Path, PathBuf};

/// File name suffix marking a polyfill inside a script bundle directory.
pub const POLYFILL_SUFFIX: &str = ".polyfill.js";

/// Input directory and output directory of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// A fully resolved workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Site name, a directory directly under the sites root
    pub name: String,
    /// `<root>/<name>`
    pub dir: PathBuf,
    /// `<root>/<name>/src`
    pub input: PathBuf,
    /// `<root>/<name>/dist`
    pub output: PathBuf,
    pub scripts: StagePaths,
    pub styles: StagePaths,
    pub svgs: StagePaths,
    pub copy: StagePaths,
    pub transpile: StagePaths,
    /// Directory served by the dev server
    pub reload: PathBuf,
}

impl Workspace {
    /// Derive every path of workspace `name` under `sites_root`.
    pub fn new(sites_root: &Path, name: &str) -> Self {
        let dir = sites_root.join(name);
        let input = dir.join("src");
        let output = dir.join("dist");

        Self {
            name: name.to_owned(),
            scripts: StagePaths {
                input: input.join("js"),
                output: output.join("js"),
            },
            styles: StagePaths {
                input: input.join("sass"),
                output: output.join("css"),
            },
            svgs: StagePaths {
                input: input.join("svg"),
                output: output.join("svg"),
            },
            copy: StagePaths {
                input: input.join("copy"),
                output: output.clone(),
            },
            transpile: StagePaths {
                input: input.clone(),
                output: output.clone(),
            },
            reload: output.clone(),
            dir,
            input,
            output,
        }
    }
}
