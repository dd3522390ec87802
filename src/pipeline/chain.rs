//! Per-file transform chains.
//!
//! A [`Chain`] is an ordered list of steps applied to one source file. It
//! does no I/O: running it yields the artifacts marked by `emit` steps, and
//! the owning stage writes them into its output directory.
//!
//! ```text
//! scripts:  banner → emit → rename(.min) → minify → banner → emit
//! styles:   compile → prefix → banner → emit → rename(.min) → minify → emit
//! ```

use super::Banner;
use crate::tools::Transform;
use anyhow::{Context, Result};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
};

/// One input to a chain.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Location on disk, handed to transforms for diagnostics and resolution
    pub origin: PathBuf,
    /// Output path relative to the stage's output directory
    pub target: PathBuf,
    pub content: Vec<u8>,
}

/// One output of a chain, relative to the stage's output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// How a `rename` step changes the target path.
#[derive(Debug, Clone, Copy)]
pub enum Rename {
    /// `app.js` + `.min` → `app.min.js`
    Suffix(&'static str),
    /// `app.ts` + `js` → `app.js`
    Extension(&'static str),
}

impl Rename {
    fn apply(self, path: &Path) -> PathBuf {
        match self {
            Self::Suffix(suffix) => {
                let mut name: OsString = path.file_stem().unwrap_or_default().to_owned();
                name.push(suffix);
                if let Some(ext) = path.extension() {
                    name.push(".");
                    name.push(ext);
                }
                path.with_file_name(name)
            }
            Self::Extension(ext) => path.with_extension(ext),
        }
    }
}

enum Step {
    Apply(Arc<dyn Transform>),
    Banner(Arc<Banner>),
    Rename(Rename),
    Emit,
}

/// Ordered list of steps, built once per stage and run per file.
#[derive(Default)]
pub struct Chain {
    steps: Vec<Step>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content with the transform's output.
    pub fn apply(mut self, transform: Arc<dyn Transform>) -> Self {
        self.steps.push(Step::Apply(transform));
        self
    }

    /// Prepend the banner to the content.
    pub fn banner(mut self, banner: &Arc<Banner>) -> Self {
        self.steps.push(Step::Banner(Arc::clone(banner)));
        self
    }

    pub fn rename(mut self, rename: Rename) -> Self {
        self.steps.push(Step::Rename(rename));
        self
    }

    /// Record the current content under the current target path.
    pub fn emit(mut self) -> Self {
        self.steps.push(Step::Emit);
        self
    }

    /// Run every step over `file`.
    ///
    /// A failing transform aborts the chain; nothing emitted before the
    /// failure is returned.
    pub fn run(&self, file: SourceFile) -> Result<Vec<Artifact>> {
        let SourceFile {
            origin,
            mut target,
            mut content,
        } = file;
        let mut artifacts = Vec::new();

        for step in &self.steps {
            match step {
                Step::Apply(transform) => {
                    content = transform.apply(&origin, &content).with_context(|| {
                        format!("{} failed on {}", transform.name(), origin.display())
                    })?;
                }
                Step::Banner(banner) => content = banner.stamp(&content),
                Step::Rename(rename) => target = rename.apply(&target),
                Step::Emit => artifacts.push(Artifact {
                    path: target.clone(),
                    content: content.clone(),
                }),
            }
        }

        Ok(artifacts)
    }
}
