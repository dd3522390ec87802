//! Build stages.
//!
//! | Stage       | Input                         | Output       | Toggle      |
//! |-------------|-------------------------------|--------------|-------------|
//! | `clean`     | -                             | removes dist | `clean`     |
//! | `lint`      | `src/js/**/*.js`              | -            | `scripts`   |
//! | `scripts`   | `src/js/*.js`, `src/js/<dir>` | `dist/js`    | `scripts`   |
//! | `styles`    | `src/sass/**/*.{scss,sass}`   | `dist/css`   | `styles`    |
//! | `svgs`      | `src/svg/*.svg`               | `dist/svg`   | `svgs`      |
//! | `transpile` | `src/**/*.ts`                 | `dist`       | `transpile` |
//! | `copy`      | `src/copy/**/*`               | `dist`       | `copy`      |
//!
//! Every stage except `clean` reads sources, runs them through a
//! [`Chain`](crate::pipeline::Chain) and writes the artifacts through its own
//! [`StageWriter`](crate::output::StageWriter).

mod clean;
mod copy;
mod lint;
mod scripts;
mod styles;
mod svgs;
mod transpile;

use crate::{
    config::FeatureToggles,
    graph::TaskResult,
    output::{OutputLedger, StageWriter},
    pipeline::{Artifact, Banner, Chain, SourceFile},
    tools::Toolchain,
    workspace::Workspace,
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::{fmt, fs, path::Path, sync::Arc};

/// One node of the build graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Clean,
    Lint,
    Scripts,
    Styles,
    Svgs,
    Transpile,
    Copy,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Clean,
        Stage::Lint,
        Stage::Scripts,
        Stage::Styles,
        Stage::Svgs,
        Stage::Transpile,
        Stage::Copy,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Lint => "lint",
            Self::Scripts => "scripts",
            Self::Styles => "styles",
            Self::Svgs => "svgs",
            Self::Transpile => "transpile",
            Self::Copy => "copy",
        }
    }

    /// Whether the stage's toggle is on. Linting follows `scripts`.
    pub const fn is_enabled(self, features: &FeatureToggles) -> bool {
        match self {
            Self::Clean => features.clean,
            Self::Lint | Self::Scripts => features.scripts,
            Self::Styles => features.styles,
            Self::Svgs => features.svgs,
            Self::Transpile => features.transpile,
            Self::Copy => features.copy,
        }
    }

    /// Run the stage, or skip it when its toggle is off.
    pub fn run(self, ctx: &StageContext<'_>) -> TaskResult {
        if !self.is_enabled(ctx.features) {
            return TaskResult::Skipped;
        }

        let result = match self {
            Self::Clean => clean::run(ctx),
            Self::Lint => lint::run(ctx),
            Self::Scripts => scripts::run(ctx),
            Self::Styles => styles::run(ctx),
            Self::Svgs => svgs::run(ctx),
            Self::Transpile => transpile::run(ctx),
            Self::Copy => copy::run(ctx),
        };

        match result {
            Ok(count) => TaskResult::Succeeded(count),
            Err(err) => TaskResult::Failed(err),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a stage needs for one run. Shared read-only across stages.
pub struct StageContext<'a> {
    pub workspace: &'a Workspace,
    pub features: &'a FeatureToggles,
    pub tools: &'a Toolchain,
    pub banner: &'a Arc<Banner>,
    pub output: &'a OutputLedger,
}

/// Read a source file into a chain input.
pub(crate) fn read_source(origin: &Path, target: &Path) -> Result<SourceFile> {
    let content = fs::read(origin).with_context(|| format!("Failed to read {}", origin.display()))?;
    Ok(SourceFile {
        origin: origin.to_path_buf(),
        target: target.to_path_buf(),
        content,
    })
}

/// Run `chain` over every source in parallel and write the artifacts.
///
/// Returns the number of files written.
pub(crate) fn run_chain(
    chain: &Chain,
    sources: Vec<SourceFile>,
    writer: &StageWriter<'_>,
) -> Result<usize> {
    sources
        .into_par_iter()
        .map(|source| {
            let artifacts = chain.run(source)?;
            write_artifacts(writer, &artifacts)
        })
        .try_reduce(|| 0, |a, b| Ok(a + b))
}

fn write_artifacts(writer: &StageWriter<'_>, artifacts: &[Artifact]) -> Result<usize> {
    for artifact in artifacts {
        writer.write(&artifact.path, &artifact.content)?;
    }
    Ok(artifacts.len())
}
