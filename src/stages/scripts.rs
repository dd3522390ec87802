//! Script bundling and minification.
//!
//! ```text
//! src/js/app.js                  → dist/js/app.js, app.min.js
//! src/js/vendor/a.js             ┐
//! src/js/vendor/b.polyfill.js    ┘→ dist/js/vendor.js, vendor.polyfills.js (+ .min)
//! ```

use super::{StageContext, read_source, run_chain};
use crate::{
    pipeline::{Chain, Rename, SourceFile},
    stages::Stage,
    utils::fs::{Depth, collect_dirs, collect_files, file_name, has_extension},
    workspace::POLYFILL_SUFFIX,
};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn run(ctx: &StageContext<'_>) -> Result<usize> {
    let paths = &ctx.workspace.scripts;
    let chain = Chain::new()
        .banner(ctx.banner)
        .emit()
        .rename(Rename::Suffix(".min"))
        .apply(ctx.tools.script_minifier.clone())
        .banner(ctx.banner)
        .emit();

    let mut sources = Vec::new();
    for file in js_files(&paths.input) {
        sources.push(read_source(&file, Path::new(file_name(&file)))?);
    }
    for dir in collect_dirs(&paths.input) {
        sources.extend(bundles(&dir, ctx.features.polyfills)?);
    }

    let writer = ctx.output.writer(Stage::Scripts, &paths.output);
    run_chain(&chain, sources, &writer)
}

/// Every script a linter should see: plain files, then bundle members.
pub fn lint_inputs(input: &Path) -> Vec<PathBuf> {
    let mut files = js_files(input);
    for dir in collect_dirs(input) {
        files.extend(js_files(&dir));
    }
    files
}

fn js_files(dir: &Path) -> Vec<PathBuf> {
    collect_files(dir, Depth::Shallow)
        .into_iter()
        .filter(|p| has_extension(p, &["js"]))
        .collect()
}

fn is_polyfill(path: &Path) -> bool {
    file_name(path).ends_with(POLYFILL_SUFFIX)
}

/// Bundles for one directory. Empty bundles are dropped.
fn bundles(dir: &Path, separate_polyfills: bool) -> Result<Vec<SourceFile>> {
    let name = file_name(dir);
    let files = js_files(dir);

    let mut out = Vec::with_capacity(2);
    if separate_polyfills {
        let plain: Vec<_> = files.iter().filter(|p| !is_polyfill(p)).cloned().collect();
        out.extend(bundle(dir, &plain, format!("{name}.js"))?);
        out.extend(bundle(dir, &files, format!("{name}.polyfills.js"))?);
    } else {
        out.extend(bundle(dir, &files, format!("{name}.js"))?);
    }
    Ok(out)
}

/// Concatenate `files` in order, separated by newlines.
fn bundle(dir: &Path, files: &[PathBuf], target: String) -> Result<Option<SourceFile>> {
    if files.is_empty() {
        return Ok(None);
    }

    let mut parts = Vec::with_capacity(files.len());
    for file in files {
        parts.push(fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?);
    }

    Ok(Some(SourceFile {
        origin: dir.to_path_buf(),
        target: PathBuf::from(target),
        content: parts.join(&b'\n'),
    }))
}
