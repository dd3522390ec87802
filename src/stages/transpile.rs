//! TypeScript transpilation.

use super::{StageContext, read_source, run_chain};
use crate::{
    pipeline::{Chain, Rename},
    stages::Stage,
    utils::fs::{Depth, collect_files, file_name, has_extension},
};
use anyhow::Result;

pub fn run(ctx: &StageContext<'_>) -> Result<usize> {
    let paths = &ctx.workspace.transpile;
    let chain = Chain::new()
        .apply(ctx.tools.transpiler.clone())
        .rename(Rename::Extension("js"))
        .emit();

    let sources = collect_files(&paths.input, Depth::Recursive)
        .into_iter()
        .filter(|p| has_extension(p, &["ts"]))
        .filter(|p| !file_name(p).ends_with(".d.ts"))
        .map(|file| {
            let relative = file.strip_prefix(&paths.input).unwrap_or(&file);
            read_source(&file, relative)
        })
        .collect::<Result<Vec<_>>>()?;

    let writer = ctx.output.writer(Stage::Transpile, &paths.output);
    run_chain(&chain, sources, &writer)
}
