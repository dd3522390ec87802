//! SVG optimization.

use super::{StageContext, read_source, run_chain};
use crate::{
    pipeline::Chain,
    stages::Stage,
    utils::fs::{Depth, collect_files, file_name, has_extension},
};
use anyhow::Result;
use std::path::Path;

pub fn run(ctx: &StageContext<'_>) -> Result<usize> {
    let paths = &ctx.workspace.svgs;
    let chain = Chain::new().apply(ctx.tools.svg_optimizer.clone()).emit();

    let sources = collect_files(&paths.input, Depth::Shallow)
        .into_iter()
        .filter(|p| has_extension(p, &["svg"]))
        .map(|file| read_source(&file, Path::new(file_name(&file))))
        .collect::<Result<Vec<_>>>()?;

    let writer = ctx.output.writer(Stage::Svgs, &paths.output);
    run_chain(&chain, sources, &writer)
}
