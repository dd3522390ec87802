//! Verbatim copy of `src/copy` into the output root.

use super::{StageContext, read_source, run_chain};
use crate::{
    pipeline::Chain,
    stages::Stage,
    utils::fs::{Depth, collect_files},
};
use anyhow::Result;

pub fn run(ctx: &StageContext<'_>) -> Result<usize> {
    let paths = &ctx.workspace.copy;
    let chain = Chain::new().emit();

    let sources = collect_files(&paths.input, Depth::Recursive)
        .into_iter()
        .map(|file| {
            let relative = file.strip_prefix(&paths.input).unwrap_or(&file);
            read_source(&file, relative)
        })
        .collect::<Result<Vec<_>>>()?;

    let writer = ctx.output.writer(Stage::Copy, &paths.output);
    run_chain(&chain, sources, &writer)
}
