//! Stylesheet compilation.

use super::{StageContext, read_source, run_chain};
use crate::{
    pipeline::{Chain, Rename},
    stages::Stage,
    utils::fs::{Depth, collect_files, file_name, has_extension},
};
use anyhow::Result;

pub fn run(ctx: &StageContext<'_>) -> Result<usize> {
    let paths = &ctx.workspace.styles;
    let tools = ctx.tools;
    let chain = Chain::new()
        .apply(tools.style_compiler.clone())
        .apply(tools.style_prefixer.clone())
        .banner(ctx.banner)
        .emit()
        .rename(Rename::Suffix(".min"))
        .apply(tools.style_minifier.clone())
        .emit();

    let sources = collect_files(&paths.input, Depth::Recursive)
        .into_iter()
        .filter(|p| has_extension(p, &["scss", "sass"]))
        .filter(|p| !file_name(p).starts_with('_'))
        .map(|file| {
            let relative = file.strip_prefix(&paths.input).unwrap_or(&file);
            read_source(&file, &relative.with_extension("css"))
        })
        .collect::<Result<Vec<_>>>()?;

    let writer = ctx.output.writer(Stage::Styles, &paths.output);
    run_chain(&chain, sources, &writer)
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::{config::FeatureToggles, graph::TaskResult};

    #[test]
    fn test_partials_skipped_and_tree_kept() {
        let (_dir, ws) = workspace(&[
            ("src/sass/main.scss", ".a { color: red; }"),
            ("src/sass/_vars.scss", "$x: 1;"),
            ("src/sass/pages/home.sass", ".b\n  color: blue"),
            ("src/sass/notes.txt", "ignored"),
        ]);
        let (result, sink) = run_stage(Stage::Styles, &ws, FeatureToggles::default(), None);

        assert!(matches!(result, TaskResult::Succeeded(4)));
        assert_eq!(
            outputs(&ws, &sink),
            vec!["css/main.css", "css/main.min.css", "css/pages/home.css", "css/pages/home.min.css"]
        );
    }

    #[test]
    fn test_banner_before_minifier() {
        let (_dir, ws) = workspace(&[("src/sass/main.scss", ".a { color: red; }")]);
        let (_, sink) = run_stage(Stage::Styles, &ws, FeatureToggles::default(), None);
        let banner = banner();

        let full = text(&sink, &ws.styles.output.join("main.css"));
        assert_eq!(full, format!("{}.a {{ color: red; }}", banner.as_str()));

        // The minifier sees the banner and squashes it with everything else
        let min = text(&sink, &ws.styles.output.join("main.min.css"));
        assert!(min.starts_with("/*!x"));
        assert!(min.ends_with(".a{color:red;}"));
    }

    #[test]
    fn test_compile_error_fails_stage() {
        let (_dir, ws) = workspace(&[
            ("src/sass/ok.scss", ".a {}"),
            ("src/sass/bad.scss", "ERROR"),
        ]);
        let (result, _) = run_stage(Stage::Styles, &ws, FeatureToggles::default(), None);

        let TaskResult::Failed(err) = result else {
            panic!("expected failure");
        };
        assert!(format!("{err:#}").contains("bad.scss"));
    }
}
