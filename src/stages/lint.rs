//! Lint every script source.

use super::{StageContext, scripts};
use crate::log;
use anyhow::Result;

pub fn run(ctx: &StageContext<'_>) -> Result<usize> {
    let Some(linter) = &ctx.tools.linter else {
        log!("lint"; "no linter configured, skipping");
        return Ok(0);
    };

    let files = scripts::lint_inputs(&ctx.workspace.scripts.input);
    linter.lint(&files)?;
    if !files.is_empty() {
        log!("lint"; "{} files checked", files.len());
    }

    // Lint writes nothing
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::super::{Stage, testing::*};
    use crate::{
        config::FeatureToggles,
        graph::TaskResult,
        tools::testing::{RecordingLinter, stub_toolchain},
    };
    use std::sync::Arc;

    #[test]
    fn test_lint_sees_plain_files_and_bundles() {
        let (_dir, ws) = workspace(&[
            ("src/js/app.js", ""),
            ("src/js/vendor/a.js", ""),
            ("src/js/vendor/b.polyfill.js", ""),
            ("src/js/readme.md", ""),
        ]);
        let linter = Arc::new(RecordingLinter::default());
        let mut tools = stub_toolchain();
        tools.linter = Some(linter.clone());

        let (result, sink) = run_stage(Stage::Lint, &ws, FeatureToggles::default(), Some(tools));

        assert!(matches!(result, TaskResult::Succeeded(0)));
        assert!(sink.paths().is_empty());
        let batches = linter.0.lock();
        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0],
            vec![
                ws.scripts.input.join("app.js"),
                ws.scripts.input.join("vendor/a.js"),
                ws.scripts.input.join("vendor/b.polyfill.js"),
            ]
        );
    }

    #[test]
    fn test_lint_without_linter() {
        let (_dir, ws) = workspace(&[("src/js/app.js", "")]);
        let (result, _) = run_stage(Stage::Lint, &ws, FeatureToggles::default(), None);
        assert!(matches!(result, TaskResult::Succeeded(0)));
    }
}
