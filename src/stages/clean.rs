//! Remove the output root before a build.

use super::StageContext;
use crate::log;
use anyhow::Result;

pub fn run(ctx: &StageContext<'_>) -> Result<usize> {
    let output = &ctx.workspace.output;
    ctx.output.remove_all(output)?;
    log!("clean"; "removed {}", output.display());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::super::{Stage, testing::*};
    use crate::{
        config::FeatureToggles,
        graph::TaskResult,
        output::{DiskSink, OutputLedger},
        stages::StageContext,
        tools::testing::stub_toolchain,
    };
    use std::{fs, sync::Arc};

    #[test]
    fn test_clean_removes_output_root() {
        let (_dir, ws) = workspace(&[("dist/js/stale.js", "old"), ("src/js/app.js", "new")]);
        let ledger = OutputLedger::new(Arc::new(DiskSink));
        let tools = stub_toolchain();
        let banner = banner();
        let features = FeatureToggles::default();
        let ctx = StageContext {
            workspace: &ws,
            features: &features,
            tools: &tools,
            banner: &banner,
            output: &ledger,
        };

        assert!(matches!(Stage::Clean.run(&ctx), TaskResult::Succeeded(0)));
        assert!(!ws.output.exists());
        assert_eq!(fs::read_to_string(ws.input.join("js/app.js")).unwrap(), "new");
    }

    #[test]
    fn test_clean_without_output_root() {
        let (_dir, ws) = workspace(&[]);
        let (result, _) = run_stage(Stage::Clean, &ws, FeatureToggles::default(), None);
        assert!(matches!(result, TaskResult::Succeeded(0)));
    }
}
