//! Build orchestration.
//!
//! # Architecture
//!
//! ```text
//! Pipeline::build(workspace)
//!     │
//!     ├── clean ──► remove dist/
//!     │
//!     └── (parallel, each after clean)
//!         ├── lint
//!         ├── scripts    ──► dist/js
//!         ├── styles     ──► dist/css
//!         ├── svgs       ──► dist/svg
//!         ├── transpile  ──► dist
//!         └── copy       ──► dist
//! ```
//!
//! Every run gets a fresh [`OutputLedger`], so repeated runs in watch mode
//! never see claims from a previous build.

use crate::{
    config::{FeatureToggles, PipelineConfig},
    graph::{GraphError, RunReport, TaskGraph, TaskResult},
    log,
    output::{DiskSink, OutputLedger, Sink},
    pipeline::Banner,
    stages::{Stage, StageContext},
    tools::Toolchain,
    workspace::Workspace,
};
use anyhow::Result;
use std::{sync::Arc, time::Instant};

/// Stage graph: `clean` first, everything else concurrently after it.
pub fn stage_graph() -> Result<TaskGraph<Stage>, GraphError> {
    Stage::ALL
        .iter()
        .skip(1)
        .fold(TaskGraph::<Stage>::builder().task(Stage::Clean, &[]), |graph, &stage| {
            graph.task(stage, &[Stage::Clean])
        })
        .build()
}

/// Everything needed to build any workspace; shared by every rebuild.
pub struct Pipeline {
    features: FeatureToggles,
    tools: Toolchain,
    banner: Arc<Banner>,
    sink: Arc<dyn Sink>,
    graph: TaskGraph<Stage>,
}

impl Pipeline {
    pub fn new(
        features: FeatureToggles,
        tools: Toolchain,
        banner: Banner,
        sink: Arc<dyn Sink>,
    ) -> Result<Self> {
        Ok(Self {
            features,
            tools,
            banner: Arc::new(banner),
            sink,
            graph: stage_graph()?,
        })
    }

    /// Pipeline writing to disk with the configured collaborators.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let tools = Toolchain::from_config(&config.tools, &config.root)?;
        let banner = Banner::current(&config.package());
        Self::new(config.features, tools, banner, Arc::new(DiskSink))
    }

    pub const fn features(&self) -> &FeatureToggles {
        &self.features
    }

    /// Run the stage graph once, logging each outcome.
    pub fn run(&self, workspace: &Workspace) -> RunReport<Stage> {
        let ledger = OutputLedger::new(Arc::clone(&self.sink));
        let ctx = StageContext {
            workspace,
            features: &self.features,
            tools: &self.tools,
            banner: &self.banner,
            output: &ledger,
        };

        let report = self.graph.run(|stage| {
            let result = stage.run(&ctx);
            log_outcome(stage, &result);
            result
        });

        if report.is_success() {
            log!("build"; "{} files in {}", ledger.written(), workspace.output.display());
        }
        report
    }

    /// Run the stage graph; fails naming every failed stage.
    pub fn build(&self, workspace: &Workspace) -> Result<()> {
        let start = Instant::now();
        log!("build"; "building {}...", workspace.name);

        self.run(workspace).into_result()?;

        log!("build"; "done in {:.2?}", start.elapsed());
        Ok(())
    }
}

fn log_outcome(stage: Stage, result: &TaskResult) {
    match result {
        TaskResult::Succeeded(0) => {}
        TaskResult::Succeeded(count) => log!(stage.name(); "wrote {count} files"),
        TaskResult::Skipped => log!(stage.name(); "disabled, skipping"),
        TaskResult::Failed(err) => log!("error"; "{stage}: {err:#}"),
        TaskResult::Blocked => log!(stage.name(); "not run, an earlier stage failed"),
    }
}
