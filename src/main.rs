//! sitepipe - asset build pipeline for multi-site workspaces.

mod build;
mod cli;
mod config;
mod graph;
mod output;
mod pipeline;
mod reload;
mod serve;
mod stages;
mod tools;
mod utils;
mod watch;
mod workspace;

use anyhow::{Context, Result};
use build::Pipeline;
use clap::Parser;
use cli::Cli;
use config::PipelineConfig;
use reload::ReloadHub;
use serve::DevServer;
use std::net::{IpAddr, SocketAddr};
use watch::watch_for_changes_blocking;
use workspace::{Resolver, StdinPrompt, Workspace};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config: &'static PipelineConfig = Box::leak(Box::new(PipelineConfig::load(&cli)?));

    let mut resolver = Resolver::new(&config.workspace, StdinPrompt::new());
    let workspace = match resolver.resolve(&cli.site_arg()) {
        Ok(workspace) => workspace.clone(),
        // Usage mistakes print guidance and end the run without building
        Err(err) if err.is_usage() => {
            log!("error"; "{err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let pipeline = Pipeline::from_config(config)?;
    pipeline.build(&workspace)?;

    if cli.is_watch() {
        serve_and_watch(config, Box::leak(Box::new(workspace)), Box::leak(Box::new(pipeline)))?;
    }

    Ok(())
}

/// Serve the output with live reload and rebuild on change.
///
/// With `reload` disabled only the watcher runs.
fn serve_and_watch(
    config: &'static PipelineConfig,
    workspace: &'static Workspace,
    pipeline: &'static Pipeline,
) -> Result<()> {
    if !pipeline.features().reload {
        log!("watch"; "live reload disabled, watching without server");
        return watch_for_changes_blocking(workspace, pipeline, None);
    }

    let interface: IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid serve interface `{}`", config.serve.interface))?;
    let hub = ReloadHub::bind(SocketAddr::new(interface, config.serve.reload_port))?;
    let server = DevServer::new(&workspace.reload, Some(hub.port()));

    std::thread::spawn(move || {
        if let Err(err) = watch_for_changes_blocking(workspace, pipeline, Some(hub.as_ref())) {
            log!("watch"; "{err}");
        }
    });

    // Blocks until Ctrl+C
    server.run(&config.serve)
}
