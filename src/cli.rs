//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sitepipe asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Site to build, skipping the interactive prompt
    #[arg(short, long, global = true, num_args = 0..=1, value_name = "NAME")]
    pub site: Option<Option<String>>,

    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to root (default: sitepipe.toml)
    #[arg(short = 'C', long, default_value = "sitepipe.toml")]
    pub config: PathBuf,

    /// subcommands; without one the site is cleaned and built once
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build, then serve the output and rebuild + reload on change
    Watch {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// What the user asked for with `-s/--site`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteArg {
    /// Flag absent: ask interactively
    Prompt,
    /// Flag present without a value
    Missing,
    /// Flag with a value
    Named(String),
}

impl Cli {
    pub const fn is_watch(&self) -> bool {
        matches!(self.command, Some(Commands::Watch { .. }))
    }

    pub fn site_arg(&self) -> SiteArg {
        match &self.site {
            None => SiteArg::Prompt,
            Some(None) => SiteArg::Missing,
            Some(Some(name)) if name.is_empty() => SiteArg::Missing,
            Some(Some(name)) => SiteArg::Named(name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("sitepipe").chain(args.iter().copied()))
    }

    #[test]
    fn test_default_invocation_prompts() {
        let cli = parse(&[]);
        assert_eq!(cli.site_arg(), SiteArg::Prompt);
        assert!(!cli.is_watch());
    }

    #[test]
    fn test_site_short_and_long() {
        assert_eq!(parse(&["-s", "blog"]).site_arg(), SiteArg::Named("blog".into()));
        assert_eq!(parse(&["--site", "shop"]).site_arg(), SiteArg::Named("shop".into()));
        assert_eq!(parse(&["--site=shop"]).site_arg(), SiteArg::Named("shop".into()));
    }

    #[test]
    fn test_site_without_value() {
        assert_eq!(parse(&["-s"]).site_arg(), SiteArg::Missing);
        assert_eq!(parse(&["--site"]).site_arg(), SiteArg::Missing);
    }

    #[test]
    fn test_watch_subcommand() {
        let cli = parse(&["watch", "-s", "blog", "--port", "8080"]);
        assert!(cli.is_watch());
        assert_eq!(cli.site_arg(), SiteArg::Named("blog".into()));
        assert!(matches!(cli.command, Some(Commands::Watch { port: Some(8080), .. })));
    }
}
