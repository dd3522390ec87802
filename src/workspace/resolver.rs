//! Resolve which workspace to build.
//!
//! Resolution order:
//! 1. A workspace resolved earlier in this process is reused
//! 2. `-s <name>` must name an existing site
//! 3. Otherwise the user is prompted; the answer is matched as a name, then
//!    as an index into the listed sites, then falls back to the default site

use super::{Prompt, Workspace};
use crate::{cli::SiteArg, config::WorkspaceSettings, log};
use std::{fs, io, path::PathBuf};
use thiserror::Error;

/// Why no workspace could be selected.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("When using -s or --site, you must specify which site you're using.")]
    MissingValue,

    #[error("Website '{name}' does not exist.\nPlease use one of the following: {}", .available.join(", "))]
    NotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Cannot list websites in `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("Failed to read site choice")]
    Prompt(#[source] io::Error),
}

impl ResolveError {
    /// Usage errors end the process quietly: guidance is printed, nothing built.
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::MissingValue | Self::NotFound { .. })
    }
}

/// List site names directly under `root`, sorted.
///
/// Entries whose name contains a `.` are treated as files and skipped.
pub fn list_sites(root: &std::path::Path) -> Result<Vec<String>, ResolveError> {
    let entries = fs::read_dir(root).map_err(|err| ResolveError::Io(root.to_path_buf(), err))?;

    let mut sites: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.contains('.'))
        .collect();
    sites.sort();
    Ok(sites)
}

/// Turns a `-s` argument or a prompt answer into a [`Workspace`], once.
pub struct Resolver<'a, P> {
    settings: &'a WorkspaceSettings,
    prompt: P,
    resolved: Option<Workspace>,
}

impl<'a, P: Prompt> Resolver<'a, P> {
    pub fn new(settings: &'a WorkspaceSettings, prompt: P) -> Self {
        Self {
            settings,
            prompt,
            resolved: None,
        }
    }

    /// Resolve the workspace, reusing an earlier result.
    pub fn resolve(&mut self, arg: &SiteArg) -> Result<&Workspace, ResolveError> {
        let workspace = match self.resolved.take() {
            Some(workspace) => workspace,
            None => {
                let name = self.select(arg)?;
                let workspace = Workspace::new(&self.settings.root, &name);
                log!("workspace"; "Ok, setting workspace to: {}", workspace.dir.display());
                workspace
            }
        };
        Ok(self.resolved.insert(workspace))
    }

    fn select(&mut self, arg: &SiteArg) -> Result<String, ResolveError> {
        match arg {
            SiteArg::Missing => Err(ResolveError::MissingValue),
            SiteArg::Named(name) => {
                let sites = list_sites(&self.settings.root)?;
                if sites.contains(name) {
                    Ok(name.clone())
                } else {
                    Err(ResolveError::NotFound {
                        name: name.clone(),
                        available: sites,
                    })
                }
            }
            SiteArg::Prompt => {
                let sites = list_sites(&self.settings.root)?;
                let answer = self.prompt.choose(&sites).map_err(ResolveError::Prompt)?;
                Ok(self.interpret(&answer, &sites))
            }
        }
    }

    /// Exact name, else index, else the default site.
    fn interpret(&self, answer: &str, sites: &[String]) -> String {
        if sites.iter().any(|s| s == answer) {
            return answer.to_owned();
        }
        if let Some(index) = parse_index(answer)
            && let Some(site) = sites.get(index)
        {
            return site.clone();
        }

        let fallback = &self.settings.default;
        if !sites.contains(fallback) {
            log!("workspace"; "'{answer}' matches no site, falling back to missing '{fallback}'");
        }
        fallback.clone()
    }
}

/// `"0"`, `"12"`; not `"01"`, `"+1"` or `" 1"`.
fn parse_index(answer: &str) -> Option<usize> {
    let canonical = !answer.is_empty()
        && answer.bytes().all(|b| b.is_ascii_digit())
        && (answer == "0" || !answer.starts_with('0'));
    if canonical { answer.parse().ok() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Answers every prompt with a fixed string and counts calls.
    struct Scripted<'c> {
        answer: &'static str,
        calls: &'c Cell<usize>,
    }

    impl Prompt for Scripted<'_> {
        fn choose(&mut self, _sites: &[String]) -> io::Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.answer.to_owned())
        }
    }

    fn sites_root(names: &[&str]) -> (TempDir, WorkspaceSettings) {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::create_dir_all(dir.path().join(name)).unwrap();
        }
        let settings = WorkspaceSettings {
            root: dir.path().to_path_buf(),
            default: "default".into(),
        };
        (dir, settings)
    }

    fn resolve_with(
        settings: &WorkspaceSettings,
        arg: SiteArg,
        answer: &'static str,
    ) -> Result<Workspace, ResolveError> {
        let calls = Cell::new(0);
        let mut resolver = Resolver::new(settings, Scripted { answer, calls: &calls });
        resolver.resolve(&arg).cloned()
    }

    #[test]
    fn test_list_sites_skips_dotted_names_and_sorts() {
        let (dir, settings) = sites_root(&["zeta", "alpha"]);
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert_eq!(list_sites(&settings.root).unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_list_sites_missing_root() {
        let result = list_sites(std::path::Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(ResolveError::Io(..))));
    }

    #[test]
    fn test_named_site_derives_paths() {
        let (_dir, settings) = sites_root(&["alpha", "beta"]);
        for name in ["alpha", "beta"] {
            let ws = resolve_with(&settings, SiteArg::Named(name.into()), "").unwrap();
            assert_eq!(ws.name, name);
            assert_eq!(ws.input, settings.root.join(name).join("src"));
            assert_eq!(ws.output, settings.root.join(name).join("dist"));
        }
    }

    #[test]
    fn test_unknown_site_lists_valid_options() {
        let (dir, settings) = sites_root(&["alpha", "beta"]);
        let err = resolve_with(&settings, SiteArg::Named("gamma".into()), "").unwrap_err();

        assert!(err.is_usage());
        let msg = err.to_string();
        assert!(msg.contains("'gamma' does not exist"));
        assert!(msg.contains("alpha, beta"));
        // Nothing was written anywhere
        assert!(!dir.path().join("gamma").exists());
        assert!(!dir.path().join("alpha/dist").exists());
    }

    #[test]
    fn test_flag_without_value() {
        let (_dir, settings) = sites_root(&["alpha"]);
        let err = resolve_with(&settings, SiteArg::Missing, "").unwrap_err();
        assert!(matches!(err, ResolveError::MissingValue));
        assert!(err.is_usage());
    }

    #[test]
    fn test_prompt_by_name() {
        let (_dir, settings) = sites_root(&["alpha", "beta"]);
        let ws = resolve_with(&settings, SiteArg::Prompt, "beta").unwrap();
        assert_eq!(ws.name, "beta");
    }

    #[test]
    fn test_prompt_by_index() {
        let (_dir, settings) = sites_root(&["alpha", "beta", "gamma"]);
        let ws = resolve_with(&settings, SiteArg::Prompt, "2").unwrap();
        assert_eq!(ws.name, "gamma");
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("12"), Some(12));
        for answer in ["", "01", "+1", "-1", " 1", "1.0"] {
            assert_eq!(parse_index(answer), None, "{answer:?}");
        }
    }

    #[test]
    fn test_prompt_non_canonical_index_falls_back() {
        let (_dir, settings) = sites_root(&["alpha", "beta", "default"]);
        for answer in ["01", "+1"] {
            let ws = resolve_with(&settings, SiteArg::Prompt, answer).unwrap();
            assert_eq!(ws.name, "default");
        }
    }

    #[test]
    fn test_prompt_index_out_of_range_falls_back() {
        let (_dir, settings) = sites_root(&["alpha", "beta"]);
        let ws = resolve_with(&settings, SiteArg::Prompt, "2").unwrap();
        assert_eq!(ws.name, "default");
    }

    #[test]
    fn test_prompt_garbage_falls_back() {
        let (_dir, settings) = sites_root(&["alpha", "default"]);
        let ws = resolve_with(&settings, SiteArg::Prompt, "nope").unwrap();
        assert_eq!(ws.name, "default");
    }

    #[test]
    fn test_resolution_is_cached() {
        let (_dir, settings) = sites_root(&["alpha", "beta"]);
        let calls = Cell::new(0);
        let mut resolver = Resolver::new(&settings, Scripted { answer: "alpha", calls: &calls });

        let first = resolver.resolve(&SiteArg::Prompt).unwrap().clone();
        // A different argument later in the process does not change the choice
        let second = resolver.resolve(&SiteArg::Named("beta".into())).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(first.name, "alpha");
        assert_eq!(calls.get(), 1);
    }
}
