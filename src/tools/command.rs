//! Collaborators backed by external commands.

use super::{Linter, Transform};
use crate::{exec, log, utils::exec::exec};
use anyhow::Result;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Runs `<command> <file>` and takes stdout as the transformed content.
///
/// The file is passed by path so the tool can resolve imports relative to
/// it; the in-memory content is not used.
pub struct CommandTransform {
    name: &'static str,
    command: Vec<String>,
    root: PathBuf,
}

impl CommandTransform {
    pub fn new(name: &'static str, command: Vec<String>, root: &Path) -> Self {
        Self {
            name,
            command,
            root: root.to_path_buf(),
        }
    }
}

impl Transform for CommandTransform {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, path: &Path, _input: &[u8]) -> Result<Vec<u8>> {
        let output = exec!(&self.root; &self.command; path)?;
        Ok(output.stdout)
    }
}

/// Runs `<command> <file>...` once over every input.
///
/// A non-zero exit fails the lint stage; findings on stdout are logged.
pub struct CommandLinter {
    command: Vec<String>,
    root: PathBuf,
}

impl CommandLinter {
    pub fn new(command: Vec<String>, root: &Path) -> Self {
        Self {
            command,
            root: root.to_path_buf(),
        }
    }
}

impl Linter for CommandLinter {
    fn lint(&self, files: &[PathBuf]) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }

        let args: Vec<OsString> = files.iter().map(OsString::from).collect();
        let output = exec(&self.root, &self.command, &args)?;

        let report = String::from_utf8_lossy(&output.stdout);
        let report = report.trim();
        if !report.is_empty() {
            log!("lint"; "{report}");
        }
        Ok(())
    }
}
