//! External command execution utilities.
//!
//! Collaborators that live outside the process (style compiler, linter,
//! transpiler) are run through [`exec`], which resolves the program on `PATH`,
//! captures its output and turns a non-zero exit into an error carrying the
//! tool's diagnostics.

use anyhow::{Context, Result, anyhow, bail};
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Output, Stdio},
};

/// Run an external command with arguments in a working directory.
///
/// # Examples
/// ```ignore
/// exec!(root; &cmd; "--reporter=unix", file)?;
/// ```
#[macro_export]
macro_rules! exec {
    ($root:expr; $cmd:expr; $($arg:expr),* $(,)?) => {
        $crate::utils::exec::exec(
            $root,
            $cmd,
            &$crate::utils::exec::filter_args(&[$(::std::ffi::OsString::from($arg)),*]),
        )
    };
}

/// Filter out empty args.
#[inline]
pub fn filter_args(args: &[OsString]) -> Vec<OsString> {
    args.iter().filter(|a| !a.is_empty()).cloned().collect()
}

/// Execute a command and capture its output.
///
/// `cmd` is the configured command line (program followed by fixed
/// arguments); `args` are appended. The child runs in `root` with no stdin.
///
/// # Errors
/// Returns error if the program is not on `PATH`, fails to spawn, or exits
/// with a non-zero status.
pub fn exec(root: &Path, cmd: &[String], args: &[OsString]) -> Result<Output> {
    let (name, mut command) = prepare(root, cmd, args)?;

    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("Failed to execute `{name}`"))?;

    check_status(&name, &output)?;
    Ok(output)
}

/// Resolve the program and build the `Command`.
fn prepare(root: &Path, cmd: &[String], args: &[OsString]) -> Result<(String, Command)> {
    let (program, fixed) = cmd
        .split_first()
        .ok_or_else(|| anyhow!("empty command"))?;

    let resolved =
        which::which(program).with_context(|| format!("`{program}` not found on PATH"))?;

    let mut command = Command::new(resolved);
    command.args(fixed).args(args).current_dir(root);

    Ok((program.clone(), command))
}

/// Turn a failed exit status into an error with the tool's output attached.
fn check_status(name: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let details = [stderr.trim(), stdout.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    match output.status.code() {
        Some(code) if details.is_empty() => bail!("`{name}` exited with code {code}"),
        Some(code) => bail!("`{name}` exited with code {code}:\n{details}"),
        None => bail!("`{name}` was terminated by a signal"),
    }
}
