//! File system watcher for rebuild and live reload.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Event Loop                              │
//! │                                                              │
//! │  ┌──────────┐    ┌──────────┐    ┌────────────────────────┐  │
//! │  │ notify   │───▶│ Debouncer│───▶│    handle_changes()    │  │
//! │  │ events   │    │ (300ms)  │    │  full rebuild          │  │
//! │  └──────────┘    └──────────┘    │  → reload broadcast    │  │
//! │                                  └────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rebuilds run on the event loop thread. Events that arrive while a rebuild
//! is in progress wait in the channel and are drained into the debouncer
//! afterwards, so any number of them produce exactly one follow-up rebuild.

use crate::{build::Pipeline, log, reload::ReloadHub, workspace::Workspace};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::{Duration, Instant},
};

const DEBOUNCE_MS: u64 = 300;

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// `/sites/blog/src/js/app.js` → `js/app.js`
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Batches rapid file events.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    delay: Duration,
}

impl Debouncer {
    fn new(delay: Duration) -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            delay,
        }
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty() && self.last_event.is_some_and(|t| t.elapsed() >= self.delay)
    }

    /// Drain the batch, sorted for stable log output.
    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        let mut paths: Vec<_> = self.pending.drain().collect();
        paths.sort();
        paths
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            self.delay
        }
    }
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

/// Rebuild after a change batch; broadcast a reload on success.
///
/// Returns whether the rebuild succeeded.
fn handle_changes<F>(paths: &[PathBuf], root: &Path, rebuild: F, hub: Option<&ReloadHub>) -> bool
where
    F: FnOnce() -> Result<()>,
{
    let changed: Vec<_> = paths.iter().map(|p| rel_path(p, root)).collect();
    log!("watch"; "{} changed, rebuilding...", changed.join(", "));

    match rebuild() {
        Ok(()) => {
            if let Some(hub) = hub {
                let clients = hub.broadcast();
                log!("reload"; "notified {clients} clients");
            }
            eprintln!(); // Blank line to separate rebuild sessions
            true
        }
        Err(err) => {
            log!("watch"; "build failed");
            log!("error"; "{err:#}");
            eprintln!();
            false
        }
    }
}

/// Watch the workspace sources and rebuild on change. Blocks forever.
pub fn watch_for_changes_blocking(
    workspace: &Workspace,
    pipeline: &Pipeline,
    hub: Option<&ReloadHub>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    watcher
        .watch(&workspace.input, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", workspace.input.display()))?;

    log!("watch"; "{}", workspace.input.display());
    eprintln!(); // Blank line to separate init logs from change events

    run_event_loop(&rx, Duration::from_millis(DEBOUNCE_MS), |paths| {
        handle_changes(&paths, &workspace.input, || pipeline.build(workspace), hub);
    });

    Ok(())
}

/// Feed watcher events through a debouncer and hand each ready batch to
/// `on_batch`. Returns once every sender is gone.
fn run_event_loop<F>(rx: &Receiver<notify::Result<Event>>, delay: Duration, mut on_batch: F)
where
    F: FnMut(Vec<PathBuf>),
{
    let mut debouncer = Debouncer::new(delay);

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) => debouncer.add(event),
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(RecvTimeoutError::Timeout) if debouncer.ready() => on_batch(debouncer.take()),
            Err(RecvTimeoutError::Disconnected) => {
                if !debouncer.pending.is_empty() {
                    on_batch(debouncer.take());
                }
                break;
            }
            // Irrelevant events, timeout without a ready batch
            _ => {}
        }
    }
}
