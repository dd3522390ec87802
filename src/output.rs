//! Output writing with per-stage path claims.
//!
//! Stages never touch the output tree directly. Each one gets a
//! [`StageWriter`] rooted at its own output directory; every write is
//! recorded in the run's [`OutputLedger`], and a path claimed twice (by two
//! stages, or twice by one) fails instead of being silently overwritten.

use crate::stages::Stage;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::{
    fs, io,
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

/// Output-related errors
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("`{path}` is written by both {owner} and {stage}")]
    Collision {
        path: PathBuf,
        owner: Stage,
        stage: Stage,
    },

    #[error("{stage} tried to write `{path}` outside its output directory")]
    Escape { path: PathBuf, stage: Stage },

    #[error("IO error when writing `{0}`")]
    Io(PathBuf, #[source] io::Error),
}

/// Where artifacts end up.
pub trait Sink: Send + Sync {
    /// Write `content` to `path`, creating parent directories.
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Recursively remove `path`. A missing path is not an error.
    fn remove_all(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
pub struct DiskSink;

impl Sink for DiskSink {
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        match fs::remove_dir_all(path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotADirectory => fs::remove_file(path),
            other => other,
        }
    }
}

/// Records which stage wrote each path during one build run.
pub struct OutputLedger {
    sink: Arc<dyn Sink>,
    claims: Mutex<FxHashMap<PathBuf, Stage>>,
}

impl OutputLedger {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self {
            sink,
            claims: Mutex::new(FxHashMap::default()),
        }
    }

    /// Writer for `stage`, confined to `root`.
    pub fn writer(&self, stage: Stage, root: &Path) -> StageWriter<'_> {
        StageWriter {
            ledger: self,
            stage,
            root: root.to_path_buf(),
        }
    }

    /// Remove a whole output tree.
    pub fn remove_all(&self, path: &Path) -> Result<(), OutputError> {
        self.sink
            .remove_all(path)
            .map_err(|err| OutputError::Io(path.to_path_buf(), err))
    }

    /// Number of paths written so far.
    pub fn written(&self) -> usize {
        self.claims.lock().len()
    }

    fn claim(&self, path: &Path, stage: Stage) -> Result<(), OutputError> {
        let mut claims = self.claims.lock();
        if let Some(&owner) = claims.get(path) {
            return Err(OutputError::Collision {
                path: path.to_path_buf(),
                owner,
                stage,
            });
        }
        claims.insert(path.to_path_buf(), stage);
        Ok(())
    }
}

/// A stage's handle for writing into its own output directory.
pub struct StageWriter<'a> {
    ledger: &'a OutputLedger,
    stage: Stage,
    root: PathBuf,
}

impl StageWriter<'_> {
    /// Write `content` to `relative` under the stage's output directory.
    pub fn write(&self, relative: &Path, content: &[u8]) -> Result<PathBuf, OutputError> {
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(OutputError::Escape {
                path: relative.to_path_buf(),
                stage: self.stage,
            });
        }

        let path = self.root.join(relative);
        self.ledger.claim(&path, self.stage)?;
        self.ledger
            .sink
            .write(&path, content)
            .map_err(|err| OutputError::Io(path.clone(), err))?;
        Ok(path)
    }
}
