//! Dependency graph of build tasks.
//!
//! Tasks declare which tasks they run after. The graph is validated once at
//! construction (duplicates, unknown dependencies, cycles) and layered into
//! waves; running it executes every task of a wave concurrently and waits
//! for the wave before starting the next.
//!
//! ```text
//! wave 0:  clean
//!            │
//! wave 1:  lint  scripts  styles  svgs  transpile  copy
//! ```
//!
//! A task whose predecessor failed (or was itself blocked) is not run and
//! reports [`TaskResult::Blocked`]. A skipped predecessor does not block.

use anyhow::{Result, bail};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::{fmt, hash::Hash};
use thiserror::Error;

/// Graph construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("task `{0}` is declared twice")]
    Duplicate(String),

    #[error("task `{task}` runs after unknown task `{dependency}`")]
    UnknownDependency { task: String, dependency: String },

    #[error("tasks form a cycle: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

/// Outcome of one task in one run.
#[derive(Debug)]
pub enum TaskResult {
    /// Finished; carries the number of files written
    Succeeded(usize),
    /// Disabled by its toggle
    Skipped,
    Failed(anyhow::Error),
    /// Not run because a predecessor failed
    Blocked,
}

impl TaskResult {
    /// Whether dependents of this task must not run.
    pub const fn blocks_dependents(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Blocked)
    }
}

/// Collects task declarations before validation.
pub struct GraphBuilder<T> {
    tasks: Vec<(T, Vec<T>)>,
}

impl<T> GraphBuilder<T>
where
    T: Copy + Eq + Hash + fmt::Display,
{
    /// Declare `task`, running after every task in `after`.
    pub fn task(mut self, task: T, after: &[T]) -> Self {
        self.tasks.push((task, after.to_vec()));
        self
    }

    /// Validate the declarations and layer them into waves.
    pub fn build(self) -> Result<TaskGraph<T>, GraphError> {
        let mut known = FxHashSet::default();
        for (task, _) in &self.tasks {
            if !known.insert(*task) {
                return Err(GraphError::Duplicate(task.to_string()));
            }
        }

        for (task, after) in &self.tasks {
            if let Some(dependency) = after.iter().find(|d| !known.contains(*d)) {
                return Err(GraphError::UnknownDependency {
                    task: task.to_string(),
                    dependency: dependency.to_string(),
                });
            }
        }

        // Kahn's algorithm, one wave per round
        let mut placed = FxHashSet::default();
        let mut remaining: Vec<&(T, Vec<T>)> = self.tasks.iter().collect();
        let mut waves = Vec::new();

        while !remaining.is_empty() {
            let (ready, blocked): (Vec<_>, Vec<_>) = remaining
                .into_iter()
                .partition(|(_, after)| after.iter().all(|d| placed.contains(d)));

            if ready.is_empty() {
                return Err(GraphError::Cycle(
                    blocked.iter().map(|(task, _)| task.to_string()).collect(),
                ));
            }

            let wave: Vec<T> = ready.iter().map(|(task, _)| *task).collect();
            placed.extend(wave.iter().copied());
            waves.push(wave);
            remaining = blocked;
        }

        let after = self.tasks.into_iter().collect();
        Ok(TaskGraph { after, waves })
    }
}

/// A validated, layered task graph.
#[derive(Debug)]
pub struct TaskGraph<T> {
    after: FxHashMap<T, Vec<T>>,
    waves: Vec<Vec<T>>,
}

impl<T> TaskGraph<T>
where
    T: Copy + Eq + Hash + fmt::Display + Send + Sync,
{
    pub fn builder() -> GraphBuilder<T> {
        GraphBuilder { tasks: Vec::new() }
    }

    /// Tasks grouped into waves, in execution order.
    #[cfg(test)]
    pub fn waves(&self) -> &[Vec<T>] {
        &self.waves
    }

    /// Run every task with `run`, wave by wave.
    pub fn run<F>(&self, run: F) -> RunReport<T>
    where
        F: Fn(T) -> TaskResult + Sync,
    {
        let mut results: Vec<(T, TaskResult)> = Vec::new();

        for wave in &self.waves {
            let outcomes: Vec<(T, TaskResult)> = {
                let done: FxHashMap<T, &TaskResult> = results.iter().map(|(t, r)| (*t, r)).collect();
                wave.par_iter()
                    .map(|&task| {
                        let blocked = self.after[&task]
                            .iter()
                            .any(|d| done.get(d).is_some_and(|r| r.blocks_dependents()));
                        let result = if blocked { TaskResult::Blocked } else { run(task) };
                        (task, result)
                    })
                    .collect()
            };
            results.extend(outcomes);
        }

        RunReport { results }
    }
}

/// Per-task outcomes of one run, in execution order.
#[derive(Debug)]
pub struct RunReport<T> {
    results: Vec<(T, TaskResult)>,
}

impl<T> RunReport<T>
where
    T: Copy + Eq + fmt::Display,
{
    #[cfg(test)]
    pub fn get(&self, task: T) -> Option<&TaskResult> {
        self.results.iter().find(|(t, _)| *t == task).map(|(_, r)| r)
    }

    /// Tasks that failed themselves (blocked tasks are not included).
    pub fn failed(&self) -> Vec<T> {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, TaskResult::Failed(_)))
            .map(|(t, _)| *t)
            .collect()
    }

    pub fn is_success(&self) -> bool {
        !self.results.iter().any(|(_, r)| r.blocks_dependents())
    }

    /// Collapse the report into an error naming the failed tasks.
    pub fn into_result(self) -> Result<()> {
        let failed = self.failed();
        if failed.is_empty() {
            return Ok(());
        }

        let names: Vec<_> = failed.iter().map(ToString::to_string).collect();
        bail!("build failed: {}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use parking_lot::Mutex;

    fn diamond() -> TaskGraph<&'static str> {
        TaskGraph::builder()
            .task("clean", &[])
            .task("a", &["clean"])
            .task("b", &["clean"])
            .task("c", &["a"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_waves_follow_edges() {
        let graph = diamond();
        assert_eq!(graph.waves(), &[vec!["clean"], vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = TaskGraph::builder().task("a", &[]).task("a", &[]).build().unwrap_err();
        assert_eq!(err, GraphError::Duplicate("a".into()));
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let err = TaskGraph::builder().task("a", &["ghost"]).build().unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownDependency {
                task: "a".into(),
                dependency: "ghost".into()
            }
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let err = TaskGraph::builder()
            .task("root", &[])
            .task("a", &["b"])
            .task("b", &["a"])
            .build()
            .unwrap_err();
        assert_eq!(err, GraphError::Cycle(vec!["a".into(), "b".into()]));
        assert_eq!(err.to_string(), "tasks form a cycle: a, b");
    }

    #[test]
    fn test_run_order_respects_waves() {
        let graph = diamond();
        let order = Mutex::new(Vec::new());

        let report = graph.run(|task| {
            order.lock().push(task);
            TaskResult::Succeeded(1)
        });

        let order = order.into_inner();
        assert_eq!(order.first(), Some(&"clean"));
        assert_eq!(order.last(), Some(&"c"));
        assert!(report.is_success());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_failure_blocks_dependents_only() {
        let graph = diamond();
        let ran = Mutex::new(Vec::new());

        let report = graph.run(|task| {
            ran.lock().push(task);
            match task {
                "a" => TaskResult::Failed(anyhow!("boom")),
                _ => TaskResult::Succeeded(0),
            }
        });

        assert!(!ran.lock().contains(&"c"));
        assert!(matches!(report.get("b"), Some(TaskResult::Succeeded(0))));
        assert!(matches!(report.get("c"), Some(TaskResult::Blocked)));
        assert_eq!(report.failed(), vec!["a"]);
        assert!(!report.is_success());

        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "build failed: a");
    }

    #[test]
    fn test_skipped_does_not_block() {
        let graph = diamond();
        let report = graph.run(|task| match task {
            "clean" => TaskResult::Skipped,
            _ => TaskResult::Succeeded(0),
        });

        assert!(report.is_success());
        assert!(matches!(report.get("c"), Some(TaskResult::Succeeded(0))));
    }

    #[test]
    fn test_failed_root_blocks_everything() {
        let graph = diamond();
        let report = graph.run(|task| match task {
            "clean" => TaskResult::Failed(anyhow!("permission denied")),
            _ => TaskResult::Succeeded(0),
        });

        for task in ["a", "b", "c"] {
            assert!(matches!(report.get(task), Some(TaskResult::Blocked)));
        }
        assert_eq!(report.failed(), vec!["clean"]);
    }
}
