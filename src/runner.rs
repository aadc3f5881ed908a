//! Parallel task execution
//!
//! The runner fans a manifest out to an executor and collects one outcome per
//! task. The executor stands in for the cluster runtime: it decides how many
//! tasks run at once and where, and promises nothing about completion order.
//!
//! # Executors
//!
//! - **RayonExecutor**: dedicated rayon thread pool, one task per pool job
//! - **SerialExecutor**: runs tasks one after another on the calling thread
//!
//! Collection is total: a failing task produces a failed outcome and never
//! stops its siblings.

use crate::error::{BenchError, BenchResult};
use crate::manifest::{Manifest, TaskSpec};
use crate::stats::aggregator::RunStats;
use crate::task::{IoTask, TaskOutcome};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::info;

/// Parallel map/collect primitive
pub trait TaskExecutor: Send + Sync {
    /// Run `task` once for every spec and return every outcome, in any order
    fn execute(&self, specs: &[TaskSpec], task: &dyn IoTask) -> Vec<TaskOutcome>;

    /// Upper bound on concurrently running tasks
    fn parallelism(&self) -> usize;
}

/// Executor backed by a dedicated rayon pool
pub struct RayonExecutor {
    pool: ThreadPool,
}

impl RayonExecutor {
    /// Build a pool with `threads` workers
    pub fn new(threads: usize) -> BenchResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("dfsio-worker-{}", i))
            .build()
            .map_err(|e| BenchError::Config(format!("failed to build worker pool: {}", e)))?;
        Ok(Self { pool })
    }
}

impl TaskExecutor for RayonExecutor {
    fn execute(&self, specs: &[TaskSpec], task: &dyn IoTask) -> Vec<TaskOutcome> {
        self.pool.install(|| {
            specs
                .par_iter()
                .with_max_len(1)
                .map(|spec| TaskOutcome::execute(task, spec))
                .collect()
        })
    }

    fn parallelism(&self) -> usize {
        self.pool.current_num_threads()
    }
}

/// Executor that runs every task on the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialExecutor;

impl TaskExecutor for SerialExecutor {
    fn execute(&self, specs: &[TaskSpec], task: &dyn IoTask) -> Vec<TaskOutcome> {
        specs
            .iter()
            .map(|spec| TaskOutcome::execute(task, spec))
            .collect()
    }

    fn parallelism(&self) -> usize {
        1
    }
}

/// Executes a manifest through an executor and reduces the outcomes
pub struct TaskRunner<'a> {
    executor: &'a dyn TaskExecutor,
}

impl<'a> TaskRunner<'a> {
    pub fn new(executor: &'a dyn TaskExecutor) -> Self {
        Self { executor }
    }

    /// Run every task in `manifest` and return the raw outcomes
    pub fn run(&self, manifest: &Manifest, task: &dyn IoTask) -> Vec<TaskOutcome> {
        info!(
            kind = %task.kind(),
            tasks = manifest.len(),
            parallelism = self.executor.parallelism(),
            "dispatching tasks"
        );
        self.executor.execute(manifest.tasks(), task)
    }

    /// Run every task and reduce the outcomes into run statistics
    pub fn run_and_reduce(&self, manifest: &Manifest, task: &dyn IoTask) -> RunStats {
        let outcomes = self.run(manifest, task);
        RunStats::from_outcomes(manifest.len(), outcomes)
    }
}
