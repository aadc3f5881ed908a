//! Per-file IO tasks
//!
//! An `IoTask` executes one `TaskSpec`: it opens its own file, transfers
//! exactly the bytes its `TaskSpec` names through a fixed-size buffer, closes the
//! file and reports one `Measurement`. Tasks share nothing mutable, so any
//! number of them can run concurrently and finish in any order.
//!
//! # Variants
//!
//! - **WriteTask**: creates the file and writes `size_bytes`, timing until the
//!   data is durably flushed
//! - **ReadTask**: reads the file to end-of-stream, failing on a short file
//!
//! Failures are never retried here; a retried transfer would distort the
//! measured rate.

pub mod read;
pub mod write;

pub use read::ReadTask;
pub use write::WriteTask;

use crate::error::{BenchError, BenchResult};
use crate::manifest::TaskSpec;
use crate::stats::Measurement;
use std::fmt;

/// Reject a zero-sized IO buffer before any task runs
pub(crate) fn check_buffer_size(buffer_size: usize) -> BenchResult<()> {
    if buffer_size == 0 {
        return Err(BenchError::Config("IO buffer size must be greater than 0".into()));
    }
    Ok(())
}

/// Direction of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Write,
    Read,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskKind::Write => write!(f, "write"),
            TaskKind::Read => write!(f, "read"),
        }
    }
}

/// Unit of work executed once per manifest entry
pub trait IoTask: Send + Sync {
    fn kind(&self) -> TaskKind;

    /// Execute the task for one spec
    ///
    /// Returns `BenchError::Io` or `BenchError::ShortRead` when this task
    /// fails; the caller keeps running the remaining tasks.
    fn run(&self, spec: &TaskSpec) -> BenchResult<Measurement>;
}

/// Outcome of one task, tagged with its name
#[derive(Debug)]
pub struct TaskOutcome {
    pub task: String,
    pub result: BenchResult<Measurement>,
}

impl TaskOutcome {
    /// Run `task` for `spec` and capture the result
    pub fn execute(task: &dyn IoTask, spec: &TaskSpec) -> Self {
        Self {
            task: spec.name.clone(),
            result: task.run(spec),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
