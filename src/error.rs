//! Benchmark error taxonomy
//!
//! Errors fall into two classes. Fatal errors (`Storage`, `Precondition`,
//! `InvalidManifest`, `Config`) abort a run before any task executes. Task
//! errors (`Io`, `ShortRead`) fail a single task; the run continues and the
//! failure shows up as `executed < requested` in the report.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for benchmark operations
pub type BenchResult<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    /// Manifest or data directory unreachable or unwritable
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single task's open/read/write/flush failed
    #[error("task {task} failed: {source}")]
    Io {
        task: String,
        #[source]
        source: io::Error,
    },

    /// A read task reached end-of-stream before the size recorded in the manifest
    #[error("task {task} read {actual} bytes, expected {expected}")]
    ShortRead {
        task: String,
        expected: u64,
        actual: u64,
    },

    /// Read requested without a prior write
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Persisted manifest exists but cannot be parsed
    #[error("invalid manifest {}: {reason}", path.display())]
    InvalidManifest { path: PathBuf, reason: String },

    /// Rejected configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BenchError {
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn io(task: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            task: task.into(),
            source,
        }
    }

    /// Whether this error is confined to one task (run continues)
    pub fn is_task_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::ShortRead { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_classification() {
        let io = BenchError::io("test_io_0", io::Error::other("disk full"));
        assert!(io.is_task_error());

        let short = BenchError::ShortRead {
            task: "test_io_1".into(),
            expected: 1024,
            actual: 10,
        };
        assert!(short.is_task_error());

        let storage = BenchError::storage("/bench/io_control", io::Error::other("denied"));
        assert!(!storage.is_task_error());
        assert!(!BenchError::Precondition("no manifest".into()).is_task_error());
    }

    #[test]
    fn test_error_messages_name_the_task() {
        let err = BenchError::ShortRead {
            task: "test_io_7".into(),
            expected: 2048,
            actual: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("test_io_7"));
        assert!(msg.contains("2048"));
    }
}
