//! dfsio - distributed filesystem throughput benchmark
//!
//! dfsio measures how fast a shared filesystem moves data when many clients
//! write or read large files at once. One task owns one file; tasks run in
//! parallel and their timings are folded into a single aggregate from which
//! throughput, mean per-task rate and rate deviation are reported.
//!
//! # Architecture
//!
//! - **Manifest**: deterministic task list persisted under `io_control`
//! - **Tasks**: write or read one file under `io_data` and time the transfer
//! - **Runner**: fans tasks out to an executor (rayon pool or serial)
//! - **Stats**: order-independent reduction of per-task measurements
//! - **Output**: labeled report lines, result file, JSON
//! - **Orchestrator**: sequences one clean, write or read run

pub mod config;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod runner;
pub mod stats;
pub mod task;
pub mod util;

// Re-export commonly used types
pub use config::{BenchConfig, RunMode};
pub use error::{BenchError, BenchResult};
pub use orchestrator::{BenchContext, BenchmarkOrchestrator};
pub use output::Report;

/// Result type used by the configuration and output layers
pub type Result<T> = anyhow::Result<T>;
