//! Benchmark orchestration
//!
//! One run executes exactly one mode, chosen before anything touches storage:
//!
//! - **clean**: remove the control and data directories
//! - **write**: regenerate the manifest, reset the data directory, run write
//!   tasks, reduce, report
//! - **read**: load the manifest left by a write, run read tasks, reduce,
//!   report
//!
//! Fatal errors (storage, precondition, invalid manifest, configuration) abort
//! the run before any task is dispatched. Task failures never do; they show up
//! in the report as `executed < requested`.

use crate::config::validator::validate_config;
use crate::config::{BenchConfig, RunMode};
use crate::error::{BenchError, BenchResult};
use crate::fs::FileSystem;
use crate::manifest::{Manifest, ManifestGenerator};
use crate::output::text::log_report;
use crate::output::Report;
use crate::runner::{TaskExecutor, TaskRunner};
use crate::task::read::ReadTask;
use crate::task::write::WriteTask;
use crate::task::IoTask;
use crate::util::time::{format_duration, Timestamp};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a run needs, built once by the caller
#[derive(Clone)]
pub struct BenchContext {
    pub config: Arc<BenchConfig>,
    pub fs: Arc<dyn FileSystem>,
    pub executor: Arc<dyn TaskExecutor>,
}

impl BenchContext {
    pub fn new(config: BenchConfig, fs: Arc<dyn FileSystem>, executor: Arc<dyn TaskExecutor>) -> Self {
        Self {
            config: Arc::new(config),
            fs,
            executor,
        }
    }
}

/// Sequences one benchmark run
pub struct BenchmarkOrchestrator {
    ctx: BenchContext,
    manifests: ManifestGenerator,
}

impl BenchmarkOrchestrator {
    pub fn new(ctx: BenchContext) -> Self {
        let manifests = ManifestGenerator::new(Arc::clone(&ctx.fs));
        Self { ctx, manifests }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.ctx.config
    }

    /// Run `mode` to completion
    ///
    /// Returns the report of a write or read run, `None` for clean.
    pub fn run(&self, mode: RunMode) -> BenchResult<Option<Report>> {
        validate_config(&self.ctx.config, mode)?;
        info!(mode = %mode, dir = %self.ctx.config.working_dir.display(), "starting run");

        match mode {
            RunMode::Clean => {
                self.clean()?;
                Ok(None)
            }
            RunMode::Write => self.write().map(Some),
            RunMode::Read => self.read().map(Some),
        }
    }

    fn clean(&self) -> BenchResult<()> {
        for dir in [self.ctx.config.control_dir(), self.ctx.config.data_dir()] {
            self.ctx
                .fs
                .remove_dir_all(&dir)
                .map_err(|e| BenchError::storage(&dir, e))?;
            info!(dir = %dir.display(), "removed");
        }
        Ok(())
    }

    fn write(&self) -> BenchResult<Report> {
        let config = &self.ctx.config;
        let start = Timestamp::now();

        let manifest = self.manifests.generate(
            config.num_files,
            config.file_size,
            config.compression,
            &config.control_dir(),
        )?;

        let data_dir = config.data_dir();
        self.ctx
            .fs
            .remove_dir_all(&data_dir)
            .map_err(|e| BenchError::storage(&data_dir, e))?;
        self.ctx
            .fs
            .create_dir_all(&data_dir)
            .map_err(|e| BenchError::storage(&data_dir, e))?;

        let task = WriteTask::new(
            Arc::clone(&self.ctx.fs),
            data_dir,
            config.buffer_size,
            config.fill_pattern,
        )?;
        Ok(self.execute(RunMode::Write, &manifest, &task, start))
    }

    fn read(&self) -> BenchResult<Report> {
        let config = &self.ctx.config;
        let start = Timestamp::now();

        let manifest = self.manifests.load(&config.control_dir())?;

        let data_dir = config.data_dir();
        if !self.ctx.fs.exists(&data_dir) {
            return Err(BenchError::Precondition(format!(
                "no data directory at {}; run `write` first",
                data_dir.display()
            )));
        }

        let header = manifest.header();
        if header.total_files != config.num_files || header.file_size != config.file_size {
            warn!(
                manifest_files = header.total_files,
                manifest_size = header.file_size,
                requested_files = config.num_files,
                requested_size = config.file_size,
                "requested shape differs from the persisted manifest; reading what was written"
            );
        }

        let task = ReadTask::new(Arc::clone(&self.ctx.fs), data_dir, config.buffer_size)?;
        Ok(self.execute(RunMode::Read, &manifest, &task, start))
    }

    fn execute(&self, mode: RunMode, manifest: &Manifest, task: &dyn IoTask, start: Timestamp) -> Report {
        let runner = TaskRunner::new(self.ctx.executor.as_ref());
        let stats = runner.run_and_reduce(manifest, task);
        let elapsed = start.elapsed();

        info!(
            mode = %mode,
            executed = stats.executed(),
            requested = stats.requested,
            elapsed = %format_duration(elapsed),
            "run finished"
        );

        let report = Report::new(
            mode,
            &stats,
            elapsed,
            self.ctx.config.buffer_size,
            manifest.header().compression,
        );
        log_report(&report);
        report
    }
}
