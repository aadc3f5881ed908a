//! dfsio CLI entry point

use anyhow::{Context, Result};
use dfsio::config::cli::Cli;
use dfsio::config::cli_convert::build_config;
use dfsio::fs::local::LocalFs;
use dfsio::output::{json, text, Report};
use dfsio::runner::RayonExecutor;
use dfsio::{BenchConfig, BenchContext, BenchmarkOrchestrator};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit status of a run in which some task failed
const EXIT_DEGRADED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(Some(report)) if report.is_degraded() => ExitCode::from(EXIT_DEGRADED),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<Option<Report>> {
    info!("dfsio v{}", env!("CARGO_PKG_VERSION"));

    let config = build_config(cli).context("Failed to build configuration")?;
    let fs = Arc::new(LocalFs::with_options(config.client_options()));
    let executor = Arc::new(RayonExecutor::new(config.effective_threads())?);
    let ctx = BenchContext::new(config, fs, executor);
    let orchestrator = BenchmarkOrchestrator::new(ctx);

    let report = orchestrator
        .run(cli.mode)
        .with_context(|| format!("{} run failed", cli.mode))?;

    if let Some(ref report) = report {
        publish(orchestrator.config(), report)?;
    }

    Ok(report)
}

/// Write the optional local copies of the report
fn publish(config: &BenchConfig, report: &Report) -> Result<()> {
    if let Some(ref path) = config.result_file {
        text::append_to_file(report, path)?;
        info!(path = %path.display(), "report appended");
    }
    if let Some(ref path) = config.json_output {
        json::write_json(report, path)?;
        info!(path = %path.display(), "JSON report written");
    }
    Ok(())
}
