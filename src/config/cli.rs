//! CLI argument parsing using clap

use super::{CompressionCodec, FillPattern, RunMode};
use clap::Parser;
use std::path::PathBuf;

/// dfsio - distributed filesystem throughput benchmark
#[derive(Parser, Debug)]
#[command(name = "dfsio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Run mode: clean, write, or read
    #[arg(value_enum)]
    pub mode: RunMode,

    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Benchmark working directory on the shared filesystem
    #[arg(short = 'w', long = "dir", env = "DFSIO_DIR")]
    pub working_dir: Option<PathBuf>,

    /// Number of files to write or read
    #[arg(short = 'n', long = "nr-files")]
    pub num_files: Option<usize>,

    /// Size of each file (e.g., 64m, 1g)
    #[arg(short = 's', long = "size")]
    pub file_size: Option<String>,

    /// IO buffer size (e.g., 1m, 64k)
    #[arg(short = 'b', long)]
    pub buffer_size: Option<String>,

    /// Compression codec handed to the filesystem client
    #[arg(long, value_enum)]
    pub compression: Option<CompressionCodec>,

    /// Filesystem client option as key=value (repeatable)
    #[arg(short = 'D', long = "conf", value_name = "KEY=VALUE")]
    pub fs_options: Vec<String>,

    /// Number of worker threads (0 = one per CPU)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Byte pattern written into data files
    #[arg(long, value_enum)]
    pub fill_pattern: Option<FillPattern>,

    /// Append report lines to this local file
    #[arg(long = "res-file")]
    pub result_file: Option<PathBuf>,

    /// Write the report as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
