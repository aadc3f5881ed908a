//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Subdirectory holding the persisted manifest
pub const CONTROL_DIR: &str = "io_control";

/// Subdirectory holding the benchmark data files
pub const DATA_DIR: &str = "io_data";

/// Option key under which the compression codec is forwarded to the filesystem client
pub const COMPRESSION_OPTION_KEY: &str = "io.compression.codec";

/// Run mode, selected once at start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Delete the manifest and data directories
    Clean,
    /// Regenerate the manifest and write every file
    Write,
    /// Read back the files of a previous write
    Read,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunMode::Clean => write!(f, "clean"),
            RunMode::Write => write!(f, "write"),
            RunMode::Read => write!(f, "read"),
        }
    }
}

/// Compression codec handed to the filesystem client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    None,
    Gzip,
    Bzip2,
    Lz4,
    Snappy,
    Zstd,
    Deflate,
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CompressionCodec::None => "none",
            CompressionCodec::Gzip => "gzip",
            CompressionCodec::Bzip2 => "bzip2",
            CompressionCodec::Lz4 => "lz4",
            CompressionCodec::Snappy => "snappy",
            CompressionCodec::Zstd => "zstd",
            CompressionCodec::Deflate => "deflate",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for CompressionCodec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(CompressionCodec::None),
            "gzip" => Ok(CompressionCodec::Gzip),
            "bzip2" => Ok(CompressionCodec::Bzip2),
            "lz4" => Ok(CompressionCodec::Lz4),
            "snappy" => Ok(CompressionCodec::Snappy),
            "zstd" => Ok(CompressionCodec::Zstd),
            "deflate" => Ok(CompressionCodec::Deflate),
            other => Err(format!("unknown compression codec: {}", other)),
        }
    }
}

/// Byte pattern written into data files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FillPattern {
    /// All zeros
    Zeros,
    /// Sequential bytes (0x00, 0x01, ..., 0xFF, 0x00, ...)
    #[default]
    Sequential,
}

/// Complete benchmark configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Benchmark working directory on the shared filesystem
    pub working_dir: PathBuf,
    /// Number of files (one task per file)
    pub num_files: usize,
    /// Size of each file in bytes
    pub file_size: u64,
    /// IO buffer size in bytes
    pub buffer_size: usize,
    /// Compression codec forwarded to the filesystem client
    pub compression: Option<CompressionCodec>,
    /// Passthrough filesystem client options
    pub fs_options: BTreeMap<String, String>,
    /// Worker threads (0 = one per CPU)
    pub threads: usize,
    /// Fill pattern for write tasks
    pub fill_pattern: FillPattern,
    /// Local file the report lines are appended to
    pub result_file: Option<PathBuf>,
    /// Path for a JSON copy of the report
    pub json_output: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("/benchmarks/dfsio"),
            num_files: 1,
            file_size: 1024 * 1024,
            buffer_size: 1_000_000,
            compression: None,
            fs_options: BTreeMap::new(),
            threads: 0,
            fill_pattern: FillPattern::default(),
            result_file: None,
            json_output: None,
        }
    }
}

impl BenchConfig {
    pub fn control_dir(&self) -> PathBuf {
        self.working_dir.join(CONTROL_DIR)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.working_dir.join(DATA_DIR)
    }

    /// Worker thread count with 0 resolved to the number of CPUs
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    /// Client options with the compression codec folded in
    pub fn client_options(&self) -> BTreeMap<String, String> {
        let mut options = self.fs_options.clone();
        if let Some(codec) = self.compression {
            options.insert(COMPRESSION_OPTION_KEY.to_string(), codec.to_string());
        }
        options
    }
}
