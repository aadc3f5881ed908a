//! CLI to Config conversion utilities

use super::cli::Cli;
use super::BenchConfig;
use anyhow::{Context, Result};

/// Parse a size string (e.g., "1G", "100M", "4k") to bytes
pub fn parse_size(s: &str) -> Result<u64> {
    const UNITS: [(&str, u64); 9] = [
        ("kb", 1024),
        ("k", 1024),
        ("mb", 1024 * 1024),
        ("m", 1024 * 1024),
        ("gb", 1024 * 1024 * 1024),
        ("g", 1024 * 1024 * 1024),
        ("tb", 1024 * 1024 * 1024 * 1024),
        ("t", 1024 * 1024 * 1024 * 1024),
        ("b", 1),
    ];

    let s = s.trim().to_lowercase();
    let (num_str, multiplier) = UNITS
        .iter()
        .find_map(|&(suffix, mult)| s.strip_suffix(suffix).map(|n| (n, mult)))
        .unwrap_or((s.as_str(), 1));

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Size out of range: {}", s))
}

/// Parse a `key=value` filesystem client option
pub fn parse_key_value(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .with_context(|| format!("Expected KEY=VALUE, got: {}", s))?;

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Empty option key in: {}", s);
    }

    Ok((key.to_string(), value.trim().to_string()))
}

/// Apply CLI arguments on top of a base configuration (CLI takes precedence)
pub fn apply_cli(cli: &Cli, mut config: BenchConfig) -> Result<BenchConfig> {
    if let Some(ref dir) = cli.working_dir {
        config.working_dir = dir.clone();
    }
    if let Some(n) = cli.num_files {
        config.num_files = n;
    }
    if let Some(ref size) = cli.file_size {
        config.file_size = parse_size(size).context("Invalid file size")?;
    }
    if let Some(ref size) = cli.buffer_size {
        let bytes = parse_size(size).context("Invalid buffer size")?;
        config.buffer_size = usize::try_from(bytes).context("Buffer size out of range")?;
    }
    if let Some(codec) = cli.compression {
        config.compression = Some(codec);
    }
    for pair in &cli.fs_options {
        let (key, value) = parse_key_value(pair).context("Invalid filesystem option")?;
        config.fs_options.insert(key, value);
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(pattern) = cli.fill_pattern {
        config.fill_pattern = pattern;
    }
    if let Some(ref path) = cli.result_file {
        config.result_file = Some(path.clone());
    }
    if let Some(ref path) = cli.json {
        config.json_output = Some(path.clone());
    }

    Ok(config)
}

/// Build the run configuration from an optional TOML file plus CLI overrides
pub fn build_config(cli: &Cli) -> Result<BenchConfig> {
    let base = match cli.config {
        Some(ref path) => super::toml::parse_toml_file(path)?,
        None => BenchConfig::default(),
    };

    apply_cli(cli, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressionCodec;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("4k").unwrap(), 4096);
        assert_eq!(parse_size("64KB").unwrap(), 64 * 1024);
        assert_eq!(parse_size("1m").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("2G").unwrap(), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("1t").unwrap(), 1024u64.pow(4));
        assert!(parse_size("lots").is_err());
        assert!(parse_size("4kk").is_err());
        assert!(parse_size("4kkb").is_err());
        assert!(parse_size("8mm").is_err());
        assert!(parse_size("4bb").is_err());
        assert_eq!(parse_size("512b").unwrap(), 512);
        assert!(parse_size("").is_err());
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("dfs.blocksize=134217728").unwrap(),
            ("dfs.blocksize".to_string(), "134217728".to_string())
        );
        assert_eq!(
            parse_key_value("opt=a=b").unwrap(),
            ("opt".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_cli_overrides_base() {
        let cli = Cli::try_parse_from([
            "dfsio", "read", "--dir", "/scratch", "-n", "4", "-s", "2m", "-b", "64k",
            "--compression", "snappy", "-D", "a=1", "-t", "8",
        ])
        .unwrap();

        let base = BenchConfig {
            num_files: 100,
            threads: 2,
            ..Default::default()
        };
        let config = apply_cli(&cli, base).unwrap();

        assert_eq!(config.working_dir, PathBuf::from("/scratch"));
        assert_eq!(config.num_files, 4);
        assert_eq!(config.file_size, 2 * 1024 * 1024);
        assert_eq!(config.buffer_size, 64 * 1024);
        assert_eq!(config.compression, Some(CompressionCodec::Snappy));
        assert_eq!(config.fs_options.get("a").map(String::as_str), Some("1"));
        assert_eq!(config.threads, 8);
    }

    #[test]
    fn test_unset_flags_keep_base() {
        let cli = Cli::try_parse_from(["dfsio", "write"]).unwrap();
        let base = BenchConfig {
            num_files: 12,
            file_size: 4096,
            ..Default::default()
        };
        let config = apply_cli(&cli, base.clone()).unwrap();
        assert_eq!(config.num_files, 12);
        assert_eq!(config.file_size, 4096);
    }

    #[test]
    fn test_malformed_option_rejected() {
        let cli = Cli::try_parse_from(["dfsio", "write", "-D", "broken"]).unwrap();
        assert!(apply_cli(&cli, BenchConfig::default()).is_err());
    }
}
