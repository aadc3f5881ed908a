//! Configuration validation

use super::{BenchConfig, RunMode};
use crate::error::{BenchError, BenchResult};

/// Largest accepted IO buffer
pub const MAX_BUFFER_SIZE: usize = 1024 * 1024 * 1024;

/// Validate configuration for the given run mode
///
/// `clean` only needs a working directory; `write` and `read` need the
/// full task shape.
pub fn validate_config(config: &BenchConfig, mode: RunMode) -> BenchResult<()> {
    if config.working_dir.as_os_str().is_empty() {
        return Err(BenchError::Config("working directory must not be empty".into()));
    }

    if mode == RunMode::Clean {
        return Ok(());
    }

    if config.num_files == 0 {
        return Err(BenchError::Config("number of files must be greater than 0".into()));
    }

    if config.file_size == 0 {
        return Err(BenchError::Config("file size must be greater than 0".into()));
    }

    if config.buffer_size == 0 || config.buffer_size > MAX_BUFFER_SIZE {
        return Err(BenchError::Config(format!(
            "buffer size must be between 1 and {} bytes, got {}",
            MAX_BUFFER_SIZE, config.buffer_size
        )));
    }

    for key in config.fs_options.keys() {
        if key.trim().is_empty() {
            return Err(BenchError::Config("filesystem option keys must not be empty".into()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn valid() -> BenchConfig {
        BenchConfig {
            working_dir: PathBuf::from("/tmp/dfsio"),
            num_files: 4,
            file_size: 4096,
            buffer_size: 1024,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid(), RunMode::Write).is_ok());
        assert!(validate_config(&valid(), RunMode::Read).is_ok());
    }

    #[test]
    fn test_zero_files_rejected() {
        let config = BenchConfig { num_files: 0, ..valid() };
        assert!(matches!(
            validate_config(&config, RunMode::Write),
            Err(BenchError::Config(_))
        ));
    }

    #[test]
    fn test_zero_size_rejected() {
        let config = BenchConfig { file_size: 0, ..valid() };
        assert!(validate_config(&config, RunMode::Read).is_err());
    }

    #[test]
    fn test_buffer_bounds() {
        let config = BenchConfig { buffer_size: 0, ..valid() };
        assert!(validate_config(&config, RunMode::Write).is_err());

        let config = BenchConfig { buffer_size: MAX_BUFFER_SIZE + 1, ..valid() };
        assert!(validate_config(&config, RunMode::Write).is_err());
    }

    #[test]
    fn test_clean_ignores_task_shape() {
        let config = BenchConfig { num_files: 0, file_size: 0, ..valid() };
        assert!(validate_config(&config, RunMode::Clean).is_ok());
    }

    #[test]
    fn test_empty_working_dir_rejected() {
        let config = BenchConfig { working_dir: PathBuf::new(), ..valid() };
        assert!(validate_config(&config, RunMode::Clean).is_err());
    }
}
