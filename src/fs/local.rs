//! Local (mounted) filesystem client
//!
//! Shared filesystems that expose a POSIX mount are driven through `std::fs`.
//! Client options are recorded and logged but have no effect on local files.

use super::{FileSystem, OutputStream};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

/// `std::fs` backed filesystem client
#[derive(Debug, Default, Clone)]
pub struct LocalFs {
    options: BTreeMap<String, String>,
}

impl LocalFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client carrying passthrough options
    pub fn with_options(options: BTreeMap<String, String>) -> Self {
        for (key, value) in &options {
            debug!(key = %key, value = %value, "filesystem client option");
        }
        Self { options }
    }
}

/// Output stream over a local file
///
/// Writes are not buffered further; the task already writes whole
/// buffer-sized chunks.
struct LocalOutput {
    file: File,
}

impl Write for LocalOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl OutputStream for LocalOutput {
    fn sync_all(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_all()
    }
}

impl FileSystem for LocalFs {
    fn create(&self, path: &Path) -> io::Result<Box<dyn OutputStream>> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Box::new(LocalOutput { file }))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(path)?;
        Ok(Box::new(file))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        match fs::remove_dir_all(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_write_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");
        let fs = LocalFs::new();

        let mut out = fs.create(&path).unwrap();
        out.write_all(&[7u8; 100]).unwrap();
        out.sync_all().unwrap();
        drop(out);

        let contents = fs.read_file(&path).unwrap();
        assert_eq!(contents.len(), 100);
        assert!(contents.iter().all(|&b| b == 7));
    }

    #[test]
    fn test_create_truncates_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");
        std::fs::write(&path, vec![1u8; 4096]).unwrap();

        let fs = LocalFs::new();
        let mut out = fs.create(&path).unwrap();
        out.write_all(b"abc").unwrap();
        out.sync_all().unwrap();
        drop(out);

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalFs::new();
        let err = fs.open(&temp_dir.path().join("absent")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalFs::new();
        assert!(fs.remove_dir_all(&temp_dir.path().join("nope")).is_ok());
        assert!(fs.remove_file(&temp_dir.path().join("nope.txt")).is_ok());
    }

    #[test]
    fn test_dir_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a/b/c");
        let fs = LocalFs::new();

        fs.create_dir_all(&dir).unwrap();
        assert!(fs.exists(&dir));

        fs.write_file(&dir.join("f"), b"x").unwrap();
        fs.remove_dir_all(&temp_dir.path().join("a")).unwrap();
        assert!(!fs.exists(&dir));
    }

    #[test]
    fn test_options_kept() {
        let mut options = BTreeMap::new();
        options.insert("io.compression.codec".to_string(), "gzip".to_string());
        let fs = LocalFs::with_options(options);
        assert_eq!(fs.options().len(), 1);
    }
}
