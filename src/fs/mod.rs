//! Filesystem client abstraction
//!
//! The benchmark never talks to the storage system directly. Every file and
//! directory operation goes through the `FileSystem` trait, which stands in for
//! the client library of whatever shared filesystem is under test.
//!
//! # Implementations
//!
//! - **LocalFs**: `std::fs` over a mounted filesystem (NFS, Lustre, GPFS, local disk)
//! - **FaultyFs**: wraps another client and fails chosen files (testing)
//!
//! # Example
//!
//! ```no_run
//! use dfsio::fs::{FileSystem, OutputStream, local::LocalFs};
//! use std::io::Write;
//! use std::path::Path;
//!
//! let fs = LocalFs::new();
//! fs.create_dir_all(Path::new("/mnt/lustre/bench"))?;
//!
//! let mut out = fs.create(Path::new("/mnt/lustre/bench/file_0"))?;
//! out.write_all(b"data")?;
//! out.sync_all()?;
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod local;
pub mod mock;

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::Path;

/// Writable stream returned by `FileSystem::create`
///
/// Dropping the stream closes it. `sync_all` must be called before the drop
/// when the data has to be durable.
pub trait OutputStream: Write + Send {
    /// Flush buffered data and wait until the storage system has persisted it
    fn sync_all(&mut self) -> io::Result<()>;
}

/// Filesystem client trait
///
/// Implementations must be shareable across worker threads. Each task opens
/// its own streams; no stream is ever shared between tasks.
pub trait FileSystem: Send + Sync {
    /// Create (or truncate) a file for writing
    fn create(&self, path: &Path) -> io::Result<Box<dyn OutputStream>>;

    /// Open an existing file for reading
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;

    /// Create a directory and all missing parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory tree; a missing path is not an error
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a single file; a missing path is not an error
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Whether a file or directory exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Write a small file in one call, durably
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut out = self.create(path)?;
        out.write_all(contents)?;
        out.sync_all()
    }

    /// Read a small file in one call
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let mut input = self.open(path)?;
        let mut contents = Vec::new();
        input.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Client configuration passed through from the command line
    fn options(&self) -> &BTreeMap<String, String>;
}
