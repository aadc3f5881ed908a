//! Fault-injecting filesystem for testing
//!
//! `FaultyFs` forwards every call to an inner client, except for files whose
//! name has been marked as failing. Failures can be injected at open time or
//! during the data transfer, which lets tests simulate a single broken task
//! inside an otherwise healthy run.
//!
//! # Example
//!
//! ```
//! use dfsio::fs::{FileSystem, local::LocalFs, mock::{FaultyFs, FaultKind}};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let fs = FaultyFs::new(Arc::new(LocalFs::new()));
//! fs.fail_file("test_io_3", FaultKind::Open);
//! assert!(fs.create(Path::new("/tmp/dfsio-doc/test_io_3")).is_err());
//! ```

use super::{FileSystem, OutputStream};
use std::collections::{BTreeMap, HashMap};
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Where an injected failure fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// `create`/`open` fails
    Open,
    /// The first data write or read fails
    Transfer,
    /// `sync_all` fails after all data was written
    Sync,
}

/// Filesystem wrapper that fails selected files
#[derive(Clone)]
pub struct FaultyFs {
    inner: Arc<dyn FileSystem>,
    faults: Arc<Mutex<HashMap<String, FaultKind>>>,
}

impl FaultyFs {
    pub fn new(inner: Arc<dyn FileSystem>) -> Self {
        Self {
            inner,
            faults: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Inject a failure for every file named `name`
    pub fn fail_file(&self, name: &str, kind: FaultKind) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.insert(name.to_string(), kind);
        }
    }

    fn fault_for(&self, path: &Path) -> Option<FaultKind> {
        let name = path.file_name()?.to_str()?;
        self.faults.lock().ok()?.get(name).copied()
    }
}

fn injected(what: &str) -> io::Error {
    io::Error::other(format!("injected {} failure", what))
}

struct FaultyOutput {
    inner: Box<dyn OutputStream>,
    fault: Option<FaultKind>,
}

impl Write for FaultyOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fault == Some(FaultKind::Transfer) {
            return Err(injected("write"));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl OutputStream for FaultyOutput {
    fn sync_all(&mut self) -> io::Result<()> {
        if self.fault == Some(FaultKind::Sync) {
            return Err(injected("sync"));
        }
        self.inner.sync_all()
    }
}

/// Keeps the underlying file open while every read fails
struct FaultyInput {
    _inner: Box<dyn Read + Send>,
}

impl Read for FaultyInput {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(injected("read"))
    }
}

impl FileSystem for FaultyFs {
    fn create(&self, path: &Path) -> io::Result<Box<dyn OutputStream>> {
        let fault = self.fault_for(path);
        if fault == Some(FaultKind::Open) {
            return Err(injected("create"));
        }
        let inner = self.inner.create(path)?;
        Ok(Box::new(FaultyOutput { inner, fault }))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        match self.fault_for(path) {
            Some(FaultKind::Open) => Err(injected("open")),
            Some(FaultKind::Transfer) => {
                let inner = self.inner.open(path)?;
                Ok(Box::new(FaultyInput { _inner: inner }))
            }
            _ => self.inner.open(path),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.inner.remove_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.inner.remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn options(&self) -> &BTreeMap<String, String> {
        self.inner.options()
    }
}
