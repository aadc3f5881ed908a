//! Read task
//!
//! Opens one previously written data file and reads it to end-of-stream in
//! `buffer_size` chunks, discarding the content. A file shorter than the
//! manifest says is a failed task.

use super::{check_buffer_size, IoTask, TaskKind};
use crate::error::{BenchError, BenchResult};
use crate::fs::FileSystem;
use crate::manifest::TaskSpec;
use crate::stats::Measurement;
use crate::util::buffer::IoBuffer;
use crate::util::time::Timestamp;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub struct ReadTask {
    fs: Arc<dyn FileSystem>,
    data_dir: PathBuf,
    buffer_size: usize,
}

impl ReadTask {
    /// Fails with `BenchError::Config` when `buffer_size` is 0
    pub fn new(fs: Arc<dyn FileSystem>, data_dir: PathBuf, buffer_size: usize) -> BenchResult<Self> {
        check_buffer_size(buffer_size)?;
        Ok(Self {
            fs,
            data_dir,
            buffer_size,
        })
    }
}

impl IoTask for ReadTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Read
    }

    fn run(&self, spec: &TaskSpec) -> BenchResult<Measurement> {
        let mut buffer = IoBuffer::new(self.buffer_size);
        let path = self.data_dir.join(&spec.name);
        let io_err = |e| BenchError::io(&spec.name, e);

        let start = Timestamp::now();

        let mut input = self.fs.open(&path).map_err(io_err)?;
        let mut total: u64 = 0;
        loop {
            match input.read(buffer.as_mut_slice()) {
                Ok(0) => break,
                Ok(n) => total += n as u64,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_err(e)),
            }
        }
        drop(input);

        let millis = start.elapsed_millis();

        if total < spec.size_bytes {
            return Err(BenchError::ShortRead {
                task: spec.name.clone(),
                expected: spec.size_bytes,
                actual: total,
            });
        }

        debug!(task = %spec.name, bytes = total, millis, "read task finished");
        Ok(Measurement::from_transfer(total, millis))
    }
}
