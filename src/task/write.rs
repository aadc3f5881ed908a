//! Write task
//!
//! Creates one data file and fills it with `size_bytes` of a deterministic
//! pattern, `buffer_size` bytes at a time. The timer covers create through
//! durable flush and close.

use super::{check_buffer_size, IoTask, TaskKind};
use crate::config::FillPattern;
use crate::error::{BenchError, BenchResult};
use crate::fs::FileSystem;
use crate::manifest::TaskSpec;
use crate::stats::Measurement;
use crate::util::buffer::IoBuffer;
use crate::util::time::Timestamp;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub struct WriteTask {
    fs: Arc<dyn FileSystem>,
    data_dir: PathBuf,
    buffer_size: usize,
    pattern: FillPattern,
}

impl WriteTask {
    /// Fails with `BenchError::Config` when `buffer_size` is 0
    pub fn new(
        fs: Arc<dyn FileSystem>,
        data_dir: PathBuf,
        buffer_size: usize,
        pattern: FillPattern,
    ) -> BenchResult<Self> {
        check_buffer_size(buffer_size)?;
        Ok(Self {
            fs,
            data_dir,
            buffer_size,
            pattern,
        })
    }
}

impl IoTask for WriteTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Write
    }

    fn run(&self, spec: &TaskSpec) -> BenchResult<Measurement> {
        let buffer = IoBuffer::filled(self.buffer_size, self.pattern);
        let path = self.data_dir.join(&spec.name);
        let io_err = |e| BenchError::io(&spec.name, e);

        let start = Timestamp::now();

        let mut out = self.fs.create(&path).map_err(io_err)?;
        let mut remaining = spec.size_bytes;
        while remaining > 0 {
            let chunk = buffer.chunk(remaining);
            out.write_all(chunk).map_err(io_err)?;
            remaining -= chunk.len() as u64;
        }
        out.sync_all().map_err(io_err)?;
        drop(out);

        let millis = start.elapsed_millis();
        debug!(task = %spec.name, bytes = spec.size_bytes, millis, "write task finished");

        Ok(Measurement::from_transfer(spec.size_bytes, millis))
    }
}
