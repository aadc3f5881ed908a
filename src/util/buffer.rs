//! IO buffer management
//!
//! Each task owns one fixed-size buffer for its whole lifetime. Write tasks
//! fill it once with a deterministic pattern and send it repeatedly; read
//! tasks use it as a scratch area and discard what they read.

use crate::config::FillPattern;

/// Fixed-size IO buffer
pub struct IoBuffer {
    data: Vec<u8>,
}

impl IoBuffer {
    /// Create a zeroed buffer of `size` bytes
    ///
    /// # Panics
    /// Panics if size is 0
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Buffer size must be greater than 0");
        Self {
            data: vec![0u8; size],
        }
    }

    /// Create a buffer filled with `pattern`
    pub fn filled(size: usize, pattern: FillPattern) -> Self {
        let mut buffer = Self::new(size);
        buffer.fill(pattern);
        buffer
    }

    /// Get the size of the buffer in bytes
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Fill the buffer with a specific pattern
    pub fn fill(&mut self, pattern: FillPattern) {
        match pattern {
            FillPattern::Zeros => self.data.fill(0),
            FillPattern::Sequential => {
                for (i, byte) in self.data.iter_mut().enumerate() {
                    *byte = (i % 256) as u8;
                }
            }
        }
    }

    /// The first `len` bytes, capped at the buffer size
    #[inline]
    pub fn chunk(&self, len: u64) -> &[u8] {
        let len = len.min(self.data.len() as u64) as usize;
        &self.data[..len]
    }
}
