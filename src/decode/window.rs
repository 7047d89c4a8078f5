//! Dictionary window
//!
//! Circular buffer of the most recent output. It grows lazily up to its
//! capacity so small streams never allocate the full dictionary, then wraps.
//! Bytes written since the last drain are `pending` and are handed to the
//! caller by [`DictWindow::drain_into`].

use crate::{LzmaError, Result};

/// Circular history buffer with back-reference copy
#[derive(Debug)]
pub struct DictWindow {
    buf: Vec<u8>,
    capacity: usize,
    pos: usize,
    total: u64,
    pending: usize,
}

impl DictWindow {
    /// Create an empty window holding at most `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: Vec::with_capacity(capacity.min(1 << 16)),
            capacity,
            pos: 0,
            total: 0,
            pending: 0,
        }
    }

    /// Maximum history held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes written since the stream started
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Bytes written but not yet drained
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// True when no byte has been written yet
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Append one byte
    #[inline]
    pub fn put(&mut self, byte: u8) {
        if self.pos == self.buf.len() {
            self.buf.push(byte);
        } else {
            self.buf[self.pos] = byte;
        }
        self.pos += 1;
        if self.pos == self.capacity {
            self.pos = 0;
        }
        self.total += 1;
        self.pending += 1;
    }

    fn check_distance(&self, distance: u32) -> Result<usize> {
        let available = self.total.min(self.capacity as u64);
        if distance as u64 >= available {
            return Err(LzmaError::InvalidDistance {
                distance,
                position: self.total,
            });
        }
        let distance = distance as usize;
        Ok(if self.pos > distance {
            self.pos - distance - 1
        } else {
            self.pos + self.capacity - distance - 1
        })
    }

    /// Byte `distance + 1` positions back
    #[inline]
    pub fn get_byte(&self, distance: u32) -> Result<u8> {
        let index = self.check_distance(distance)?;
        Ok(self.buf[index])
    }

    /// Byte written most recently, 0 before any output
    #[inline]
    pub fn last_byte(&self) -> u8 {
        self.get_byte(0).unwrap_or(0)
    }

    /// Copy `length` bytes starting `distance + 1` positions back
    ///
    /// Source and destination may overlap; bytes written by this copy are read
    /// again when `distance < length`, which expands runs.
    pub fn copy_match(&mut self, distance: u32, length: u32) -> Result<()> {
        let mut src = self.check_distance(distance)?;
        for _ in 0..length {
            let byte = self.buf[src];
            self.put(byte);
            src += 1;
            if src == self.capacity {
                src = 0;
            }
        }
        Ok(())
    }

    /// Move pending bytes, oldest first, to `out`
    pub fn drain_into(&mut self, out: &mut Vec<u8>) {
        if self.pending == 0 {
            return;
        }
        if self.pending <= self.pos {
            out.extend_from_slice(&self.buf[self.pos - self.pending..self.pos]);
        } else {
            let wrapped = self.pending - self.pos;
            out.extend_from_slice(&self.buf[self.capacity - wrapped..]);
            out.extend_from_slice(&self.buf[..self.pos]);
        }
        self.pending = 0;
    }
}
