//! LzmaReader - Streaming decompression reader
//!
//! This module implements the LzmaReader that provides a Read interface
//! over an `.lzma` stream and drives the decode loop chunk by chunk.

use super::decoder::Progress;
use super::range::RangeDecoder;
use super::state::{DecoderState, DecoderStatus};
use super::{MAX_OUTPUT_RESERVE, OUT_CHUNK_SIZE};
use crate::common::{CodecStats, Properties, StreamHeader, HEADER_SIZE};
use crate::tables::MATCH_LEN_MAX;
use crate::{LzmaError, Result};
use std::io::{ErrorKind, Read};

/// Streaming decompression reader implementing Read trait
#[derive(Debug)]
pub struct LzmaReader<R: Read> {
    rc: RangeDecoder<R>,
    state: DecoderState,
    header: StreamHeader,
    status: DecoderStatus,
    output_buffer: Vec<u8>,
    output_pos: usize,
}

impl<R: Read> LzmaReader<R> {
    /// Create a reader for a stream starting with the 13-byte header
    pub fn new(mut reader: R) -> Result<Self> {
        let mut header_bytes = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header_bytes).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                LzmaError::StreamTruncated
            } else {
                LzmaError::Io(e)
            }
        })?;
        let header = StreamHeader::parse(&header_bytes)?;
        Ok(Self::with_header(reader, header))
    }

    /// Create a reader for a bare payload whose properties are stored elsewhere
    pub fn new_raw(reader: R, properties: Properties, uncompressed_size: Option<u64>) -> Self {
        Self::with_header(
            reader,
            StreamHeader {
                properties,
                uncompressed_size,
            },
        )
    }

    fn with_header(reader: R, header: StreamHeader) -> Self {
        let props = header.properties;
        log::debug!(
            "lzma stream: lc={} lp={} pb={} dict={} size={:?}",
            props.lc(),
            props.lp(),
            props.pb(),
            props.dict_size(),
            header.uncompressed_size
        );
        Self {
            rc: RangeDecoder::new(reader),
            state: DecoderState::new(props, header.uncompressed_size),
            header,
            status: DecoderStatus::Ready,
            output_buffer: Vec::new(),
            output_pos: 0,
        }
    }

    /// Stream header
    pub fn header(&self) -> &StreamHeader {
        &self.header
    }

    /// Current lifecycle status
    pub fn status(&self) -> DecoderStatus {
        self.status
    }

    /// Symbol statistics so far
    pub fn stats(&self) -> &CodecStats {
        &self.state.stats
    }

    /// Bytes produced by the decoder so far
    pub fn total_out(&self) -> u64 {
        self.state.window.total()
    }

    /// Recover the underlying reader
    pub fn into_inner(self) -> R {
        self.rc.into_inner()
    }

    /// Decode the rest of the stream into `out`, returning the bytes appended
    ///
    /// Unlike the `Read` impl this reports the typed error. On failure the
    /// bytes decoded before the error are still appended to `out`.
    pub fn decode_to_end(&mut self, out: &mut Vec<u8>) -> Result<u64> {
        let start = out.len();
        out.extend_from_slice(&self.output_buffer[self.output_pos..]);
        self.output_buffer.clear();
        self.output_pos = 0;

        if let Some(size) = self.header.uncompressed_size {
            let remaining = size.saturating_sub(self.state.window.total());
            out.reserve(remaining.min(MAX_OUTPUT_RESERVE) as usize);
        }

        while self.status != DecoderStatus::Finished {
            if let Err(e) = self.decode_chunk(out) {
                self.state.window.drain_into(out);
                return Err(e);
            }
        }
        Ok((out.len() - start) as u64)
    }

    /// Decode until a chunk of output is pending or the stream ends
    fn decode_chunk(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let result = self.decode_chunk_inner(out);
        if let Err(e) = &result {
            if self.status != DecoderStatus::Failed {
                log::debug!(
                    "lzma decode failed after {} bytes: {e}",
                    self.state.window.total()
                );
                self.status = DecoderStatus::Failed;
            }
        }
        result
    }

    fn decode_chunk_inner(&mut self, out: &mut Vec<u8>) -> Result<()> {
        match self.status {
            DecoderStatus::Finished => return Ok(()),
            DecoderStatus::Failed => {
                return Err(LzmaError::InvalidState(
                    "decoder already failed".to_string(),
                ))
            }
            DecoderStatus::Ready => {
                self.rc.init()?;
                self.status = DecoderStatus::Decoding;
            }
            DecoderStatus::Decoding => {}
        }

        // Leave room for one maximal match so pending bytes never wrap over
        // bytes not yet drained
        let limit = (self.state.window.capacity() - MATCH_LEN_MAX as usize).min(OUT_CHUNK_SIZE);
        while self.state.window.pending() < limit {
            if self.state.decode_step(&mut self.rc)? == Progress::Finished {
                self.status = DecoderStatus::Finished;
                log::debug!(
                    "lzma stream finished: {} bytes out, {} bytes in",
                    self.state.window.total(),
                    self.rc.bytes_consumed()
                );
                break;
            }
        }
        self.state.window.drain_into(out);
        Ok(())
    }
}

impl<R: Read> Read for LzmaReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        while self.output_pos >= self.output_buffer.len() {
            if self.status == DecoderStatus::Finished || buf.is_empty() {
                return Ok(0);
            }
            self.output_buffer.clear();
            self.output_pos = 0;
            let mut chunk = std::mem::take(&mut self.output_buffer);
            let result = self.decode_chunk(&mut chunk);
            self.output_buffer = chunk;
            result.map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
        }

        let available = self.output_buffer.len() - self.output_pos;
        let to_copy = buf.len().min(available);
        buf[..to_copy].copy_from_slice(&self.output_buffer[self.output_pos..self.output_pos + to_copy]);
        self.output_pos += to_copy;
        Ok(to_copy)
    }
}
