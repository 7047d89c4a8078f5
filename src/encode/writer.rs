//! LzmaWriter - Streaming compression writer
//!
//! This module implements the LzmaWriter that provides a Write interface
//! for LZMA compression. Input is buffered until [`LzmaWriter::finish`] so the
//! exact uncompressed size can be stored in the header.

use super::hash::MatchFinder;
use super::pattern::Choice;
use super::range::RangeEncoder;
use super::state::EncoderState;
use crate::common::{CodecStats, EncoderOptions, Properties, SizeMode, StreamHeader};
use crate::{LzmaError, Result};
use std::io::Write;

/// Streaming compression writer implementing Write trait
#[derive(Debug)]
pub struct LzmaWriter<W: Write> {
    writer: Option<W>,
    options: EncoderOptions,
    finished: bool,
    input_buffer: Vec<u8>,
    stats: CodecStats,
}

impl<W: Write> LzmaWriter<W> {
    /// Create a new LzmaWriter with default search effort
    pub fn new(writer: W, properties: Properties) -> Result<Self> {
        Self::with_options(writer, EncoderOptions::new(properties))
    }

    /// Create a new LzmaWriter with explicit options
    pub fn with_options(writer: W, options: EncoderOptions) -> Result<Self> {
        Ok(Self {
            writer: Some(writer),
            options,
            finished: false,
            input_buffer: Vec::new(),
            stats: CodecStats::default(),
        })
    }

    /// Options this writer encodes with
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Statistics of the encoded stream; empty until finished
    pub fn stats(&self) -> &CodecStats {
        &self.stats
    }

    /// Finish compression, write the stream and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.finish_stream()?;
        self.writer
            .take()
            .ok_or_else(|| LzmaError::InvalidState("writer already taken".to_string()))
    }

    /// Finish compression and return the statistics alongside the writer
    pub fn finish_with_stats(mut self) -> Result<(W, CodecStats)> {
        self.finish_stream()?;
        let stats = std::mem::take(&mut self.stats);
        let writer = self
            .writer
            .take()
            .ok_or_else(|| LzmaError::InvalidState("writer already taken".to_string()))?;
        Ok((writer, stats))
    }

    fn finish_stream(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let data = std::mem::take(&mut self.input_buffer);
        let payload = self.compress_buffer(&data);
        let header = StreamHeader {
            properties: self.options.properties,
            uncompressed_size: match self.options.size_mode {
                SizeMode::Known => Some(data.len() as u64),
                SizeMode::EndMarker => None,
            },
        };

        log::debug!(
            "lzma compressed {} bytes into {} ({} literals, {} matches, {} reps, {} short reps)",
            data.len(),
            payload.len() + header.to_bytes().len(),
            self.stats.literal_count,
            self.stats.match_count,
            self.stats.rep_count,
            self.stats.short_rep_count
        );

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LzmaError::InvalidState("writer already taken".to_string()))?;
        writer.write_all(&header.to_bytes())?;
        writer.write_all(&payload)?;
        writer.flush()?;
        Ok(())
    }

    /// Greedy encode loop over the whole input
    fn compress_buffer(&mut self, data: &[u8]) -> Vec<u8> {
        let options = self.options;
        let props = options.properties;
        log::debug!(
            "lzma encode: lc={} lp={} pb={} dict={} depth={} nice_len={} {:?}",
            props.lc(),
            props.lp(),
            props.pb(),
            props.dict_size(),
            options.depth,
            options.nice_len,
            options.size_mode
        );
        let mut state = EncoderState::new(props);
        let mut finder =
            MatchFinder::new(props.dict_size(), data.len(), options.depth, options.nice_len);
        let mut rc = RangeEncoder::with_capacity(data.len() / 2 + 16);

        let mut pos = 0;
        while pos < data.len() {
            let choice = finder.choose(data, pos, &state.reps);
            match choice {
                Choice::Literal => state.encode_literal(&mut rc, data, pos),
                Choice::ShortRep => state.encode_short_rep(&mut rc, pos),
                Choice::Rep { index, length } => state.encode_rep(&mut rc, pos, index, length),
                Choice::Match { distance, length } => {
                    state.encode_match(&mut rc, pos, distance, length)
                }
            }
            let next = pos + choice.len();
            finder.insert_range(data, pos, next);
            pos = next;
        }

        if options.size_mode == SizeMode::EndMarker {
            state.encode_end_marker(&mut rc, pos);
        }

        self.stats = state.stats;
        rc.finish()
    }
}

impl<W: Write> Write for LzmaWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.finished {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                LzmaError::InvalidState("write after finish".to_string()),
            ));
        }

        // Positions in the match finder are 32-bit
        let total = self.input_buffer.len() as u64 + buf.len() as u64;
        if total > u32::MAX as u64 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                LzmaError::InputTooLarge(total),
            ));
        }

        self.input_buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for LzmaWriter<W> {
    fn drop(&mut self) {
        if !self.finished {
            // Try to finish compression, but ignore errors in drop
            let _ = self.finish_stream();
        }
    }
}
