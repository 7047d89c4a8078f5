//! Range decoder
//!
//! Reads the arithmetic-coded payload through a small input buffer and
//! decodes modelled bits, direct bits and bit trees.

use super::IN_BUFF_SIZE;
use crate::model::Prob;
use crate::tables::{BIT_MODEL_TOTAL_BITS, TOP_VALUE};
use crate::{LzmaError, Result};
use std::io::{ErrorKind, Read};

/// Decoder half of the range coder
#[derive(Debug)]
pub struct RangeDecoder<R: Read> {
    reader: R,
    range: u32,
    code: u32,
    in_buff: Box<[u8]>,
    in_pos: usize,
    in_bytes: usize,
    bytes_consumed: u64,
}

impl<R: Read> RangeDecoder<R> {
    /// Wrap a reader; call [`RangeDecoder::init`] before decoding
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            range: 0xFFFF_FFFF,
            code: 0,
            in_buff: vec![0; IN_BUFF_SIZE].into_boxed_slice(),
            in_pos: 0,
            in_bytes: 0,
            bytes_consumed: 0,
        }
    }

    /// Load the five initial bytes; the first one must be zero
    pub fn init(&mut self) -> Result<()> {
        let first = self.next_byte()?;
        if first != 0 {
            return Err(LzmaError::InvalidState(format!(
                "range coder must start with a zero byte, found {first:#04x}"
            )));
        }
        self.range = 0xFFFF_FFFF;
        self.code = 0;
        for _ in 0..4 {
            self.code = (self.code << 8) | self.next_byte()? as u32;
        }
        Ok(())
    }

    fn next_byte(&mut self) -> Result<u8> {
        while self.in_pos >= self.in_bytes {
            self.in_pos = 0;
            self.in_bytes = match self.reader.read(&mut self.in_buff) {
                Ok(0) => return Err(LzmaError::StreamTruncated),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => 0,
                Err(e) => return Err(e.into()),
            };
        }
        let byte = self.in_buff[self.in_pos];
        self.in_pos += 1;
        self.bytes_consumed += 1;
        Ok(byte)
    }

    #[inline]
    fn normalize(&mut self) -> Result<()> {
        if self.range < TOP_VALUE {
            self.range <<= 8;
            self.code = (self.code << 8) | self.next_byte()? as u32;
        }
        Ok(())
    }

    /// Decode one bit with an adaptive probability
    #[inline]
    pub fn decode_bit(&mut self, prob: &mut Prob) -> Result<u32> {
        let bound = (self.range >> BIT_MODEL_TOTAL_BITS) * prob.value();
        let bit = if self.code < bound {
            self.range = bound;
            prob.update_zero();
            0
        } else {
            self.range -= bound;
            self.code -= bound;
            prob.update_one();
            1
        };
        self.normalize()?;
        Ok(bit)
    }

    /// Decode `count` bits at fixed even odds, most significant first
    pub fn decode_direct_bits(&mut self, count: u32) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            self.range >>= 1;
            let bit = if self.code >= self.range {
                self.code -= self.range;
                1
            } else {
                0
            };
            value = (value << 1) | bit;
            self.normalize()?;
        }
        Ok(value)
    }

    /// Decode a `bits`-wide symbol from a bit tree rooted at index 1
    pub fn decode_tree(&mut self, probs: &mut [Prob], bits: u32) -> Result<u32> {
        let mut index = 1u32;
        for _ in 0..bits {
            index = (index << 1) | self.decode_bit(&mut probs[index as usize])?;
        }
        Ok(index - (1 << bits))
    }

    /// Decode a `bits`-wide symbol from a bit tree, least significant bit first
    pub fn decode_reverse_tree(&mut self, probs: &mut [Prob], bits: u32) -> Result<u32> {
        let mut index = 1u32;
        let mut symbol = 0u32;
        for i in 0..bits {
            let bit = self.decode_bit(&mut probs[index as usize])?;
            index = (index << 1) | bit;
            symbol |= bit << i;
        }
        Ok(symbol)
    }

    /// True when the code register is zero, the required state at an end marker
    pub fn is_finished_ok(&self) -> bool {
        self.code == 0
    }

    /// Payload bytes consumed so far
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }

    /// Recover the reader; buffered but unconsumed input is lost
    pub fn into_inner(self) -> R {
        self.reader
    }
}
