//! Range encoder
//!
//! Mirror of the decoder: `low` is kept in 33 bits so a carry out of the
//! 32-bit window can propagate into bytes already cached but not yet written.

use crate::model::Prob;
use crate::tables::{BIT_MODEL_TOTAL_BITS, TOP_VALUE};

/// Encoder half of the range coder
#[derive(Debug)]
pub struct RangeEncoder {
    low: u64,
    range: u32,
    cache: u8,
    cache_size: u64,
    out: Vec<u8>,
}

impl RangeEncoder {
    /// Create an encoder writing into a fresh buffer
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an encoder with a pre-sized output buffer
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            low: 0,
            range: 0xFFFF_FFFF,
            cache: 0,
            cache_size: 1,
            out: Vec::with_capacity(capacity),
        }
    }

    fn shift_low(&mut self) {
        if (self.low as u32) < 0xFF00_0000 || (self.low >> 32) != 0 {
            let carry = (self.low >> 32) as u8;
            let mut temp = self.cache;
            loop {
                self.out.push(temp.wrapping_add(carry));
                temp = 0xFF;
                self.cache_size -= 1;
                if self.cache_size == 0 {
                    break;
                }
            }
            self.cache = (self.low >> 24) as u8;
        }
        self.cache_size += 1;
        self.low = (self.low & 0x00FF_FFFF) << 8;
    }

    #[inline]
    fn normalize(&mut self) {
        if self.range < TOP_VALUE {
            self.range <<= 8;
            self.shift_low();
        }
    }

    /// Encode one bit with an adaptive probability
    #[inline]
    pub fn encode_bit(&mut self, prob: &mut Prob, bit: u32) {
        let bound = (self.range >> BIT_MODEL_TOTAL_BITS) * prob.value();
        if bit == 0 {
            self.range = bound;
            prob.update_zero();
        } else {
            self.low += bound as u64;
            self.range -= bound;
            prob.update_one();
        }
        self.normalize();
    }

    /// Encode the low `count` bits of `value` at even odds, most significant first
    pub fn encode_direct_bits(&mut self, value: u32, count: u32) {
        for i in (0..count).rev() {
            self.range >>= 1;
            if (value >> i) & 1 != 0 {
                self.low += self.range as u64;
            }
            self.normalize();
        }
    }

    /// Encode a `bits`-wide symbol through a bit tree rooted at index 1
    pub fn encode_tree(&mut self, probs: &mut [Prob], bits: u32, symbol: u32) {
        let mut index = 1u32;
        for i in (0..bits).rev() {
            let bit = (symbol >> i) & 1;
            self.encode_bit(&mut probs[index as usize], bit);
            index = (index << 1) | bit;
        }
    }

    /// Encode a `bits`-wide symbol through a bit tree, least significant bit first
    pub fn encode_reverse_tree(&mut self, probs: &mut [Prob], bits: u32, symbol: u32) {
        let mut index = 1u32;
        for i in 0..bits {
            let bit = (symbol >> i) & 1;
            self.encode_bit(&mut probs[index as usize], bit);
            index = (index << 1) | bit;
        }
    }

    /// Flush the coder state and return the payload
    pub fn finish(mut self) -> Vec<u8> {
        for _ in 0..5 {
            self.shift_low();
        }
        self.out
    }
}

impl Default for RangeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::RangeDecoder;
    use std::io::Cursor;

    #[test]
    fn test_empty_payload() {
        assert_eq!(RangeEncoder::new().finish(), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_bits_round_trip() {
        let bits: Vec<u32> = (0..2000u32).map(|i| ((i * 7919) >> 3) & 1).collect();
        let mut probs = [Prob::INIT; 4];
        let mut rc = RangeEncoder::new();
        for (i, &bit) in bits.iter().enumerate() {
            rc.encode_bit(&mut probs[i % 4], bit);
        }
        rc.encode_direct_bits(0x2A5F, 14);
        rc.encode_tree(&mut [Prob::INIT; 64], 6, 45);
        rc.encode_reverse_tree(&mut [Prob::INIT; 16], 4, 9);
        let payload = rc.finish();
        assert_eq!(payload[0], 0);

        let mut dec = RangeDecoder::new(Cursor::new(payload.clone()));
        dec.init().unwrap();
        let mut probs = [Prob::INIT; 4];
        for (i, &bit) in bits.iter().enumerate() {
            assert_eq!(dec.decode_bit(&mut probs[i % 4]).unwrap(), bit);
        }
        assert_eq!(dec.decode_direct_bits(14).unwrap(), 0x2A5F);
        assert_eq!(dec.decode_tree(&mut [Prob::INIT; 64], 6).unwrap(), 45);
        assert_eq!(dec.decode_reverse_tree(&mut [Prob::INIT; 16], 4).unwrap(), 9);
        assert_eq!(dec.bytes_consumed(), payload.len() as u64);
    }

    #[test]
    fn test_carry_propagation() {
        // Long runs of improbable bits push `low` past 32 bits repeatedly
        let mut prob = Prob::INIT;
        let mut rc = RangeEncoder::new();
        for _ in 0..500 {
            rc.encode_bit(&mut prob, 0);
        }
        let mut bits = Vec::new();
        for i in 0..3000u32 {
            let bit = u32::from(i % 13 != 0);
            bits.push(bit);
            rc.encode_bit(&mut prob, bit);
        }
        let payload = rc.finish();

        let mut dec = RangeDecoder::new(Cursor::new(payload));
        dec.init().unwrap();
        let mut prob = Prob::INIT;
        for _ in 0..500 {
            assert_eq!(dec.decode_bit(&mut prob).unwrap(), 0);
        }
        for &bit in &bits {
            assert_eq!(dec.decode_bit(&mut prob).unwrap(), bit);
        }
    }
}
