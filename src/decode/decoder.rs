//! Literal, length and distance decoding
//!
//! One call to [`DecoderState::decode_step`] decodes a single symbol, applies
//! it to the window and advances the state machine.

use super::range::RangeDecoder;
use super::state::DecoderState;
use crate::model::LengthModel;
use crate::state::Event;
use crate::tables::{
    len_to_pos_state, ALIGN_BITS, END_MARKER_DISTANCE, END_POS_MODEL_INDEX, LEN_HIGH_BITS,
    LEN_LOW_BITS, LEN_LOW_SYMBOLS, LEN_MID_BITS, LEN_MID_SYMBOLS, MATCH_LEN_MIN, POS_SLOT_BITS,
    START_POS_MODEL_INDEX,
};
use crate::{LzmaError, Result};
use std::io::Read;

/// Outcome of one decode step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// A symbol was decoded
    Continue,
    /// The stream is complete
    Finished,
}

impl LengthModel {
    /// Decode a match length (2..=273)
    pub fn decode<R: Read>(&mut self, rc: &mut RangeDecoder<R>, pos_state: usize) -> Result<u32> {
        if rc.decode_bit(&mut self.choice)? == 0 {
            let low = rc.decode_tree(&mut self.low[pos_state], LEN_LOW_BITS)?;
            return Ok(MATCH_LEN_MIN + low);
        }
        if rc.decode_bit(&mut self.choice2)? == 0 {
            let mid = rc.decode_tree(&mut self.mid[pos_state], LEN_MID_BITS)?;
            return Ok(MATCH_LEN_MIN + LEN_LOW_SYMBOLS + mid);
        }
        let high = rc.decode_tree(&mut self.high, LEN_HIGH_BITS)?;
        Ok(MATCH_LEN_MIN + LEN_LOW_SYMBOLS + LEN_MID_SYMBOLS + high)
    }
}

impl DecoderState {
    /// Decode the next symbol
    pub fn decode_step<R: Read>(&mut self, rc: &mut RangeDecoder<R>) -> Result<Progress> {
        let total = self.window.total();
        if self.declared_size == Some(total) {
            return Ok(Progress::Finished);
        }

        let pos_state = self.pos_state();
        let state = self.state.index();

        if rc.decode_bit(&mut self.model.is_match[state][pos_state])? == 0 {
            self.decode_literal(rc)?;
            return Ok(Progress::Continue);
        }

        if rc.decode_bit(&mut self.model.is_rep[state])? == 0 {
            let len = self.model.len.decode(rc, pos_state)?;
            let distance = self.decode_distance(rc, len)?;
            if distance == END_MARKER_DISTANCE {
                return self.end_marker(rc);
            }
            self.reps = [distance, self.reps[0], self.reps[1], self.reps[2]];
            self.state = self.state.update(Event::Match);
            self.copy_match(len)?;
            self.stats.match_count += 1;
            return Ok(Progress::Continue);
        }

        if self.window.is_empty() {
            return Err(LzmaError::InvalidState(
                "repeat match before any output".to_string(),
            ));
        }

        if rc.decode_bit(&mut self.model.is_rep_g0[state])? == 0 {
            if rc.decode_bit(&mut self.model.is_rep0_long[state][pos_state])? == 0 {
                let byte = self.window.get_byte(self.reps[0])?;
                self.window.put(byte);
                self.state = self.state.update(Event::ShortRep);
                self.stats.short_rep_count += 1;
                self.stats.record_match(1);
                return Ok(Progress::Continue);
            }
        } else {
            let distance = if rc.decode_bit(&mut self.model.is_rep_g1[state])? == 0 {
                self.reps[1]
            } else {
                let distance = if rc.decode_bit(&mut self.model.is_rep_g2[state])? == 0 {
                    self.reps[2]
                } else {
                    let rep3 = self.reps[3];
                    self.reps[3] = self.reps[2];
                    rep3
                };
                self.reps[2] = self.reps[1];
                distance
            };
            self.reps[1] = self.reps[0];
            self.reps[0] = distance;
        }

        let len = self.model.rep_len.decode(rc, pos_state)?;
        self.state = self.state.update(Event::Rep);
        self.copy_match(len)?;
        self.stats.rep_count += 1;
        Ok(Progress::Continue)
    }

    fn decode_literal<R: Read>(&mut self, rc: &mut RangeDecoder<R>) -> Result<()> {
        let total = self.window.total();
        let prev_byte = self.window.last_byte();
        let matched = !self.state.is_literal();
        let match_byte = if matched {
            self.window.get_byte(self.reps[0])? as u32
        } else {
            0
        };

        let probs = self.model.literal_probs(&self.properties, total, prev_byte);
        let mut symbol = 1u32;

        if matched {
            // Follow the byte at rep0 until the first differing bit
            let mut i = 8;
            while symbol < 0x100 {
                i -= 1;
                let match_bit = (match_byte >> i) & 1;
                let bit = rc.decode_bit(&mut probs[(0x100 + (match_bit << 8) + symbol) as usize])?;
                symbol = (symbol << 1) | bit;
                if bit != match_bit {
                    break;
                }
            }
        }
        while symbol < 0x100 {
            symbol = (symbol << 1) | rc.decode_bit(&mut probs[symbol as usize])?;
        }

        self.window.put(symbol as u8);
        self.state = self.state.update(Event::Literal);
        self.stats.literal_count += 1;
        self.stats.bytes_processed += 1;
        Ok(())
    }

    fn decode_distance<R: Read>(&mut self, rc: &mut RangeDecoder<R>, len: u32) -> Result<u32> {
        let slot = rc.decode_tree(&mut self.model.pos_slot[len_to_pos_state(len)], POS_SLOT_BITS)?;
        if slot < START_POS_MODEL_INDEX {
            return Ok(slot);
        }

        let footer_bits = (slot >> 1) - 1;
        let base = (2 | (slot & 1)) << footer_bits;
        if slot < END_POS_MODEL_INDEX {
            let probs = &mut self.model.pos_special[(base - slot) as usize..];
            return Ok(base + rc.decode_reverse_tree(probs, footer_bits)?);
        }

        let direct = rc.decode_direct_bits(footer_bits - ALIGN_BITS)?;
        let align = rc.decode_reverse_tree(&mut self.model.align, ALIGN_BITS)?;
        Ok(base + (direct << ALIGN_BITS) + align)
    }

    fn copy_match(&mut self, len: u32) -> Result<()> {
        let end = self.window.total() + len as u64;
        if let Some(declared) = self.declared_size {
            if end > declared {
                return Err(LzmaError::LengthMismatch {
                    declared,
                    actual: end,
                });
            }
        }
        self.window.copy_match(self.reps[0], len)?;
        self.stats.record_match(len);
        Ok(())
    }

    fn end_marker<R: Read>(&mut self, rc: &RangeDecoder<R>) -> Result<Progress> {
        if let Some(declared) = self.declared_size {
            return Err(LzmaError::LengthMismatch {
                declared,
                actual: self.window.total(),
            });
        }
        if !rc.is_finished_ok() {
            return Err(LzmaError::InvalidState(
                "end marker with trailing range coder state".to_string(),
            ));
        }
        log::debug!(
            "end marker after {} bytes of output",
            self.window.total()
        );
        Ok(Progress::Finished)
    }
}
