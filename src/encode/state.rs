//! Compression state and symbol encoders
//!
//! Mirrors the decoder symbol for symbol: the same model tables, state
//! transitions and recent distance updates, driven by parse decisions instead
//! of decoded bits.

use super::range::RangeEncoder;
use crate::common::{CodecStats, Properties};
use crate::model::{LengthModel, LzmaModel};
use crate::state::{Event, State};
use crate::tables::{
    len_to_pos_state, pos_slot, ALIGN_BITS, ALIGN_MASK, END_MARKER_DISTANCE, END_POS_MODEL_INDEX,
    LEN_HIGH_BITS, LEN_LOW_BITS, LEN_LOW_SYMBOLS, LEN_MID_BITS, LEN_MID_SYMBOLS, MATCH_LEN_MIN,
    NUM_REPS, POS_SLOT_BITS, START_POS_MODEL_INDEX,
};

impl LengthModel {
    /// Encode a match length (2..=273)
    pub fn encode(&mut self, rc: &mut RangeEncoder, len: u32, pos_state: usize) {
        let symbol = len - MATCH_LEN_MIN;
        if symbol < LEN_LOW_SYMBOLS {
            rc.encode_bit(&mut self.choice, 0);
            rc.encode_tree(&mut self.low[pos_state], LEN_LOW_BITS, symbol);
            return;
        }
        rc.encode_bit(&mut self.choice, 1);
        let symbol = symbol - LEN_LOW_SYMBOLS;
        if symbol < LEN_MID_SYMBOLS {
            rc.encode_bit(&mut self.choice2, 0);
            rc.encode_tree(&mut self.mid[pos_state], LEN_MID_BITS, symbol);
            return;
        }
        rc.encode_bit(&mut self.choice2, 1);
        rc.encode_tree(&mut self.high, LEN_HIGH_BITS, symbol - LEN_MID_SYMBOLS);
    }
}

/// Per-stream encoder state
#[derive(Debug)]
pub struct EncoderState {
    /// Model parameters written to the header
    pub properties: Properties,
    /// Probability tables
    pub model: LzmaModel,
    /// Automaton state
    pub state: State,
    /// Most recent distances (minus one), most recent first
    pub reps: [u32; NUM_REPS],
    /// Symbol counters
    pub stats: CodecStats,
}

impl EncoderState {
    /// Fresh state for one stream
    pub fn new(properties: Properties) -> Self {
        Self {
            model: LzmaModel::new(&properties),
            properties,
            state: State::INITIAL,
            reps: [0; NUM_REPS],
            stats: CodecStats::default(),
        }
    }

    #[inline]
    fn pos_state(&self, pos: usize) -> usize {
        (pos as u32 & self.properties.pos_mask()) as usize
    }

    /// Encode `data[pos]` as a literal
    pub fn encode_literal(&mut self, rc: &mut RangeEncoder, data: &[u8], pos: usize) {
        let pos_state = self.pos_state(pos);
        rc.encode_bit(&mut self.model.is_match[self.state.index()][pos_state], 0);

        let prev_byte = if pos > 0 { data[pos - 1] } else { 0 };
        let byte = data[pos] as u32;
        let matched = !self.state.is_literal();
        let match_byte = if matched {
            data[pos - self.reps[0] as usize - 1] as u32
        } else {
            0
        };

        let probs = self
            .model
            .literal_probs(&self.properties, pos as u64, prev_byte);
        let mut symbol = 1u32;
        let mut i = 8;

        if matched {
            while i > 0 {
                i -= 1;
                let bit = (byte >> i) & 1;
                let match_bit = (match_byte >> i) & 1;
                rc.encode_bit(&mut probs[(0x100 + (match_bit << 8) + symbol) as usize], bit);
                symbol = (symbol << 1) | bit;
                if bit != match_bit {
                    break;
                }
            }
        }
        while i > 0 {
            i -= 1;
            let bit = (byte >> i) & 1;
            rc.encode_bit(&mut probs[symbol as usize], bit);
            symbol = (symbol << 1) | bit;
        }

        self.state = self.state.update(Event::Literal);
        self.stats.literal_count += 1;
        self.stats.bytes_processed += 1;
    }

    /// Encode a new match; `distance` is 1 for the previous byte
    pub fn encode_match(&mut self, rc: &mut RangeEncoder, pos: usize, distance: u32, len: u32) {
        let encoded = distance - 1;
        self.encode_match_symbol(rc, pos, encoded, len);
        self.reps = [encoded, self.reps[0], self.reps[1], self.reps[2]];
        self.state = self.state.update(Event::Match);
        self.stats.match_count += 1;
        self.stats.record_match(len);
    }

    /// Encode the end-of-stream marker at `pos`
    pub fn encode_end_marker(&mut self, rc: &mut RangeEncoder, pos: usize) {
        self.encode_match_symbol(rc, pos, END_MARKER_DISTANCE, MATCH_LEN_MIN);
        self.state = self.state.update(Event::Match);
    }

    fn encode_match_symbol(&mut self, rc: &mut RangeEncoder, pos: usize, encoded: u32, len: u32) {
        let pos_state = self.pos_state(pos);
        let state = self.state.index();
        rc.encode_bit(&mut self.model.is_match[state][pos_state], 1);
        rc.encode_bit(&mut self.model.is_rep[state], 0);
        self.model.len.encode(rc, len, pos_state);
        self.encode_distance(rc, encoded, len);
    }

    fn encode_distance(&mut self, rc: &mut RangeEncoder, encoded: u32, len: u32) {
        let slot = pos_slot(encoded);
        rc.encode_tree(
            &mut self.model.pos_slot[len_to_pos_state(len)],
            POS_SLOT_BITS,
            slot,
        );
        if slot < START_POS_MODEL_INDEX {
            return;
        }

        let footer_bits = (slot >> 1) - 1;
        let base = (2 | (slot & 1)) << footer_bits;
        let reduced = encoded - base;
        if slot < END_POS_MODEL_INDEX {
            let probs = &mut self.model.pos_special[(base - slot) as usize..];
            rc.encode_reverse_tree(probs, footer_bits, reduced);
        } else {
            rc.encode_direct_bits(reduced >> ALIGN_BITS, footer_bits - ALIGN_BITS);
            rc.encode_reverse_tree(&mut self.model.align, ALIGN_BITS, reduced & ALIGN_MASK);
        }
    }

    /// Encode a match reusing recent distance `index`
    pub fn encode_rep(&mut self, rc: &mut RangeEncoder, pos: usize, index: usize, len: u32) {
        let pos_state = self.pos_state(pos);
        let state = self.state.index();
        rc.encode_bit(&mut self.model.is_match[state][pos_state], 1);
        rc.encode_bit(&mut self.model.is_rep[state], 1);

        if index == 0 {
            rc.encode_bit(&mut self.model.is_rep_g0[state], 0);
            rc.encode_bit(&mut self.model.is_rep0_long[state][pos_state], 1);
        } else {
            rc.encode_bit(&mut self.model.is_rep_g0[state], 1);
            if index == 1 {
                rc.encode_bit(&mut self.model.is_rep_g1[state], 0);
            } else {
                rc.encode_bit(&mut self.model.is_rep_g1[state], 1);
                rc.encode_bit(&mut self.model.is_rep_g2[state], (index - 2) as u32);
            }
            let distance = self.reps[index];
            self.reps.copy_within(0..index, 1);
            self.reps[0] = distance;
        }

        self.model.rep_len.encode(rc, len, pos_state);
        self.state = self.state.update(Event::Rep);
        self.stats.rep_count += 1;
        self.stats.record_match(len);
    }

    /// Encode one byte repeated from the most recent distance
    pub fn encode_short_rep(&mut self, rc: &mut RangeEncoder, pos: usize) {
        let pos_state = self.pos_state(pos);
        let state = self.state.index();
        rc.encode_bit(&mut self.model.is_match[state][pos_state], 1);
        rc.encode_bit(&mut self.model.is_rep[state], 1);
        rc.encode_bit(&mut self.model.is_rep_g0[state], 0);
        rc.encode_bit(&mut self.model.is_rep0_long[state][pos_state], 0);
        self.state = self.state.update(Event::ShortRep);
        self.stats.short_rep_count += 1;
        self.stats.record_match(1);
    }
}
