//! Adaptive probability model
//!
//! Every context table of one stream lives in an [`LzmaModel`]. Tables are
//! flat arrays indexed with bit-tree arithmetic, created fresh per stream and
//! never shared.

use crate::common::Properties;
use crate::tables::{
    ALIGN_SIZE, BIT_MODEL_TOTAL, LEN_HIGH_SYMBOLS, LEN_LOW_SYMBOLS, LEN_MID_SYMBOLS,
    LEN_TO_POS_STATES, LITERAL_CODER_SIZE, MOVE_BITS, NUM_STATES, POS_SPECIAL_SIZE,
    POS_STATES_MAX,
};

/// 11-bit estimate of the probability that the next bit is 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prob(u16);

impl Prob {
    /// Even odds
    pub const INIT: Prob = Prob((BIT_MODEL_TOTAL >> 1) as u16);

    /// Current value in `0..2048`
    #[inline]
    pub fn value(self) -> u32 {
        self.0 as u32
    }

    /// Adapt towards a 0 bit
    #[inline]
    pub fn update_zero(&mut self) {
        self.0 += ((BIT_MODEL_TOTAL - self.0 as u32) >> MOVE_BITS) as u16;
    }

    /// Adapt towards a 1 bit
    #[inline]
    pub fn update_one(&mut self) {
        self.0 -= self.0 >> MOVE_BITS;
    }
}

impl Default for Prob {
    fn default() -> Self {
        Self::INIT
    }
}

/// Length coder tables; one instance for matches, one for repeat matches
#[derive(Debug, Clone)]
pub struct LengthModel {
    /// Low (0) versus mid/high (1)
    pub choice: Prob,
    /// Mid (0) versus high (1)
    pub choice2: Prob,
    /// 3-bit trees per position state for lengths 2..=9
    pub low: [[Prob; LEN_LOW_SYMBOLS as usize]; POS_STATES_MAX],
    /// 3-bit trees per position state for lengths 10..=17
    pub mid: [[Prob; LEN_MID_SYMBOLS as usize]; POS_STATES_MAX],
    /// 8-bit tree for lengths 18..=273
    pub high: [Prob; LEN_HIGH_SYMBOLS as usize],
}

impl LengthModel {
    /// Tables at even odds
    pub fn new() -> Self {
        Self {
            choice: Prob::INIT,
            choice2: Prob::INIT,
            low: [[Prob::INIT; LEN_LOW_SYMBOLS as usize]; POS_STATES_MAX],
            mid: [[Prob::INIT; LEN_MID_SYMBOLS as usize]; POS_STATES_MAX],
            high: [Prob::INIT; LEN_HIGH_SYMBOLS as usize],
        }
    }
}

impl Default for LengthModel {
    fn default() -> Self {
        Self::new()
    }
}

/// All probability tables of one stream
#[derive(Debug, Clone)]
pub struct LzmaModel {
    /// `0x300` probabilities per literal context
    pub literal: Vec<Prob>,
    /// Literal (0) or match (1), by state and position state
    pub is_match: [[Prob; POS_STATES_MAX]; NUM_STATES],
    /// New distance (0) or repeat distance (1), by state
    pub is_rep: [Prob; NUM_STATES],
    /// rep0 (0) or an older slot (1)
    pub is_rep_g0: [Prob; NUM_STATES],
    /// rep1 (0) or rep2/rep3 (1)
    pub is_rep_g1: [Prob; NUM_STATES],
    /// rep2 (0) or rep3 (1)
    pub is_rep_g2: [Prob; NUM_STATES],
    /// Short repeat (0) or full rep0 match (1), by state and position state
    pub is_rep0_long: [[Prob; POS_STATES_MAX]; NUM_STATES],
    /// 6-bit slot trees, one per length class
    pub pos_slot: [[Prob; 1 << 6]; LEN_TO_POS_STATES],
    /// Reverse trees for the extra bits of slots 4..14
    pub pos_special: [Prob; POS_SPECIAL_SIZE],
    /// Reverse tree for the low four bits of large distances
    pub align: [Prob; ALIGN_SIZE],
    /// Match lengths
    pub len: LengthModel,
    /// Repeat match lengths
    pub rep_len: LengthModel,
}

impl LzmaModel {
    /// Fresh tables sized for `properties`
    pub fn new(properties: &Properties) -> Self {
        Self {
            literal: vec![Prob::INIT; LITERAL_CODER_SIZE * properties.literal_contexts()],
            is_match: [[Prob::INIT; POS_STATES_MAX]; NUM_STATES],
            is_rep: [Prob::INIT; NUM_STATES],
            is_rep_g0: [Prob::INIT; NUM_STATES],
            is_rep_g1: [Prob::INIT; NUM_STATES],
            is_rep_g2: [Prob::INIT; NUM_STATES],
            is_rep0_long: [[Prob::INIT; POS_STATES_MAX]; NUM_STATES],
            pos_slot: [[Prob::INIT; 1 << 6]; LEN_TO_POS_STATES],
            pos_special: [Prob::INIT; POS_SPECIAL_SIZE],
            align: [Prob::INIT; ALIGN_SIZE],
            len: LengthModel::new(),
            rep_len: LengthModel::new(),
        }
    }

    /// Literal coder tables for the byte at `position` following `prev_byte`
    pub fn literal_probs(
        &mut self,
        properties: &Properties,
        position: u64,
        prev_byte: u8,
    ) -> &mut [Prob] {
        let start = literal_index(properties, position, prev_byte);
        &mut self.literal[start..start + LITERAL_CODER_SIZE]
    }
}

/// Offset of the literal context for `position` and `prev_byte`
pub fn literal_index(properties: &Properties, position: u64, prev_byte: u8) -> usize {
    let lc = properties.lc() as u32;
    let pos_bits = (position as u32) & properties.literal_pos_mask();
    let context = (pos_bits << lc) | ((prev_byte as u32) >> (8 - lc));
    LITERAL_CODER_SIZE * context as usize
}
