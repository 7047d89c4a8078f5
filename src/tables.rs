//! Static format constants for the LZMA bitstream
//!
//! Sizes of the probability tables, bit-tree widths and the distance slot
//! layout shared by the encoder and the decoder.

/// Bits of precision in a probability value
pub const BIT_MODEL_TOTAL_BITS: u32 = 11;

/// Probability scale, `1 << 11`
pub const BIT_MODEL_TOTAL: u32 = 1 << BIT_MODEL_TOTAL_BITS;

/// Adaptation speed of the probability update
pub const MOVE_BITS: u32 = 5;

/// Range normalization threshold
pub const TOP_VALUE: u32 = 1 << 24;

/// Number of states in the literal/match state machine
pub const NUM_STATES: usize = 12;

/// Upper bound on position states, `1 << 4`
pub const POS_STATES_MAX: usize = 1 << 4;

/// Probabilities per literal coder context
pub const LITERAL_CODER_SIZE: usize = 0x300;

/// Shortest encodable match
pub const MATCH_LEN_MIN: u32 = 2;

/// Low length tree width
pub const LEN_LOW_BITS: u32 = 3;
/// Mid length tree width
pub const LEN_MID_BITS: u32 = 3;
/// High length tree width
pub const LEN_HIGH_BITS: u32 = 8;

/// Symbols in the low length tree
pub const LEN_LOW_SYMBOLS: u32 = 1 << LEN_LOW_BITS;
/// Symbols in the mid length tree
pub const LEN_MID_SYMBOLS: u32 = 1 << LEN_MID_BITS;
/// Symbols in the high length tree
pub const LEN_HIGH_SYMBOLS: u32 = 1 << LEN_HIGH_BITS;

/// Longest encodable match (273)
pub const MATCH_LEN_MAX: u32 =
    MATCH_LEN_MIN + LEN_LOW_SYMBOLS + LEN_MID_SYMBOLS + LEN_HIGH_SYMBOLS - 1;

/// Length classes used to pick a position slot tree
pub const LEN_TO_POS_STATES: usize = 4;

/// Position slot tree width
pub const POS_SLOT_BITS: u32 = 6;

/// First slot carrying extra distance bits
pub const START_POS_MODEL_INDEX: u32 = 4;

/// First slot whose extra bits are coded directly plus the align tree
pub const END_POS_MODEL_INDEX: u32 = 14;

/// Distances fully covered by the modelled slots
pub const NUM_FULL_DISTANCES: u32 = 1 << (END_POS_MODEL_INDEX >> 1);

/// Align tree width
pub const ALIGN_BITS: u32 = 4;

/// Align tree size
pub const ALIGN_SIZE: usize = 1 << ALIGN_BITS;

/// Mask for the low distance bits coded through the align tree
pub const ALIGN_MASK: u32 = (1 << ALIGN_BITS) - 1;

/// Reverse trees for slots 4..14 live in one flat table; index 0 is unused
pub const POS_SPECIAL_SIZE: usize = 1 + (NUM_FULL_DISTANCES - END_POS_MODEL_INDEX) as usize;

/// Encoded distance that terminates a stream without a declared size
pub const END_MARKER_DISTANCE: u32 = 0xFFFF_FFFF;

/// Number of repeat distances tracked
pub const NUM_REPS: usize = 4;

/// Length class for the position slot tree: `min(len - 2, 3)`
pub const fn len_to_pos_state(len: u32) -> usize {
    let class = (len - MATCH_LEN_MIN) as usize;
    if class < LEN_TO_POS_STATES {
        class
    } else {
        LEN_TO_POS_STATES - 1
    }
}

/// Position slot of an encoded distance (distance minus one)
pub const fn pos_slot(distance: u32) -> u32 {
    if distance < START_POS_MODEL_INDEX {
        return distance;
    }
    let n = 31 - distance.leading_zeros();
    (n << 1) | ((distance >> (n - 1)) & 1)
}
