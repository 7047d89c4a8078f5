//! Decompression state management
//!
//! Everything one stream owns while decoding: properties, probability model,
//! automaton state, repeat distances and the dictionary window.

use super::window::DictWindow;
use crate::common::{CodecStats, Properties, MIN_DICT_SIZE};
use crate::model::LzmaModel;
use crate::state::State;
use crate::tables::NUM_REPS;

/// Lifecycle of a decoding stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderStatus {
    /// Header accepted, payload not touched yet
    Ready,
    /// Symbols are being decoded
    Decoding,
    /// End marker or declared size reached
    Finished,
    /// A decode error occurred; the stream is unusable
    Failed,
}

/// Per-stream decoder state
#[derive(Debug)]
pub struct DecoderState {
    /// Model parameters from the header
    pub properties: Properties,
    /// Probability tables
    pub model: LzmaModel,
    /// Automaton state
    pub state: State,
    /// Most recent distances (minus one), most recent first
    pub reps: [u32; NUM_REPS],
    /// Output history
    pub window: DictWindow,
    /// Uncompressed size from the header, `None` when an end marker is expected
    pub declared_size: Option<u64>,
    /// Symbol counters
    pub stats: CodecStats,
}

impl DecoderState {
    /// Create state for a stream with the given properties and declared size
    pub fn new(properties: Properties, declared_size: Option<u64>) -> Self {
        Self {
            model: LzmaModel::new(&properties),
            state: State::INITIAL,
            reps: [0; NUM_REPS],
            window: DictWindow::new(window_capacity(&properties, declared_size)),
            properties,
            declared_size,
            stats: CodecStats::default(),
        }
    }

    /// Position state of the next byte
    #[inline]
    pub fn pos_state(&self) -> usize {
        (self.window.total() as u32 & self.properties.pos_mask()) as usize
    }
}

/// History the decoder needs: never more than the dictionary, and never more
/// than the declared output when it is smaller
fn window_capacity(properties: &Properties, declared_size: Option<u64>) -> usize {
    let dict = properties.dict_size() as u64;
    let capacity = match declared_size {
        Some(size) => dict.min(size.max(MIN_DICT_SIZE as u64)),
        None => dict,
    };
    capacity as usize
}
