//! Hash chain match finder
//!
//! Positions are bucketed by a hash of the three bytes starting there. Each
//! bucket head points at the newest position; `chain` links every position to
//! the previous one with the same hash. The chain is cyclic and only as long
//! as the dictionary, so stale links are never reachable within range.

use super::{HASH_BITS, MIN_MATCH_FIND};

/// Multiplicative hash of the three bytes at the start of `bytes`
pub const fn hash3(bytes: &[u8]) -> usize {
    let value = (bytes[0] as u32) | ((bytes[1] as u32) << 8) | ((bytes[2] as u32) << 16);
    (value.wrapping_mul(0x9E37_79B1) >> (32 - HASH_BITS)) as usize
}

/// Hash chains over the input being compressed
#[derive(Debug)]
pub struct MatchFinder {
    /// Newest position + 1 per hash bucket, 0 when empty
    pub head: Vec<u32>,
    /// Previous position + 1 with the same hash, indexed by position modulo length
    pub chain: Vec<u32>,
    /// Farthest distance a match may reach
    pub max_distance: usize,
    /// Candidates examined per search
    pub depth: u32,
    /// Length that ends a search immediately
    pub nice_len: u32,
}

impl MatchFinder {
    /// Create a finder for `input_len` bytes with the given dictionary size
    pub fn new(dict_size: u32, input_len: usize, depth: u32, nice_len: u32) -> Self {
        let chain_len = (dict_size as usize).min(input_len).max(1);
        Self {
            head: vec![0; 1 << HASH_BITS],
            chain: vec![0; chain_len],
            max_distance: chain_len,
            depth: depth.max(1),
            nice_len: nice_len.max(MIN_MATCH_FIND),
        }
    }

    /// Record the position `pos` of `data`
    #[inline]
    pub fn insert(&mut self, data: &[u8], pos: usize) {
        if pos + MIN_MATCH_FIND as usize > data.len() {
            return;
        }
        let hash = hash3(&data[pos..]);
        let slot = pos % self.chain.len();
        self.chain[slot] = self.head[hash];
        self.head[hash] = (pos + 1) as u32;
    }

    /// Record every position in `start..end`
    pub fn insert_range(&mut self, data: &[u8], start: usize, end: usize) {
        for pos in start..end {
            self.insert(data, pos);
        }
    }

    /// Newest earlier position with the same hash as `pos`, plus one
    pub(crate) fn first_candidate(&self, data: &[u8], pos: usize) -> u32 {
        self.head[hash3(&data[pos..])]
    }

    /// Position preceding `candidate` (both plus one) in its chain
    pub(crate) fn next_candidate(&self, candidate: u32) -> u32 {
        let next = self.chain[(candidate as usize - 1) % self.chain.len()];
        // A link to a newer position means the slot was recycled
        if next >= candidate {
            0
        } else {
            next
        }
    }
}
