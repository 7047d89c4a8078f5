//! Match search and parse decisions
//!
//! Greedy parse with a preference for repeat distances: they cost far fewer
//! bits than a fresh distance, so a repeat match is taken whenever it is at
//! most one byte shorter than the best new match.

use super::hash::MatchFinder;
use super::FAR_MATCH_3;
use crate::tables::{MATCH_LEN_MAX, NUM_REPS};

/// Result of pattern matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// Length of the found match (0 if no match)
    pub length: u32,
    /// Backward distance to the match, 1 for the previous byte (0 if no match)
    pub distance: u32,
}

impl MatchResult {
    /// Create a new match result
    pub fn new(length: u32, distance: u32) -> Self {
        Self { length, distance }
    }

    /// Create a "no match" result
    pub fn no_match() -> Self {
        Self {
            length: 0,
            distance: 0,
        }
    }

    /// Check if this represents a usable new match
    pub fn is_match(&self) -> bool {
        self.length >= 3
    }
}

/// Symbol chosen for the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Code one literal
    Literal,
    /// Repeat one byte from the most recent distance
    ShortRep,
    /// Reuse recent distance `index` for `length` bytes
    Rep {
        /// Slot in the recent distance list
        index: usize,
        /// Match length
        length: u32,
    },
    /// New match
    Match {
        /// Backward distance, 1 for the previous byte
        distance: u32,
        /// Match length
        length: u32,
    },
}

impl Choice {
    /// Input bytes covered by this symbol
    pub fn len(&self) -> usize {
        match *self {
            Choice::Literal | Choice::ShortRep => 1,
            Choice::Rep { length, .. } | Choice::Match { length, .. } => length as usize,
        }
    }
}

/// Length of the common prefix of `data[a..]` and `data[b..]`, capped at `limit`
#[inline]
fn common_prefix(data: &[u8], a: usize, b: usize, limit: usize) -> usize {
    data[a..a + limit]
        .iter()
        .zip(&data[b..b + limit])
        .take_while(|(x, y)| x == y)
        .count()
}

impl MatchFinder {
    /// Longest earlier occurrence of the bytes at `pos`
    pub fn find_longest(&self, data: &[u8], pos: usize) -> MatchResult {
        let limit = (data.len() - pos).min(MATCH_LEN_MAX as usize);
        if limit < 3 {
            return MatchResult::no_match();
        }

        let mut best = MatchResult::no_match();
        let mut candidate = self.first_candidate(data, pos);
        let mut remaining = self.depth;

        while candidate != 0 && remaining > 0 {
            let match_pos = candidate as usize - 1;
            if match_pos >= pos {
                candidate = self.next_candidate(candidate);
                continue;
            }
            let distance = pos - match_pos;
            if distance > self.max_distance {
                break;
            }

            let length = common_prefix(data, match_pos, pos, limit) as u32;
            if length > best.length {
                best = MatchResult::new(length, distance as u32);
                if length >= self.nice_len || length as usize == limit {
                    break;
                }
            }

            candidate = self.next_candidate(candidate);
            remaining -= 1;
        }

        if best.is_match() {
            best
        } else {
            MatchResult::no_match()
        }
    }

    /// Pick the symbol to code at `pos`
    ///
    /// `reps` holds recent distances minus one, most recent first.
    pub fn choose(&self, data: &[u8], pos: usize, reps: &[u32; NUM_REPS]) -> Choice {
        let limit = (data.len() - pos).min(MATCH_LEN_MAX as usize);

        let mut best_rep: Option<(usize, u32)> = None;
        for (index, &rep) in reps.iter().enumerate() {
            let distance = rep as usize + 1;
            if distance > pos || distance > self.max_distance {
                continue;
            }
            let length = common_prefix(data, pos - distance, pos, limit) as u32;
            if length >= 2 && best_rep.map_or(true, |(_, best)| length > best) {
                best_rep = Some((index, length));
            }
        }

        let found = self.find_longest(data, pos);

        if let Some((index, length)) = best_rep {
            if length + 1 >= found.length {
                return Choice::Rep { index, length };
            }
        }

        // A far 3-byte match costs more than three literals
        if found.is_match() && !(found.length == 3 && found.distance as usize >= FAR_MATCH_3) {
            return Choice::Match {
                distance: found.distance,
                length: found.length,
            };
        }

        let rep0 = reps[0] as usize + 1;
        if rep0 <= pos && rep0 <= self.max_distance && data[pos] == data[pos - rep0] {
            return Choice::ShortRep;
        }

        Choice::Literal
    }
}
