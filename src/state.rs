//! Literal/match state machine
//!
//! Twelve states remember the kinds of the last few symbols. The current
//! state selects the `is_match`/`is_rep` probability contexts and whether a
//! literal is coded plainly or against the byte at the last distance.

use crate::tables::NUM_STATES;

/// Kind of symbol just coded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A single literal byte
    Literal,
    /// A match with an explicitly coded distance
    Match,
    /// A match reusing one of the four recent distances
    Rep,
    /// One byte copied from the most recent distance
    ShortRep,
}

/// Position in the 12-state automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct State(u8);

impl State {
    /// Initial state of every stream
    pub const INITIAL: State = State(0);

    /// Build a state from its numeric value, `None` when out of range
    pub fn new(value: u8) -> Option<Self> {
        ((value as usize) < NUM_STATES).then_some(Self(value))
    }

    /// Numeric value in `0..12`
    pub fn value(self) -> u8 {
        self.0
    }

    /// Index into per-state probability tables
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// True when the previous symbol was a literal
    pub fn is_literal(self) -> bool {
        self.0 < 7
    }

    /// State after coding `event`
    pub fn update(self, event: Event) -> Self {
        Self(match event {
            Event::Literal => after_literal(self.0),
            Event::Match => after_match(self.0),
            Event::Rep => after_rep(self.0),
            Event::ShortRep => after_short_rep(self.0),
        })
    }
}

/// Transition after a literal
pub const fn after_literal(state: u8) -> u8 {
    if state < 4 {
        0
    } else if state < 10 {
        state - 3
    } else {
        state - 6
    }
}

/// Transition after a match
pub const fn after_match(state: u8) -> u8 {
    if state < 7 {
        7
    } else {
        10
    }
}

/// Transition after a repeat match
pub const fn after_rep(state: u8) -> u8 {
    if state < 7 {
        8
    } else {
        11
    }
}

/// Transition after a short repeat
pub const fn after_short_rep(state: u8) -> u8 {
    if state < 7 {
        9
    } else {
        11
    }
}
