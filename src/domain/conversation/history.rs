//! Bounded turn history.

use std::collections::VecDeque;

use super::turn::ConversationTurn;

/// Maximum number of turns kept per (user, mode).
pub const MAX_HISTORY_LENGTH: usize = 50;

/// Turn history trimmed at write time.
///
/// # Invariants
///
/// - `len() <= capacity()` after every operation
/// - the oldest turns are discarded first; order of the rest is preserved
/// - what is stored is exactly what is read back; there is no second,
///   read-time window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedHistory {
    turns: VecDeque<ConversationTurn>,
    capacity: usize,
}

impl BoundedHistory {
    /// Creates an empty history holding at most `capacity` turns (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a turn, dropping the oldest turns beyond capacity.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for BoundedHistory {
    fn default() -> Self {
        Self::new(MAX_HISTORY_LENGTH)
    }
}
