//! Append-only transcript

use super::turn::{SenderType, Turn};

/// Ordered, append-only log of turns (Entity)
///
/// Steady-state mutation is limited to [`Transcript::append`]. The only
/// other writer is [`Transcript::replace_all`], reserved for the initial load
/// of a persisted consultation and the authoritative reload on completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn to the end of the log.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Replace the whole log with an authoritative history.
    pub fn replace_all(&mut self, turns: Vec<Turn>) {
        self.turns = turns;
    }

    /// Ordered copy of the log, safe to hand to readers mid-run.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn count_by(&self, sender_type: SenderType) -> usize {
        self.turns
            .iter()
            .filter(|t| t.sender_type() == sender_type)
            .count()
    }
}
