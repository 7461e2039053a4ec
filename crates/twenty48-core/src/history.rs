//! Undo history.
//!
//! One stack of `(grid, score)` snapshots, most recent on top. Once a game has
//! started the bottom entry is the starting position and is never popped.

use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and start from `start`
    pub fn reset(&mut self, start: Snapshot) {
        self.entries.clear();
        self.entries.push(start);
    }

    pub fn push(&mut self, entry: Snapshot) {
        self.entries.push(entry);
    }

    /// Most recent entry
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    /// Pop the most recent entry and return the one now on top.
    ///
    /// Returns `None` without popping when only the starting entry is left.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        self.entries.last().copied()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many undos are currently possible
    pub fn undo_depth(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }
}
