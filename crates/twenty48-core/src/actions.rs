//! Events emitted by the engine.
//!
//! Starting, loading and moving on [`crate::Engine`] return the events they
//! produced, in order, so a presentation layer can update its widgets without polling.

use crate::moves::Direction;
use serde::{Deserialize, Serialize};

/// Events that occur as a result of engine calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh game was dealt
    GameStarted,

    /// A saved game was restored
    GameLoaded { score: u32 },

    /// Tiles slid and merged
    TilesMoved {
        direction: Direction,
        score_gained: u32,
    },

    /// A random tile appeared
    TileSpawned { row: usize, col: usize, value: u32 },

    /// The best score was raised
    BestScoreUpdated { best: u32 },

    /// The winning tile was made
    GameWon { score: u32 },

    /// No move can change the board
    GameLost { score: u32 },
}

impl GameEvent {
    /// Whether this event ends the game
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::GameWon { .. } | GameEvent::GameLost { .. })
    }
}
