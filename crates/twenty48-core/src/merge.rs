//! The merge algorithm: slide every column toward row 0.
//!
//! Each column is compacted (empty cells dropped, order kept), then scanned
//! front to back. Two equal neighbours become one tile of double value. A
//! merged tile never merges again in the same pass, so `2 2 2 2` becomes
//! `4 4 0 0`, not `8 0 0 0`.
//!
//! This is the only place the score grows during a move.

use crate::grid::{Grid, SIZE};

/// Tile value that wins the game
pub const WIN_TILE: u32 = 2048;

/// Result of collapsing a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMerge {
    /// Post-slide values, zero padded at the tail
    pub values: [u32; SIZE],
    /// Sum of every tile created by a merge
    pub score: u32,
    /// Whether a merge produced [`WIN_TILE`]
    pub reached_win_tile: bool,
}

/// Result of sliding a whole grid up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub score: u32,
    pub reached_win_tile: bool,
}

/// Collapse one line toward index 0.
pub fn merge_line(line: [u32; SIZE]) -> LineMerge {
    let compacted: Vec<u32> = line.into_iter().filter(|&v| v != 0).collect();

    let mut values = [0; SIZE];
    let mut out = 0;
    let mut score: u32 = 0;
    let mut reached_win_tile = false;
    let mut i = 0;

    while i < compacted.len() {
        let current = compacted[i];
        if compacted.get(i + 1) == Some(&current) {
            let merged = current.saturating_mul(2);
            values[out] = merged;
            score = score.saturating_add(merged);
            if merged == WIN_TILE {
                reached_win_tile = true;
            }
            i += 2;
        } else {
            values[out] = current;
            i += 1;
        }
        out += 1;
    }

    LineMerge {
        values,
        score,
        reached_win_tile,
    }
}

/// Slide every column of `grid` toward row 0, in place.
pub fn slide_up(grid: &mut Grid) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for col in 0..SIZE {
        let merged = merge_line(grid.column(col));
        grid.set_column(col, merged.values);
        outcome.score = outcome.score.saturating_add(merged.score);
        outcome.reached_win_tile |= merged.reached_win_tile;
    }

    outcome
}
