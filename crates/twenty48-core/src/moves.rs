//! Directions and the move engine.
//!
//! Every direction is reduced to "slide up" by re-orienting the grid first
//! and restoring the orientation afterwards:
//! - Up: slide up
//! - Right: transpose, mirror, slide up, mirror, transpose
//! - Down: mirror, slide up, mirror
//! - Left: transpose, slide up, transpose

use crate::game::GameError;
use crate::grid::Grid;
use crate::merge::{slide_up, MergeOutcome};
use serde::{Deserialize, Serialize};

/// Direction of a move.
///
/// The numeric codes (1 = up, 2 = right, 3 = down, 4 = left) are part of the
/// public contract and only matter at serialization edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in code order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Numeric code of this direction
    pub const fn code(self) -> u8 {
        match self {
            Direction::Up => 1,
            Direction::Right => 2,
            Direction::Down => 3,
            Direction::Left => 4,
        }
    }

    /// Parse a numeric code, rejecting anything outside 1..=4
    pub fn from_code(code: u8) -> Result<Self, GameError> {
        match code {
            1 => Ok(Direction::Up),
            2 => Ok(Direction::Right),
            3 => Ok(Direction::Down),
            4 => Ok(Direction::Left),
            other => Err(GameError::InvalidDirection(other)),
        }
    }

    fn needs_transpose(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }

    fn needs_mirror(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

impl TryFrom<u8> for Direction {
    type Error = GameError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Direction::from_code(code)
    }
}

/// What a single move did to the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveResult {
    /// Whether any cell differs from the pre-move grid
    pub changed: bool,
    /// Score produced by merges in this move
    pub score: u32,
    /// Whether a merge produced the winning tile
    pub reached_win_tile: bool,
}

/// Apply `direction` to `grid` in place.
///
/// A move that changes nothing leaves `grid` bit-for-bit identical and
/// reports a zero score.
pub fn move_tiles(grid: &mut Grid, direction: Direction) -> MoveResult {
    let before = *grid;

    let mut oriented = orient(before, direction);
    let MergeOutcome {
        score,
        reached_win_tile,
    } = slide_up(&mut oriented);
    *grid = restore(oriented, direction);

    MoveResult {
        changed: *grid != before,
        score,
        reached_win_tile,
    }
}

/// Whether moving in `direction` would change `grid`
pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    let mut probe = *grid;
    move_tiles(&mut probe, direction).changed
}

fn orient(grid: Grid, direction: Direction) -> Grid {
    let mut out = grid;
    if direction.needs_transpose() {
        out = out.transpose();
    }
    if direction.needs_mirror() {
        out = out.mirror_vertical();
    }
    out
}

fn restore(grid: Grid, direction: Direction) -> Grid {
    let mut out = grid;
    if direction.needs_mirror() {
        out = out.mirror_vertical();
    }
    if direction.needs_transpose() {
        out = out.transpose();
    }
    out
}
