//! The 4x4 tile grid and the pure transforms the move engine is built on.
//!
//! This module provides:
//! - `Grid`: a fixed 4x4 matrix of tile values (`0` is an empty cell)
//! - Orientation transforms (`transpose`, `mirror_vertical`)
//! - Queries used by spawning and loss detection
//!
//! Every transform returns a new grid. `Grid` is `Copy`, so handing one out
//! never exposes the engine's live board.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board
pub const SIZE: usize = 4;

/// Largest tile a 4x4 board can ever hold
pub const MAX_TILE: u32 = 1 << 17;

/// Raw row-major cell storage
pub type Cells = [[u32; SIZE]; SIZE];

/// A 4x4 board of tile values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: Cells,
}

impl Grid {
    /// An all-empty grid
    pub const EMPTY: Grid = Grid {
        cells: [[0; SIZE]; SIZE],
    };

    /// Create an empty grid
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Build a grid from row-major values
    pub const fn from_rows(cells: Cells) -> Self {
        Self { cells }
    }

    /// Copy of the row-major values
    pub fn rows(&self) -> Cells {
        self.cells
    }

    /// Value at `(row, col)`, or `None` when out of range
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row][col] = value;
    }

    /// Values of one column, top to bottom
    pub fn column(&self, col: usize) -> [u32; SIZE] {
        let mut out = [0; SIZE];
        for (row, value) in out.iter_mut().enumerate() {
            *value = self.cells[row][col];
        }
        out
    }

    pub(crate) fn set_column(&mut self, col: usize, values: [u32; SIZE]) {
        for (row, value) in values.into_iter().enumerate() {
            self.cells[row][col] = value;
        }
    }

    /// Swap rows and columns: `result[c][r] = self[r][c]`
    pub fn transpose(&self) -> Grid {
        let mut out = Grid::EMPTY;
        for row in 0..SIZE {
            for col in 0..SIZE {
                out.cells[col][row] = self.cells[row][col];
            }
        }
        out
    }

    /// Reverse the row order: `result[3 - r][c] = self[r][c]`
    pub fn mirror_vertical(&self) -> Grid {
        let mut out = Grid::EMPTY;
        for row in 0..SIZE {
            out.cells[SIZE - 1 - row] = self.cells[row];
        }
        out
    }

    /// Coordinates of every empty cell in row-major order
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut empty = Vec::new();
        for (row, values) in self.cells.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value == 0 {
                    empty.push((row, col));
                }
            }
        }
        empty
    }

    /// Whether at least one cell is empty
    pub fn has_empty_cell(&self) -> bool {
        self.cells.iter().flatten().any(|&v| v == 0)
    }

    /// Number of non-empty cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v != 0).count()
    }

    /// Whether two horizontally or vertically adjacent cells hold the same value
    pub fn has_adjacent_pair(&self) -> bool {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let value = self.cells[row][col];
                if col + 1 < SIZE && self.cells[row][col + 1] == value {
                    return true;
                }
                if row + 1 < SIZE && self.cells[row + 1][col] == value {
                    return true;
                }
            }
        }
        false
    }

    /// Full board with no equal neighbours: no move can change it
    pub fn is_stuck(&self) -> bool {
        !self.has_empty_cell() && !self.has_adjacent_pair()
    }

    /// Largest tile on the board (0 for an empty board)
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Non-zero values, sorted ascending
    pub fn tiles(&self) -> Vec<u32> {
        let mut tiles: Vec<u32> = self.cells.iter().flatten().copied().filter(|&v| v != 0).collect();
        tiles.sort_unstable();
        tiles
    }
}

impl From<Cells> for Grid {
    fn from(cells: Cells) -> Self {
        Self::from_rows(cells)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for values in &self.cells {
            let line: Vec<String> = values
                .iter()
                .map(|&v| if v == 0 { ".".to_string() } else { v.to_string() })
                .map(|s| format!("{:>6}", s))
                .collect();
            writeln!(f, "{}", line.concat())?;
        }
        Ok(())
    }
}

/// Whether `value` may appear in a cell: empty or a power of two in `2..=MAX_TILE`
pub fn is_valid_tile(value: u32) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}
