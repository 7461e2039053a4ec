//! Text formats for persisted state.
//!
//! A session snapshot is five lines: four rows of four space-separated
//! integers, then the score. The best-score record is a single integer line.
//!
//! Parsing is strict. A snapshot that is not exactly four rows of four valid
//! tiles followed by a score is rejected as a whole; no partial board is ever
//! produced. Trailing whitespace and trailing blank lines are tolerated.

use crate::grid::{is_valid_tile, Grid, SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest score a snapshot may carry, far above anything a 4x4 game reaches
pub const MAX_SCORE: u32 = 1 << 26;

/// Reasons a snapshot or best-score record fails to parse
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SnapshotError {
    #[error("expected {expected} lines, found {found}")]
    LineCount { expected: usize, found: usize },

    #[error("row {row} has {found} values, expected 4")]
    RowWidth { row: usize, found: usize },

    #[error("line {line}: '{token}' is not a non-negative integer")]
    NotANumber { line: usize, token: String },

    #[error("row {row}, column {col}: {value} is not a valid tile")]
    InvalidTile { row: usize, col: usize, value: u32 },

    #[error("score {score} is out of range")]
    ScoreOutOfRange { score: u32 },

    #[error("record is empty")]
    Empty,
}

/// A persisted grid + score pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub score: u32,
}

impl Snapshot {
    /// Create a new snapshot
    pub fn new(grid: Grid, score: u32) -> Self {
        Self { grid, score }
    }

    /// Render in the line format
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Parse the line format
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        text.parse()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for values in self.grid.rows() {
            let row: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        writeln!(f, "{}", self.score)
    }
}

impl FromStr for Snapshot {
    type Err = SnapshotError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lines = significant_lines(text);
        if lines.len() != SIZE + 1 {
            return Err(SnapshotError::LineCount {
                expected: SIZE + 1,
                found: lines.len(),
            });
        }

        let mut cells = [[0; SIZE]; SIZE];
        for (row, line) in lines[..SIZE].iter().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != SIZE {
                return Err(SnapshotError::RowWidth {
                    row,
                    found: tokens.len(),
                });
            }
            for (col, token) in tokens.into_iter().enumerate() {
                let value = parse_number(row + 1, token)?;
                if !is_valid_tile(value) {
                    return Err(SnapshotError::InvalidTile { row, col, value });
                }
                cells[row][col] = value;
            }
        }

        let score = parse_number(SIZE + 1, lines[SIZE].trim())?;
        if score > MAX_SCORE {
            return Err(SnapshotError::ScoreOutOfRange { score });
        }

        Ok(Snapshot {
            grid: Grid::from_rows(cells),
            score,
        })
    }
}

/// Render a best-score record
pub fn format_best_score(best: u32) -> String {
    format!("{}\n", best)
}

/// Parse a best-score record (first line only)
pub fn parse_best_score(text: &str) -> Result<u32, SnapshotError> {
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or(SnapshotError::Empty)?;
    parse_number(1, line)
}

/// Lines up to the last non-blank one
fn significant_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines
}

fn parse_number(line: usize, token: &str) -> Result<u32, SnapshotError> {
    token.parse().map_err(|_| SnapshotError::NotANumber {
        line,
        token: token.to_string(),
    })
}
