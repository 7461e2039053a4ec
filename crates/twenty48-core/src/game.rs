//! Core game state machine.
//!
//! This module contains the [`Engine`], which owns the session (grid, state,
//! score, best score, undo history) and drives it through new games, loads,
//! moves and undos. Storage goes through a [`SessionStore`]; randomness
//! through any [`rand::Rng`].

use crate::actions::GameEvent;
use crate::grid::Grid;
use crate::history::History;
use crate::moves::{move_tiles, Direction};
use crate::snapshot::{format_best_score, parse_best_score, Snapshot, SnapshotError};
use crate::storage::{SessionStore, StoreError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Chance that a spawned tile is a 2 (otherwise a 4)
const TWO_PROBABILITY: f64 = 0.9;

/// Tiles dealt at the start of a game
const STARTING_TILES: usize = 2;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// No game has been started or loaded yet
    #[default]
    NotStarted,
    /// Moves are accepted
    InProgress,
    /// A merge produced the winning tile
    Won,
    /// The board is full and nothing can merge
    Lost,
}

impl GameState {
    /// Whether the game has ended
    pub fn is_over(&self) -> bool {
        matches!(self, GameState::Won | GameState::Lost)
    }
}

/// Errors that can occur when driving the engine
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Saved game is corrupt: {0}")]
    CorruptSnapshot(#[from] SnapshotError),

    #[error("No saved game to resume")]
    NoSavedGame,

    #[error("Storage error: {0}")]
    Persistence(StoreError),

    #[error("Invalid direction code {0}, expected 1-4")]
    InvalidDirection(u8),
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Corrupt(inner) => GameError::CorruptSnapshot(inner),
            other => GameError::Persistence(other),
        }
    }
}

/// Read-only view of a session, for rendering and JSON export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub grid: Grid,
    pub score: u32,
    pub best_score: u32,
    pub state: GameState,
    pub undo_depth: usize,
}

/// The game engine: one session plus its storage and randomness
#[derive(Debug)]
pub struct Engine<S: SessionStore, R: Rng = StdRng> {
    grid: Grid,
    state: GameState,
    score: u32,
    best_score: u32,
    history: History,
    store: S,
    rng: R,
}

impl<S: SessionStore> Engine<S, StdRng> {
    /// Create an engine seeded from OS entropy
    pub fn new(store: S) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }
}

impl<S: SessionStore, R: Rng> Engine<S, R> {
    /// Create an engine with an explicit random source.
    ///
    /// The best score is read from `store`; a missing or unreadable record
    /// counts as 0.
    pub fn with_rng(store: S, rng: R) -> Self {
        let best_score = read_best_score(&store);

        Self {
            grid: Grid::EMPTY,
            state: GameState::NotStarted,
            score: 0,
            best_score,
            history: History::new(),
            store,
            rng,
        }
    }

    // ==================== Accessors ====================

    /// Copy of the current board
    pub fn board(&self) -> Grid {
        self.grid
    }

    /// Value at `(row, col)`, `None` when out of range
    pub fn tile(&self, row: usize, col: usize) -> Option<u32> {
        self.grid.get(row, col)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Empty cells of the current board
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.grid.empty_cells()
    }

    /// Largest tile on the board
    pub fn max_tile(&self) -> u32 {
        self.grid.max_tile()
    }

    /// Number of history entries (the starting position included)
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Current grid and score as a snapshot
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.grid, self.score)
    }

    /// Whether storage holds a game that can be resumed
    pub fn has_resumable_game(&self) -> bool {
        self.store.has_session()
    }

    /// Everything a presentation layer needs to draw a frame
    pub fn view(&self) -> SessionView {
        SessionView {
            grid: self.grid,
            score: self.score,
            best_score: self.best_score,
            state: self.state,
            undo_depth: self.history.undo_depth(),
        }
    }

    /// The persistence adapter
    pub fn store(&self) -> &S {
        &self.store
    }

    // ==================== Lifecycle ====================

    /// Start a fresh game: empty board, two random tiles, score 0.
    pub fn new_game(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.commit_best_score(&mut events);

        self.grid = Grid::EMPTY;
        self.state = GameState::InProgress;
        self.score = 0;
        events.push(GameEvent::GameStarted);

        for _ in 0..STARTING_TILES {
            events.extend(self.spawn());
        }

        let start = self.snapshot();
        self.history.reset(start);
        self.persist_session();

        info!("New game started");
        events
    }

    /// Resume the game held by the store.
    ///
    /// The session is left untouched when the store has no game, cannot be
    /// read, or holds a corrupt snapshot.
    pub fn load_game(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let snapshot = self.store.load_snapshot()?.ok_or(GameError::NoSavedGame)?;
        Ok(self.load_snapshot(snapshot))
    }

    /// Resume from an already parsed snapshot. No tiles are spawned.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.commit_best_score(&mut events);

        self.state = GameState::InProgress;
        self.grid = snapshot.grid;
        self.score = snapshot.score;
        self.history.reset(snapshot);

        info!("Loaded game with score {}", self.score);
        events.push(GameEvent::GameLoaded { score: self.score });
        events
    }

    // ==================== Play ====================

    /// Slide the board in `direction`.
    ///
    /// Does nothing unless a game is in progress. A move that changes the
    /// board spawns one tile and extends the history; a move that changes
    /// nothing does neither.
    pub fn make_move(&mut self, direction: Direction) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state != GameState::InProgress {
            debug!("Ignoring {:?} move while {:?}", direction, self.state);
            return events;
        }

        let result = move_tiles(&mut self.grid, direction);
        self.score = self.score.saturating_add(result.score);
        if result.reached_win_tile {
            self.state = GameState::Won;
        }

        if result.changed {
            events.push(GameEvent::TilesMoved {
                direction,
                score_gained: result.score,
            });
            events.extend(self.spawn());
            let entry = self.snapshot();
            self.history.push(entry);
            self.persist_session();
            self.commit_best_score(&mut events);
        }

        self.check_loss();

        match self.state {
            GameState::Won => events.push(GameEvent::GameWon { score: self.score }),
            GameState::Lost => events.push(GameEvent::GameLost { score: self.score }),
            _ => {}
        }

        if self.state.is_over() {
            info!("Game over ({:?}) with score {}", self.state, self.score);
            if let Err(e) = self.store.delete_session() {
                warn!("Failed to delete saved game: {}", e);
            }
            self.commit_best_score(&mut events);
        }

        events
    }

    /// [`Engine::make_move`] for a numeric direction code (1-4).
    ///
    /// An out-of-range code is rejected and the session is untouched.
    pub fn make_move_code(&mut self, code: u8) -> Result<Vec<GameEvent>, GameError> {
        let direction = Direction::from_code(code)?;
        Ok(self.make_move(direction))
    }

    /// Take back the most recent move.
    ///
    /// Returns `false` when no game is in progress or the board is already
    /// at the starting position of this game.
    pub fn undo_move(&mut self) -> bool {
        if self.state != GameState::InProgress {
            return false;
        }

        match self.history.undo() {
            Some(previous) => {
                self.grid = previous.grid;
                self.score = previous.score;
                self.persist_session();
                debug!("Undid move, score back to {}", self.score);
                true
            }
            None => {
                if let Some(start) = self.history.current() {
                    self.grid = start.grid;
                    self.score = start.score;
                }
                false
            }
        }
    }

    // ==================== Helper Methods ====================

    fn spawn(&mut self) -> Option<GameEvent> {
        spawn_tile(&mut self.grid, &mut self.rng)
            .map(|(row, col, value)| GameEvent::TileSpawned { row, col, value })
    }

    fn check_loss(&mut self) {
        if self.state == GameState::InProgress && self.grid.is_stuck() {
            self.state = GameState::Lost;
        }
    }

    fn commit_best_score(&mut self, events: &mut Vec<GameEvent>) {
        if self.score <= self.best_score {
            return;
        }
        self.best_score = self.score;
        if let Err(e) = self.store.write_best_score(&format_best_score(self.best_score)) {
            warn!("Failed to persist best score: {}", e);
        }
        events.push(GameEvent::BestScoreUpdated {
            best: self.best_score,
        });
    }

    fn persist_session(&mut self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.store.save_snapshot(&snapshot) {
            warn!("Failed to persist session: {}", e);
        }
    }
}

/// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
///
/// Returns the cell and value, or `None` when the board is full.
pub fn spawn_tile<R: Rng>(grid: &mut Grid, rng: &mut R) -> Option<(usize, usize, u32)> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }

    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let value = if rng.gen_bool(TWO_PROBABILITY) { 2 } else { 4 };
    grid.set(row, col, value);
    Some((row, col, value))
}

fn read_best_score<S: SessionStore>(store: &S) -> u32 {
    match store.read_best_score() {
        Ok(Some(text)) => parse_best_score(&text).unwrap_or_else(|e| {
            warn!("Ignoring unreadable best score record: {}", e);
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            warn!("Failed to read best score: {}", e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn engine() -> Engine<MemoryStore> {
        Engine::with_rng(MemoryStore::new(), StdRng::seed_from_u64(7))
    }

    fn loaded(rows: [[u32; 4]; 4], score: u32) -> Engine<MemoryStore> {
        let mut engine = engine();
        engine.load_snapshot(Snapshot::new(Grid::from_rows(rows), score));
        engine
    }

    #[test]
    fn test_fresh_engine_not_started() {
        let engine = engine();
        assert_eq!(engine.state(), GameState::NotStarted);
        assert_eq!(engine.board(), Grid::EMPTY);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.best_score(), 0);
        assert_eq!(engine.history_len(), 0);
    }

    #[test]
    fn test_best_score_loaded_at_construction() {
        let engine = Engine::new(MemoryStore::with_best_score(900));
        assert_eq!(engine.best_score(), 900);
    }

    #[test]
    fn test_corrupt_best_score_counts_as_zero() {
        let mut store = MemoryStore::new();
        store.write_best_score("best\n").unwrap();
        let mut engine = Engine::with_rng(store, StdRng::seed_from_u64(7));
        assert_eq!(engine.best_score(), 0);

        // The next rise overwrites the bad record
        let rows = [[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]];
        engine.load_snapshot(Snapshot::new(Grid::from_rows(rows), 0));
        engine.make_move(Direction::Left);
        assert_eq!(engine.store().best_score_text(), Some("4\n"));
    }

    /// Store whose reads always fail
    #[derive(Debug, Default)]
    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn read_session(&self) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }

        fn write_session(&mut self, _text: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }

        fn delete_session(&mut self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }

        fn has_session(&self) -> bool {
            false
        }

        fn read_best_score(&self) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }

        fn write_best_score(&mut self, _text: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
    }

    #[test]
    fn test_unreadable_store_still_plays() {
        let mut engine = Engine::with_rng(BrokenStore, StdRng::seed_from_u64(7));
        assert_eq!(engine.best_score(), 0);
        assert!(matches!(
            engine.load_game(),
            Err(GameError::Persistence(StoreError::Unavailable(_)))
        ));

        engine.new_game();
        assert_eq!(engine.state(), GameState::InProgress);
        assert_eq!(engine.board().tile_count(), 2);
    }

    #[test]
    fn test_oversized_values_never_overflow() {
        // Grids built in code skip the parser's bounds
        let mut engine = loaded([[1 << 31, 1 << 31, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
        engine.make_move(Direction::Left);
        assert_eq!(engine.tile(0, 0), Some(u32::MAX));
        assert_eq!(engine.score(), u32::MAX);

        let mut engine = loaded([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], u32::MAX);
        engine.make_move(Direction::Left);
        assert_eq!(engine.score(), u32::MAX);
        assert_eq!(engine.state(), GameState::InProgress);
    }

    #[test]
    fn test_load_game_rejects_out_of_range_snapshot() {
        let text = "2147483648 2147483648 0 0\n0 0 0 0\n0 0 0 0\n0 0 0 0\n0\n";
        let mut engine = Engine::with_rng(MemoryStore::with_session(text), StdRng::seed_from_u64(7));
        assert!(matches!(
            engine.load_game(),
            Err(GameError::CorruptSnapshot(SnapshotError::InvalidTile { row: 0, col: 0, .. }))
        ));
        assert_eq!(engine.state(), GameState::NotStarted);
        assert!(engine.make_move(Direction::Left).is_empty());
    }

    #[test]
    fn test_new_game_deals_two_tiles() {
        let mut engine = engine();
        let events = engine.new_game();

        assert_eq!(engine.state(), GameState::InProgress);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.history_len(), 1);
        assert_eq!(engine.board().tile_count(), 2);
        assert!(engine.board().tiles().iter().all(|&v| v == 2 || v == 4));
        assert_eq!(events[0], GameEvent::GameStarted);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::TileSpawned { .. }))
                .count(),
            2
        );
        assert!(engine.has_resumable_game());
    }

    #[test]
    fn test_moves_ignored_before_start() {
        let mut engine = engine();
        let events = engine.make_move(Direction::Up);
        assert!(events.is_empty());
        assert_eq!(engine.board(), Grid::EMPTY);
        assert!(!engine.undo_move());
    }

    #[test]
    fn test_effective_move_spawns_and_records() {
        let mut engine = loaded([[0, 0, 0, 0], [0, 0, 0, 0], [4, 2, 2, 2], [2, 2, 2, 4]], 0);
        let events = engine.make_move(Direction::Up);

        assert_eq!(engine.score(), 8);
        assert_eq!(engine.history_len(), 2);
        assert_eq!(engine.board().tile_count(), 7);
        assert_eq!(
            events[0],
            GameEvent::TilesMoved {
                direction: Direction::Up,
                score_gained: 8
            }
        );
        assert!(events.contains(&GameEvent::BestScoreUpdated { best: 8 }));
        assert_eq!(engine.store().best_score_text(), Some("8\n"));
        assert_eq!(
            engine.store().session_text().map(|t| Snapshot::parse(t).unwrap()),
            Some(engine.snapshot())
        );
    }

    #[test]
    fn test_noop_move_changes_nothing() {
        let rows = [[2, 4, 8, 16], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
        let mut engine = loaded(rows, 20);
        let events = engine.make_move(Direction::Up);

        assert!(events.is_empty());
        assert_eq!(engine.board().rows(), rows);
        assert_eq!(engine.score(), 20);
        assert_eq!(engine.history_len(), 1);
        assert!(!engine.has_resumable_game());
    }

    #[test]
    fn test_invalid_direction_code_rejected() {
        let mut engine = loaded([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
        let before = engine.snapshot();
        assert!(matches!(
            engine.make_move_code(9),
            Err(GameError::InvalidDirection(9))
        ));
        assert_eq!(engine.snapshot(), before);
        assert!(engine.make_move_code(3).is_ok());
    }

    #[test]
    fn test_win_is_terminal() {
        let mut engine = loaded([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]], 3000);
        let events = engine.make_move(Direction::Left);

        assert_eq!(engine.state(), GameState::Won);
        assert_eq!(engine.tile(0, 0), Some(2048));
        assert!(events.contains(&GameEvent::GameWon { score: 5048 }));
        assert!(!engine.has_resumable_game());
        assert_eq!(engine.best_score(), 5048);

        let frozen = engine.board();
        assert!(engine.make_move(Direction::Right).is_empty());
        assert_eq!(engine.board(), frozen);
        assert!(!engine.undo_move());
    }

    #[test]
    fn test_loss_detected_after_move() {
        // Moving left leaves a single gap for the spawn
        let mut engine = loaded(
            [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [0, 8, 16, 32]],
            100,
        );
        engine.make_move(Direction::Left);

        let board = engine.board();
        assert_eq!(&board.rows()[3][..3], &[8, 16, 32]);
        if board.is_stuck() {
            assert_eq!(engine.state(), GameState::Lost);
            assert!(!engine.has_resumable_game());
        } else {
            assert_eq!(engine.state(), GameState::InProgress);
        }
    }

    #[test]
    fn test_undo_restores_previous_position() {
        let mut engine = engine();
        engine.new_game();
        let start = engine.snapshot();

        let moved = Direction::ALL
            .into_iter()
            .any(|d| !engine.make_move(d).is_empty());
        assert!(moved);

        assert!(engine.undo_move());
        assert_eq!(engine.snapshot(), start);
        assert_eq!(engine.history_len(), 1);

        assert!(!engine.undo_move());
        assert_eq!(engine.snapshot(), start);
        assert_eq!(engine.history_len(), 1);
    }

    #[test]
    fn test_load_game_errors_leave_session_untouched() {
        let mut engine = engine();
        assert!(matches!(engine.load_game(), Err(GameError::NoSavedGame)));
        assert_eq!(engine.state(), GameState::NotStarted);

        let mut engine = Engine::with_rng(
            MemoryStore::with_session("2 0 0 0\n0 0 0 0\n"),
            StdRng::seed_from_u64(1),
        );
        assert!(engine.has_resumable_game());
        assert!(matches!(
            engine.load_game(),
            Err(GameError::CorruptSnapshot(_))
        ));
        assert_eq!(engine.state(), GameState::NotStarted);
    }

    #[test]
    fn test_load_game_from_store() {
        let text = "2 0 0 2\n0 0 0 0\n0 0 0 0\n0 0 0 4\n36\n";
        let mut engine = Engine::with_rng(MemoryStore::with_session(text), StdRng::seed_from_u64(3));
        let events = engine.load_game().unwrap();

        assert_eq!(events, vec![GameEvent::GameLoaded { score: 36 }]);
        assert_eq!(engine.state(), GameState::InProgress);
        assert_eq!(engine.score(), 36);
        assert_eq!(engine.tile(0, 3), Some(2));
        assert_eq!(engine.history_len(), 1);
    }

    #[test]
    fn test_new_game_commits_best_score() {
        let mut engine = loaded([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], 60);
        let events = engine.new_game();
        assert_eq!(events[0], GameEvent::BestScoreUpdated { best: 60 });
        assert_eq!(engine.best_score(), 60);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_spawn_on_full_board_is_noop() {
        let mut grid = Grid::from_rows([[8; 4]; 4]);
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(spawn_tile(&mut grid, &mut rng), None);
        assert_eq!(grid, Grid::from_rows([[8; 4]; 4]));
    }

    #[test]
    fn test_spawn_distribution() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut twos = 0;
        let mut corners = 0;
        let trials = 10_000;

        for _ in 0..trials {
            let mut grid = Grid::EMPTY;
            let (row, col, value) = spawn_tile(&mut grid, &mut rng).unwrap();
            assert_eq!(grid.get(row, col), Some(value));
            assert_eq!(grid.tile_count(), 1);
            if value == 2 {
                twos += 1;
            } else {
                assert_eq!(value, 4);
            }
            if (row, col) == (0, 0) {
                corners += 1;
            }
        }

        // 90% twos, each of 16 cells ~6.25%
        assert!((8_700..=9_300).contains(&twos), "twos = {}", twos);
        assert!((400..=850).contains(&corners), "corner hits = {}", corners);
    }
}
