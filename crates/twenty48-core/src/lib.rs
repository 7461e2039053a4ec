//! Twenty48 - a 4x4 sliding-tile merge puzzle engine
//!
//! This crate provides the core game logic for Twenty48, including:
//! - The 4x4 grid and its orientation transforms
//! - The slide/merge algorithm and the move engine built on it
//! - Game state machine with win/loss detection, scoring and undo
//! - Text snapshot formats and the persistence seam
//!
//! # Architecture
//!
//! The engine is synchronous and owns all state. A presentation layer calls
//! into [`Engine`], renders from the returned [`GameEvent`]s or from the
//! accessors, and supplies a [`SessionStore`] for persistence. It can be
//! compiled to:
//! - Native Rust for terminal front ends
//! - WebAssembly for browser play (`wasm` feature)
//!
//! # Modules
//!
//! - [`grid`]: Board representation and pure transforms
//! - [`merge`]: Single-column slide and merge
//! - [`moves`]: Directions and the move engine
//! - [`history`]: Undo stack
//! - [`snapshot`]: Persisted text formats
//! - [`storage`]: Persistence adapter trait and in-memory store
//! - [`game`]: Game state machine

pub mod actions;
pub mod game;
pub mod grid;
pub mod history;
pub mod merge;
pub mod moves;
pub mod snapshot;
pub mod storage;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::GameEvent;
pub use game::{spawn_tile, Engine, GameError, GameState, SessionView};
pub use grid::{Grid, MAX_TILE, SIZE};
pub use history::History;
pub use merge::{merge_line, WIN_TILE};
pub use moves::{can_move, move_tiles, Direction, MoveResult};
pub use snapshot::{Snapshot, SnapshotError, MAX_SCORE};
pub use storage::{MemoryStore, SessionStore, StoreError};
