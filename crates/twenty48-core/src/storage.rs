//! Persistence seam.
//!
//! The engine never touches storage directly. It talks to a [`SessionStore`],
//! which owns the in-progress snapshot and the best-score record. Failures are
//! reported as [`StoreError`] and never stop the game.

use crate::snapshot::{Snapshot, SnapshotError};
use thiserror::Error;

/// Errors raised by a persistence adapter
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence unavailable: {0}")]
    Unavailable(String),

    #[error("stored record is corrupt: {0}")]
    Corrupt(#[from] SnapshotError),
}

/// Storage for the in-progress session and the best score
pub trait SessionStore {
    /// Raw text of the saved session, `None` when there is none
    fn read_session(&self) -> Result<Option<String>, StoreError>;

    fn write_session(&mut self, text: &str) -> Result<(), StoreError>;

    /// Remove the saved session; removing a missing one is not an error
    fn delete_session(&mut self) -> Result<(), StoreError>;

    /// Whether a saved session exists
    fn has_session(&self) -> bool;

    /// Raw text of the best-score record, `None` when there is none
    fn read_best_score(&self) -> Result<Option<String>, StoreError>;

    fn write_best_score(&mut self, text: &str) -> Result<(), StoreError>;

    /// Load and parse the saved session
    fn load_snapshot(&self) -> Result<Option<Snapshot>, StoreError> {
        match self.read_session()? {
            Some(text) => Ok(Some(Snapshot::parse(&text)?)),
            None => Ok(None),
        }
    }

    fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.write_session(&snapshot.to_text())
    }
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    session: Option<String>,
    best_score: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a best-score record
    pub fn with_best_score(best: u32) -> Self {
        Self {
            session: None,
            best_score: Some(crate::snapshot::format_best_score(best)),
        }
    }

    /// Store pre-seeded with a raw session text
    pub fn with_session(text: impl Into<String>) -> Self {
        Self {
            session: Some(text.into()),
            best_score: None,
        }
    }

    /// Raw session text, for inspection
    pub fn session_text(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Raw best-score text, for inspection
    pub fn best_score_text(&self) -> Option<&str> {
        self.best_score.as_deref()
    }
}

impl SessionStore for MemoryStore {
    fn read_session(&self) -> Result<Option<String>, StoreError> {
        Ok(self.session.clone())
    }

    fn write_session(&mut self, text: &str) -> Result<(), StoreError> {
        self.session = Some(text.to_string());
        Ok(())
    }

    fn delete_session(&mut self) -> Result<(), StoreError> {
        self.session = None;
        Ok(())
    }

    fn has_session(&self) -> bool {
        self.session.is_some()
    }

    fn read_best_score(&self) -> Result<Option<String>, StoreError> {
        Ok(self.best_score.clone())
    }

    fn write_best_score(&mut self, text: &str) -> Result<(), StoreError> {
        self.best_score = Some(text.to_string());
        Ok(())
    }
}
