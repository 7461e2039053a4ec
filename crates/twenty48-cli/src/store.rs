//! File-system persistence adapter.
//!
//! The saved game lives in `game_state.txt` and the best score in
//! `game_stats.txt`, both inside the configured data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use twenty48_core::{SessionStore, StoreError};

pub const SESSION_FILE: &str = "game_state.txt";
pub const STATS_FILE: &str = "game_stats.txt";

/// Stores session and best score as text files in one directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.dir.join(STATS_FILE)
    }

    fn read(path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable(path, e)),
        }
    }

    fn write(&self, path: &Path, text: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| unavailable(&self.dir, e))?;
        fs::write(path, text).map_err(|e| unavailable(path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

fn unavailable(path: &Path, err: std::io::Error) -> StoreError {
    warn!("Storage error on {}: {}", path.display(), err);
    StoreError::Unavailable(format!("{}: {}", path.display(), err))
}

impl SessionStore for FileStore {
    fn read_session(&self) -> Result<Option<String>, StoreError> {
        Self::read(&self.session_path())
    }

    fn write_session(&mut self, text: &str) -> Result<(), StoreError> {
        self.write(&self.session_path(), text)
    }

    fn delete_session(&mut self) -> Result<(), StoreError> {
        let path = self.session_path();
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(unavailable(&path, e)),
        }
    }

    fn has_session(&self) -> bool {
        self.session_path().is_file()
    }

    fn read_best_score(&self) -> Result<Option<String>, StoreError> {
        Self::read(&self.stats_path())
    }

    fn write_best_score(&mut self, text: &str) -> Result<(), StoreError> {
        self.write(&self.stats_path(), text)
    }
}
