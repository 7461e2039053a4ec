//! Runtime configuration from the environment.

use std::env;
use std::path::PathBuf;

/// Directory holding the saved game and best-score files
pub const DATA_DIR_VAR: &str = "TWENTY48_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Read configuration, falling back to the current directory
    pub fn from_env() -> Self {
        Self::from_var(env::var(DATA_DIR_VAR).ok())
    }

    fn from_var(value: Option<String>) -> Self {
        let data_dir = value
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { data_dir }
    }
}
