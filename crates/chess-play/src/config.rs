//! Configuration file loading for the terminal front end.
//!
//! Settings come from `chess-play.toml` in the current directory unless
//! another path is given on the command line. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Front end settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PlayConfig {
    /// Position to start from, as FEN. Defaults to the standard start.
    #[serde(default)]
    pub start_fen: Option<String>,
    /// Mark legal destinations on the board after selecting a piece.
    #[serde(default = "default_show_legal_moves")]
    pub show_legal_moves: bool,
    /// Maximum level for log output on stderr.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_show_legal_moves() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for PlayConfig {
    fn default() -> Self {
        PlayConfig {
            start_fen: None,
            show_legal_moves: default_show_legal_moves(),
            log_level: default_log_level(),
        }
    }
}

impl PlayConfig {
    /// Loads configuration from `path`, or defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("chess-play.toml")
    }
}
