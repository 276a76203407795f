use std::path::PathBuf;

use thiserror::Error;

use crate::session::{Command, GameState};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SongError {
    #[error("song has no notes")]
    Empty,
    #[error("tempo must be > 0 (got {0})")]
    NonPositiveTempo(f64),
    #[error("note {index} ({pitch}): start time {start_time} is negative")]
    NegativeStartTime {
        index: usize,
        pitch: String,
        start_time: f64,
    },
    #[error("note {index} ({pitch}): duration must be > 0 (got {duration})")]
    NonPositiveDuration {
        index: usize,
        pitch: String,
        duration: f64,
    },
    #[error("note {index} ({pitch}) starts at {start_time} before the previous note at {previous}")]
    Unordered {
        index: usize,
        pitch: String,
        start_time: f64,
        previous: f64,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse json")]
    Json(#[from] serde_json::Error),
    #[error("invalid song")]
    Invalid(#[from] SongError),
    #[error("script event {index}: time {at} must be finite and >= 0")]
    ScriptTime { index: usize, at: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config json")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("cannot {command} while in {state}")]
    Illegal { state: GameState, command: Command },
    #[error("no built-in song at index {0}")]
    UnknownSong(usize),
    #[error(transparent)]
    InvalidSong(#[from] SongError),
}

/// Failure reported by a presentation adapter. The session logs these and
/// keeps simulating.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{adapter}: {message}")]
pub struct PresentationError {
    pub adapter: &'static str,
    pub message: String,
}

impl PresentationError {
    pub fn new(adapter: &'static str, message: impl Into<String>) -> Self {
        Self {
            adapter,
            message: message.into(),
        }
    }
}
