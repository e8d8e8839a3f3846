//! Error types for loading levels, tuning and the leaderboard.
//!
//! The simulation itself never fails: gameplay outcomes are events.

use std::fmt;
use std::io;

/// Errors raised at the data edges of the game.
#[derive(Debug)]
pub enum QuantumError {
    /// An I/O error occurred while reading or writing a file.
    Io(io::Error),
    /// A file was not valid JSON for the expected shape.
    Json(serde_json::Error),
    /// Level data parsed but describes an unusable level.
    InvalidLevel {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// Tuning parsed but would break the simulation.
    InvalidTuning {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A campaign level index past the end of the level list.
    UnknownLevel {
        /// The requested index.
        index: usize,
    },
}

impl fmt::Display for QuantumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "malformed JSON: {e}"),
            Self::InvalidLevel { detail } => write!(f, "invalid level: {detail}"),
            Self::InvalidTuning { detail } => write!(f, "invalid tuning: {detail}"),
            Self::UnknownLevel { index } => write!(f, "no level at index {index}"),
        }
    }
}

impl std::error::Error for QuantumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for QuantumError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for QuantumError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
