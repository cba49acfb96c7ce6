//! Error types for the Macanan engine

use thiserror::Error;

/// Errors surfaced by the game session, persistence and configuration layers.
///
/// Search and move generation never fail: an empty move list or a blocked
/// ray is a normal return value, not an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    /// Move is not in the legal move list for the side to move
    #[error("invalid move: {reason}")]
    InvalidMove { reason: String },

    /// A move was attempted after a winner was declared
    #[error("game is over, {winner} won")]
    GameOver { winner: &'static str },

    /// Saved game JSON is missing fields or contradicts board invariants
    #[error("malformed saved state: {reason}")]
    MalformedSavedState { reason: String },

    /// Configuration file contents are out of range
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error while {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GameError {
    pub fn invalid_move(reason: impl Into<String>) -> Self {
        GameError::InvalidMove {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        GameError::MalformedSavedState {
            reason: reason.into(),
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        GameError::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result alias used across the crate
pub type Result<T, E = GameError> = std::result::Result<T, E>;
