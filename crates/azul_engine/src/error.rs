//! Error types for the Azul engine
//!
//! Covers broken move invariants, search failures and snapshot validation.
//! Running out of thinking time is not an error: the search returns its best
//! completed result instead.

use thiserror::Error;

/// Errors that can occur in the engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Move does not fit the state it is applied to (or undone from)
    #[error("Invalid move: {message}")]
    InvalidMove { message: String },

    /// Search was asked to move in a position without legal moves
    #[error("No legal moves available for player {player}")]
    NoLegalMoves { player: usize },

    /// Search was cancelled or timed out before depth 1 finished
    #[error("Search stopped before completing depth 1")]
    NoCompletedDepth,

    /// Player index outside 0..2
    #[error("Invalid player index: {index} (must be 0 or 1)")]
    PlayerOutOfRange { index: usize },

    /// Snapshot parsed but describes an impossible position
    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    /// Tile name not recognised by the snapshot format
    #[error("Unknown tile name: {0:?}")]
    UnknownTile(String),

    /// Evaluator name not recognised
    #[error("Unknown evaluator: {0:?} (expected points or potential)")]
    UnknownEvaluator(String),

    /// Snapshot is not valid JSON or has the wrong shape
    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn invalid_move(message: impl Into<String>) -> Self {
        EngineError::InvalidMove {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_snapshot(message: impl Into<String>) -> Self {
        EngineError::InvalidSnapshot {
            message: message.into(),
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
