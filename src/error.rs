//! Error types for the move generation and evaluation core.

use thiserror::Error;

/// A failure reported by the board collaborator while answering an
/// occupancy, validity or check query.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("board query failed: {reason}")]
pub struct BoardQueryError {
    pub reason: String,
}

impl BoardQueryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while generating or filtering moves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The piece has no current cell, so reachability is undefined.
    #[error("piece is not placed on any cell")]
    UnplacedPiece,

    /// A board collaborator query failed.
    #[error(transparent)]
    BoardQuery(#[from] BoardQueryError),
}

/// Result type alias for core operations.
pub type EngineResult<T> = Result<T, EngineError>;
