//! Error types for the game core.

use derive_more::{Display, Error};

/// Failure modes for a submitted or selected move.
///
/// A failed move never mutates the session; callers can re-snapshot and
/// report unchanged state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The candidate could not be parsed as coordinate notation.
    #[display("Invalid move format: {}", _0)]
    InvalidFormat(String),

    /// Well-formed notation, but the move is not legal in the current
    /// position (includes pseudo-legal moves that leave the king in check).
    #[display("Illegal move: {}", _0)]
    IllegalMove(String),

    /// The position is terminal; there is nothing to select.
    #[display("No legal moves available")]
    NoLegalMoves,
}

impl std::error::Error for MoveError {}

/// Error parsing a FEN position string.
#[derive(Debug, Clone, Display, Error)]
#[display("Invalid FEN: {}", message)]
pub struct FenError {
    /// What was wrong with the input.
    pub message: String,
}

impl FenError {
    /// Creates a new FEN error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
