//! Core domain types for the chess session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// Side of the board a player commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// White (moves first).
    White,
    /// Black (moves second).
    Black,
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

/// Single classification of the game, derived on demand from the position.
///
/// Exactly one variant applies at a time: checkmate takes precedence over
/// stalemate, stalemate over draw, draw over check, check over playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Game is ongoing, side to move is not in check.
    Playing,
    /// Side to move is in check but has legal moves.
    Check,
    /// Side to move is checkmated.
    Checkmate,
    /// Side to move has no legal moves but is not in check.
    Stalemate,
    /// Drawn by insufficient material, the fifty-move rule, or repetition.
    Draw,
}

/// One successfully applied move, as recorded in the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The move in UCI coordinate notation.
    #[serde(rename = "move")]
    pub notation: String,
    /// The side that played the move.
    pub player: Side,
    /// When the move was applied.
    pub timestamp: DateTime<Utc>,
}

/// Point-in-time view of the board, produced by [`GameSession::snapshot`].
///
/// [`GameSession::snapshot`]: super::GameSession::snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Position in FEN notation.
    pub fen: String,
    /// All legal moves in UCI notation, in enumeration order.
    pub legal_moves: Vec<String>,
    /// Whether the side to move is in check.
    pub is_check: bool,
    /// Whether the side to move is checkmated.
    pub is_checkmate: bool,
    /// Whether the side to move is stalemated.
    pub is_stalemate: bool,
    /// Whether any drawing condition holds.
    pub is_draw: bool,
    /// The side to move.
    pub current_player: Side,
    /// Every move applied since the last reset.
    pub move_history: Vec<MoveRecord>,
    /// Derived status classification.
    pub game_state: GameStatus,
}

/// Aggregate statistics over the session, for the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameAnalysis {
    /// Moves applied since the last reset.
    pub total_moves: usize,
    /// Moves played by White.
    pub white_moves: usize,
    /// Moves played by Black.
    pub black_moves: usize,
    /// Derived status classification.
    pub game_state: GameStatus,
    /// Current position in FEN notation.
    pub current_position: String,
}
