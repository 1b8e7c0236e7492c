//! The game session: authoritative position, history, and move arbitration.

use super::error::{FenError, MoveError};
use super::types::{BoardSnapshot, GameAnalysis, GameStatus, MoveRecord, Side};
use chrono::Utc;
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Result of a successfully arbitrated move.
#[derive(Debug, Clone)]
pub struct AppliedMove {
    /// The applied move in canonical UCI notation.
    pub notation: String,
    /// Snapshot taken after the move.
    pub snapshot: BoardSnapshot,
}

/// A single chess game: the position, its move history, and the repetition
/// counts needed for draw detection.
///
/// The side to move is never stored separately; it is always derived from
/// the position, so the two cannot diverge.
#[derive(Debug, Clone)]
pub struct GameSession {
    position: Chess,
    history: Vec<MoveRecord>,
    repetitions: HashMap<u64, u32>,
}

impl GameSession {
    /// Creates a session at the standard starting position.
    #[instrument]
    pub fn new() -> Self {
        Self::with_position(Chess::default())
    }

    /// Creates a session from a FEN string, with empty history.
    #[instrument]
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed: Fen = fen
            .parse()
            .map_err(|e| FenError::new(format!("{e}: {fen}")))?;
        let position = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| FenError::new(format!("{e}: {fen}")))?;
        Ok(Self::with_position(position))
    }

    fn with_position(position: Chess) -> Self {
        let mut session = Self {
            position,
            history: Vec::new(),
            repetitions: HashMap::new(),
        };
        session.count_repetition();
        session
    }

    /// Reinstalls the starting position, clearing history and repetition
    /// counts, and returns the fresh snapshot.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> BoardSnapshot {
        info!(moves_discarded = self.history.len(), "resetting game session");
        *self = Self::new();
        self.snapshot()
    }

    /// Returns the current position.
    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// Returns the move history since the last reset.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Returns the side to move, derived from the position.
    pub fn current_player(&self) -> Side {
        Side::from(self.position.turn())
    }

    /// Returns the position serialized as FEN.
    pub fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    /// Returns all legal moves in UCI notation, in enumeration order.
    pub fn legal_moves(&self) -> Vec<String> {
        self.position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect()
    }

    /// Whether any drawing condition holds: insufficient material, the
    /// fifty-move rule, or threefold repetition of the current position.
    pub fn is_draw(&self) -> bool {
        self.position.is_insufficient_material()
            || self.position.halfmoves() >= 100
            || self
                .repetitions
                .get(&self.position_key())
                .is_some_and(|count| *count >= 3)
    }

    /// Derives the status classification. First match wins:
    /// checkmate, stalemate, draw, check, playing.
    pub fn status(&self) -> GameStatus {
        if self.position.is_checkmate() {
            GameStatus::Checkmate
        } else if self.position.is_stalemate() {
            GameStatus::Stalemate
        } else if self.is_draw() {
            GameStatus::Draw
        } else if self.position.is_check() {
            GameStatus::Check
        } else {
            GameStatus::Playing
        }
    }

    /// Takes a point-in-time view of the board. No side effects; calling
    /// twice without an intervening mutation yields identical results.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            fen: self.fen(),
            legal_moves: self.legal_moves(),
            is_check: self.position.is_check(),
            is_checkmate: self.position.is_checkmate(),
            is_stalemate: self.position.is_stalemate(),
            is_draw: self.is_draw(),
            current_player: self.current_player(),
            move_history: self.history.clone(),
            game_state: self.status(),
        }
    }

    /// Arbitrates a candidate move in UCI coordinate notation.
    ///
    /// Parse failures and illegal moves leave the session untouched.
    /// On success the move is applied, a history record is appended, and
    /// the side to move flips with the position.
    #[instrument(skip(self), fields(player = ?self.current_player()))]
    pub fn apply_move(&mut self, candidate: &str) -> Result<AppliedMove, MoveError> {
        let uci: UciMove = candidate
            .parse()
            .map_err(|_| MoveError::InvalidFormat(candidate.to_string()))?;
        let mov = uci
            .to_move(&self.position)
            .map_err(|_| MoveError::IllegalMove(candidate.to_string()))?;

        let player = self.current_player();
        let notation = mov.to_uci(CastlingMode::Standard).to_string();
        self.position.play_unchecked(&mov);
        self.history.push(MoveRecord {
            notation: notation.clone(),
            player,
            timestamp: Utc::now(),
        });
        self.count_repetition();

        debug!(%notation, status = ?self.status(), "move applied");
        Ok(AppliedMove {
            notation,
            snapshot: self.snapshot(),
        })
    }

    /// Aggregates move counts by side, status, and the current position.
    pub fn analysis(&self) -> GameAnalysis {
        let white_moves = self
            .history
            .iter()
            .filter(|record| record.player == Side::White)
            .count();
        GameAnalysis {
            total_moves: self.history.len(),
            white_moves,
            black_moves: self.history.len() - white_moves,
            game_state: self.status(),
            current_position: self.fen(),
        }
    }

    fn position_key(&self) -> u64 {
        self.position
            .zobrist_hash::<Zobrist64>(EnPassantMode::Legal)
            .0
    }

    fn count_repetition(&mut self) {
        let key = self.position_key();
        *self.repetitions.entry(key).or_insert(0) += 1;
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
