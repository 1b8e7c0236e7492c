//! Automated move selection: engine-first with a local heuristic fallback.

use crate::engine::UciEngine;
use crate::game::{AppliedMove, GameSession, MoveError};
use rand::seq::SliceRandom;
use rand::thread_rng;
use shakmaty::{CastlingMode, Chess, Move, Position, Square};
use std::time::Duration;
use strum::{Display, EnumString};
use tracing::{debug, instrument, warn};

/// Difficulty tier for automated play, governing the engine time budget and
/// the fallback selection policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Shortest engine budget; fallback picks uniformly at random.
    Easy,
    /// Default tier.
    #[default]
    Medium,
    /// Longer engine budget.
    Hard,
    /// Longest engine budget.
    Expert,
}

impl Difficulty {
    /// Engine search budget for this tier.
    pub fn time_budget(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(100),
            Difficulty::Medium => Duration::from_millis(500),
            Difficulty::Hard => Duration::from_millis(1000),
            Difficulty::Expert => Duration::from_millis(2000),
        }
    }
}

const CENTER_SQUARES: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

/// Scores a legal move with a single-ply static evaluation: +50 if it gives
/// check, +10 if it captures, +5 if it lands on a center square.
///
/// The move is applied to a throwaway clone of the position, so the caller's
/// position is never touched and restoration is guaranteed by scoping.
pub fn score_move(position: &Chess, mov: &Move) -> i32 {
    let mut score = 0;
    let mut speculative = position.clone();
    speculative.play_unchecked(mov);
    if speculative.is_check() {
        score += 50;
    }
    if mov.is_capture() {
        score += 10;
    }
    if CENTER_SQUARES.contains(&mov.to()) {
        score += 5;
    }
    score
}

/// Picks a move without engine help: uniformly at random on Easy, otherwise
/// the highest-scoring move with ties broken by enumeration order.
///
/// Returns `None` only when the position has no legal moves.
fn heuristic_move(position: &Chess, difficulty: Difficulty) -> Option<Move> {
    let moves = position.legal_moves();
    if difficulty == Difficulty::Easy {
        return moves.choose(&mut thread_rng()).cloned();
    }

    let mut best: Option<(Move, i32)> = None;
    for mov in &moves {
        let score = score_move(position, mov);
        // strict comparison keeps the first-encountered move on ties
        if best.as_ref().is_none_or(|(_, top)| score > *top) {
            best = Some((mov.clone(), score));
        }
    }
    best.map(|(mov, _)| mov)
}

/// Selects and applies a move for the side to move.
///
/// Prefers the strong-play engine under the tier's time budget; any engine
/// failure is recovered locally via the heuristic and never surfaced. The
/// chosen move is routed through the session's arbiter either way.
#[instrument(skip(session, engine))]
pub async fn select_move(
    session: &mut GameSession,
    engine: Option<&mut UciEngine>,
    difficulty: Difficulty,
) -> Result<AppliedMove, MoveError> {
    if session.position().legal_moves().is_empty() {
        return Err(MoveError::NoLegalMoves);
    }

    if let Some(engine) = engine {
        match engine.best_move(&session.fen(), difficulty.time_budget()).await {
            Ok(Some(notation)) => {
                debug!(%notation, "engine proposed a move");
                return session.apply_move(&notation);
            }
            Ok(None) => warn!("engine reported no best move, using heuristic fallback"),
            Err(error) => warn!(%error, "engine query failed, using heuristic fallback"),
        }
    }

    let chosen = match heuristic_move(session.position(), difficulty) {
        Some(mov) => mov,
        None => return Err(MoveError::NoLegalMoves),
    };
    let notation = chosen.to_uci(CastlingMode::Standard).to_string();
    debug!(%notation, "heuristic chose a move");
    session.apply_move(&notation)
}

/// Ranks all legal moves by the single-ply evaluation and returns the top
/// `limit` in UCI notation. Ties keep move-generation order.
pub fn suggestions(session: &GameSession, limit: usize) -> Vec<String> {
    let position = session.position();
    let mut scored: Vec<(Move, i32)> = position
        .legal_moves()
        .iter()
        .map(|mov| (mov.clone(), score_move(position, mov)))
        .collect();
    // sort_by is stable, so equal scores stay in enumeration order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(limit);
    scored
        .into_iter()
        .map(|(mov, _)| mov.to_uci(CastlingMode::Standard).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parses_lowercase_and_mixed_case() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("EXPERT".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert!("grandmaster".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_time_budgets_increase_with_difficulty() {
        let tiers = [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ];
        assert_eq!(tiers[0].time_budget(), Duration::from_millis(100));
        assert_eq!(tiers[3].time_budget(), Duration::from_millis(2000));
        assert!(
            tiers
                .windows(2)
                .all(|pair| pair[0].time_budget() < pair[1].time_budget())
        );
    }
}
