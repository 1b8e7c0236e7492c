//! Tests for automated move selection, scoring, and suggestions.

use chess_server::{Difficulty, GameSession, MoveError, score_move, select_move, suggestions};
use shakmaty::uci::UciMove;

// Englund-style position: white's d4 pawn can capture on e5.
const CAPTURE_FEN: &str = "rnbqkbnr/pppp1ppp/8/4p3/3P4/8/PPP1PPPP/RNBQKBNR w KQkq - 0 2";

fn scored(session: &GameSession, notation: &str) -> i32 {
    let uci: UciMove = notation.parse().unwrap();
    let mov = uci.to_move(session.position()).unwrap();
    score_move(session.position(), &mov)
}

#[test]
fn test_center_destination_scores_five() {
    let session = GameSession::new();
    assert_eq!(scored(&session, "e2e4"), 5);
    assert_eq!(scored(&session, "d2d4"), 5);
    assert_eq!(scored(&session, "b1c3"), 0);
    assert_eq!(scored(&session, "g1f3"), 0);
}

#[test]
fn test_capture_on_center_square_scores_fifteen() {
    let session = GameSession::from_fen(CAPTURE_FEN).unwrap();
    assert_eq!(scored(&session, "d4e5"), 15);
}

#[test]
fn test_checking_move_scores_fifty() {
    // after 1. e3 f6, the queen check on h5 is available
    let session =
        GameSession::from_fen("rnbqkbnr/ppppp1pp/5p2/8/8/4P3/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
            .unwrap();
    assert_eq!(scored(&session, "d1h5"), 50);
}

#[tokio::test]
async fn test_easy_selects_a_legal_opening_move() {
    let legal = GameSession::new().snapshot().legal_moves;
    let mut session = GameSession::new();

    let applied = select_move(&mut session, None, Difficulty::Easy)
        .await
        .unwrap();
    assert!(legal.contains(&applied.notation));
    assert_eq!(session.snapshot().move_history.len(), 1);
}

#[tokio::test]
async fn test_scored_selection_takes_the_unique_best_move() {
    // d4e5 is the only capture and outscores every other move
    let mut session = GameSession::from_fen(CAPTURE_FEN).unwrap();
    let applied = select_move(&mut session, None, Difficulty::Medium)
        .await
        .unwrap();
    assert_eq!(applied.notation, "d4e5");
}

#[tokio::test]
async fn test_selector_fails_on_terminal_position() {
    let mut session = GameSession::new();
    for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        session.apply_move(mv).unwrap();
    }

    let err = select_move(&mut session, None, Difficulty::Hard)
        .await
        .unwrap_err();
    assert_eq!(err, MoveError::NoLegalMoves);
    assert_eq!(session.snapshot().move_history.len(), 4);
}

#[test]
fn test_suggestions_respect_limit_and_move_count() {
    let session = GameSession::new();
    assert!(suggestions(&session, 0).is_empty());
    assert_eq!(suggestions(&session, 3).len(), 3);
    assert_eq!(suggestions(&session, 100).len(), 20);
}

#[test]
fn test_suggestion_scores_are_non_increasing() {
    let session = GameSession::from_fen(CAPTURE_FEN).unwrap();
    let ranked = suggestions(&session, 50);

    assert_eq!(ranked[0], "d4e5");
    let scores: Vec<i32> = ranked.iter().map(|mv| scored(&session, mv)).collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn test_suggestions_on_terminal_position_are_empty() {
    let mut session = GameSession::new();
    for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        session.apply_move(mv).unwrap();
    }
    assert!(suggestions(&session, 5).is_empty());
}

#[test]
fn test_scoring_does_not_mutate_the_session() {
    let session = GameSession::new();
    let before = session.snapshot();
    let _ = suggestions(&session, 20);
    assert_eq!(session.snapshot(), before);
}
