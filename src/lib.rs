//! Single-session chess server library.
//!
//! # Architecture
//!
//! - **Game**: the session aggregate (position, history, move arbitration,
//!   status derivation), backed by `shakmaty` for the rules of chess
//! - **AI**: automated move selection, preferring a UCI engine when one is
//!   available and falling back to a single-ply heuristic
//! - **Engine**: handle for an external UCI engine process over piped stdio
//! - **Server**: thin axum transport exposing the session over HTTP
//!
//! # Example
//!
//! ```
//! use chess_server::{GameSession, GameStatus, Side};
//!
//! let mut session = GameSession::new();
//! session.apply_move("e2e4")?;
//!
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.current_player, Side::Black);
//! assert_eq!(snapshot.game_state, GameStatus::Playing);
//! # Ok::<(), chess_server::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod ai;
mod engine;
mod game;
mod server;

// Crate-level exports - automated move selection
pub use ai::{Difficulty, score_move, select_move, suggestions};

// Crate-level exports - UCI engine handle
pub use engine::{EngineError, UciEngine};

// Crate-level exports - game session types
pub use game::{
    AppliedMove, BoardSnapshot, FenError, GameAnalysis, GameSession, GameStatus, MoveError,
    MoveRecord, Side,
};

// Crate-level exports - HTTP transport
pub use server::{AppState, ChessApp, router, serve};
