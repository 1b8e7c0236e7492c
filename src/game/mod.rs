mod error;
mod session;
mod types;

pub use error::{FenError, MoveError};
pub use session::{AppliedMove, GameSession};
pub use types::{BoardSnapshot, GameAnalysis, GameStatus, MoveRecord, Side};
