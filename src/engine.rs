//! Handle for an external UCI engine process.
//!
//! The engine is an optional collaborator: it is spawned best-effort at
//! startup, queried under a per-move time budget, and released best-effort
//! at shutdown. Every failure here is recoverable; the caller falls back to
//! local selection.

use derive_more::{Display, Error};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;
use tracing::{debug, info, instrument};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
// `go movetime` replies just after the budget elapses; allow fixed protocol
// latency on top before declaring the engine unresponsive.
const REPLY_GRACE: Duration = Duration::from_millis(500);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Engine process or protocol failure. Internal only: the move selector
/// logs these and falls back to the heuristic.
#[derive(Debug, Clone, Display, Error)]
#[display("Engine error: {}", message)]
pub struct EngineError {
    /// What went wrong.
    pub message: String,
}

impl EngineError {
    /// Creates a new engine error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("engine I/O failed: {err}"))
    }
}

/// A spawned UCI engine with piped stdio.
#[derive(Debug)]
pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
}

impl UciEngine {
    /// Spawns the engine process and completes the UCI handshake.
    #[instrument]
    pub async fn spawn(command: &str) -> Result<Self, EngineError> {
        let mut child = Command::new(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::new(format!("failed to spawn '{command}': {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::new("failed to capture engine stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::new("failed to capture engine stdout"))?;

        let mut engine = Self {
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
        };
        engine.send("uci").await?;
        engine.wait_for("uciok", HANDSHAKE_TIMEOUT).await?;
        engine.send("ucinewgame").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok", HANDSHAKE_TIMEOUT).await?;

        info!(%command, "engine handshake complete");
        Ok(engine)
    }

    /// Asks the engine for its best move in the given position, waiting at
    /// most the budget plus a fixed reply grace.
    ///
    /// Returns `Ok(None)` when the engine has no move to offer
    /// (`bestmove (none)`).
    #[instrument(skip(self, fen), fields(budget_ms = budget.as_millis() as u64))]
    pub async fn best_move(
        &mut self,
        fen: &str,
        budget: Duration,
    ) -> Result<Option<String>, EngineError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go movetime {}", budget.as_millis()))
            .await?;

        let read = async {
            loop {
                match self.lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(best) = parse_bestmove(&line) {
                            return Ok(best);
                        }
                    }
                    Ok(None) => return Err(EngineError::new("engine closed its output stream")),
                    Err(error) => {
                        return Err(EngineError::new(format!("engine read failed: {error}")));
                    }
                }
            }
        };
        timeout(budget + REPLY_GRACE, read)
            .await
            .map_err(|_| EngineError::new("engine did not reply within its time budget"))?
    }

    /// Asks the engine to quit. Failures are ignored; `kill_on_drop` reaps
    /// the process if it does not exit in time.
    pub async fn shutdown(mut self) {
        let _ = self.send("quit").await;
        let _ = timeout(SHUTDOWN_TIMEOUT, self.child.wait()).await;
    }

    async fn send(&mut self, command: &str) -> Result<(), EngineError> {
        debug!(%command, "-> engine");
        self.stdin.write_all(command.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn wait_for(&mut self, expected: &str, limit: Duration) -> Result<(), EngineError> {
        let read = async {
            loop {
                match self.lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim() == expected {
                            return Ok(());
                        }
                    }
                    Ok(None) => return Err(EngineError::new("engine closed its output stream")),
                    Err(error) => {
                        return Err(EngineError::new(format!("engine read failed: {error}")));
                    }
                }
            }
        };
        timeout(limit, read)
            .await
            .map_err(|_| EngineError::new(format!("timed out waiting for '{expected}'")))?
    }
}

/// Extracts the move from a `bestmove` reply line; non-`bestmove` lines
/// (`info`, `id`, ...) yield `None`, and `bestmove (none)` yields
/// `Some(None)`.
fn parse_bestmove(line: &str) -> Option<Option<String>> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("bestmove") => match parts.next() {
            Some("(none)") | None => Some(None),
            Some(notation) => Some(Some(notation.to_string())),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bestmove_with_ponder() {
        assert_eq!(
            parse_bestmove("bestmove e2e4 ponder e7e5"),
            Some(Some("e2e4".to_string()))
        );
    }

    #[test]
    fn test_parse_bestmove_none() {
        assert_eq!(parse_bestmove("bestmove (none)"), Some(None));
    }

    #[test]
    fn test_parse_skips_info_lines() {
        assert_eq!(parse_bestmove("info depth 20 score cp 31"), None);
        assert_eq!(parse_bestmove("id name Stockfish"), None);
        assert_eq!(parse_bestmove(""), None);
    }
}
