//! Command-line interface for the chess server.

use clap::{Parser, Subcommand};

/// Chess server - single-session chess API with UCI engine support
#[derive(Parser, Debug)]
#[command(name = "chess_server")]
#[command(about = "Single-session chess game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API server
    Serve {
        /// Port to bind to (falls back to the PORT environment variable,
        /// then 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// UCI engine command used for automated moves
        #[arg(long, default_value = "stockfish")]
        engine: String,

        /// Skip engine acquisition and always use the heuristic fallback
        #[arg(long)]
        no_engine: bool,
    },
}
