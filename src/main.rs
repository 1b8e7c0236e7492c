//! Chess server - CLI entry point.

mod cli;

use anyhow::Result;
use chess_server::{AppState, GameSession, UciEngine};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            engine,
            no_engine,
        } => run_server(port, host, engine, no_engine).await,
    }
}

/// Run the HTTP API server
async fn run_server(
    port: Option<u16>,
    host: String,
    engine_command: String,
    no_engine: bool,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(5000);

    let engine = if no_engine {
        info!("engine acquisition disabled, automated moves use the heuristic");
        None
    } else {
        // Best-effort: a missing or broken engine is not fatal
        match UciEngine::spawn(&engine_command).await {
            Ok(engine) => {
                info!(command = %engine_command, "strong-play engine ready");
                Some(engine)
            }
            Err(error) => {
                warn!(
                    command = %engine_command,
                    %error,
                    "engine unavailable, automated moves use the heuristic"
                );
                None
            }
        }
    };

    let state = AppState::new(GameSession::new(), engine);
    chess_server::serve(state, &host, port).await
}
