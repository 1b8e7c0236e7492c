//! HTTP transport for the game session.
//!
//! Thin glue only: request validation happens here, everything else is
//! delegated to the session, the selector, and the engine handle. Every
//! response uses the `{success, data, error}` envelope.

use crate::ai::{self, Difficulty};
use crate::engine::UciEngine;
use crate::game::GameSession;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// The session and the optional engine handle, guarded as a unit so each
/// request runs to completion before the next can mutate anything.
#[derive(Debug)]
pub struct ChessApp {
    /// The single game session.
    pub session: GameSession,
    /// Strong-play engine, present when acquisition succeeded at startup.
    pub engine: Option<UciEngine>,
}

/// Shared handle passed to every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<Mutex<ChessApp>>,
}

impl AppState {
    /// Creates the application state around a session and an optional
    /// engine handle.
    pub fn new(session: GameSession, engine: Option<UciEngine>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ChessApp { session, engine })),
        }
    }

    /// Releases the engine process, ignoring failures.
    pub async fn release_engine(&self) {
        if let Some(engine) = self.inner.lock().await.engine.take() {
            engine.shutdown().await;
        }
    }
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/board", get(get_board))
        .route("/api/move", post(make_move))
        .route("/api/ai-move", post(ai_move))
        .route("/api/reset", post(reset_game))
        .route("/api/suggestions", get(get_suggestions))
        .route("/api/analysis", get(get_analysis))
        .route("/api/health", get(health))
        .fallback(not_found)
        .with_state(state)
}

/// Binds a listener and serves the API until shutdown, then releases the
/// engine.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(host, port, "chess server listening");

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.release_engine().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
    }
}

fn success(data: serde_json::Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn failure(
    status: StatusCode,
    error: impl Into<String>,
    data: Option<serde_json::Value>,
) -> Response {
    let mut body = json!({ "success": false, "error": error.into() });
    if let Some(data) = data {
        body["data"] = data;
    }
    (status, Json(body)).into_response()
}

async fn index() -> Response {
    success(json!({
        "message": "Chess session server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /api/board": "Current board snapshot",
            "POST /api/move": "Apply a move in UCI notation",
            "POST /api/ai-move": "Select and apply an automated move",
            "POST /api/reset": "Reset to the starting position",
            "GET /api/suggestions": "Ranked move suggestions",
            "GET /api/analysis": "Game statistics",
        },
    }))
}

#[instrument(skip(state))]
async fn get_board(State(state): State<AppState>) -> Response {
    let app = state.inner.lock().await;
    success(json!(app.session.snapshot()))
}

#[derive(Debug, Deserialize)]
struct MoveRequest {
    #[serde(rename = "move")]
    notation: Option<String>,
}

#[instrument(skip(state, body))]
async fn make_move(State(state): State<AppState>, body: Bytes) -> Response {
    let notation = serde_json::from_slice::<MoveRequest>(&body)
        .ok()
        .and_then(|request| request.notation);
    let Some(notation) = notation else {
        debug!("move request without a move parameter");
        return failure(StatusCode::BAD_REQUEST, "Move parameter is required", None);
    };

    let mut app = state.inner.lock().await;
    match app.session.apply_move(&notation) {
        Ok(applied) => success(json!({
            "board_state": applied.snapshot,
            "move": applied.notation,
        })),
        Err(error) => {
            warn!(%notation, %error, "move rejected");
            failure(
                StatusCode::BAD_REQUEST,
                error.to_string(),
                Some(json!(app.session.snapshot())),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct AiMoveRequest {
    difficulty: Option<String>,
}

#[instrument(skip(state, body))]
async fn ai_move(State(state): State<AppState>, body: Bytes) -> Response {
    let requested = serde_json::from_slice::<AiMoveRequest>(&body)
        .ok()
        .and_then(|request| request.difficulty);
    let difficulty = match requested {
        None => Difficulty::default(),
        Some(raw) => match raw.parse::<Difficulty>() {
            Ok(tier) => tier,
            Err(_) => {
                debug!(%raw, "unrecognized difficulty");
                return failure(
                    StatusCode::BAD_REQUEST,
                    format!(
                        "Invalid difficulty '{raw}'. Must be one of: easy, medium, hard, expert"
                    ),
                    None,
                );
            }
        },
    };

    let mut app = state.inner.lock().await;
    let ChessApp { session, engine } = &mut *app;
    match ai::select_move(session, engine.as_mut(), difficulty).await {
        Ok(applied) => success(json!({
            "board_state": applied.snapshot,
            "move": applied.notation,
        })),
        Err(error) => {
            warn!(?difficulty, %error, "automated move failed");
            failure(
                StatusCode::BAD_REQUEST,
                error.to_string(),
                Some(json!(session.snapshot())),
            )
        }
    }
}

#[instrument(skip(state))]
async fn reset_game(State(state): State<AppState>) -> Response {
    let mut app = state.inner.lock().await;
    success(json!(app.session.reset()))
}

#[instrument(skip(state, params))]
async fn get_suggestions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let limit = params
        .get("limit")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_SUGGESTION_LIMIT);
    let app = state.inner.lock().await;
    let moves = ai::suggestions(&app.session, limit);
    success(json!({
        "count": moves.len(),
        "suggestions": moves,
    }))
}

#[instrument(skip(state))]
async fn get_analysis(State(state): State<AppState>) -> Response {
    let app = state.inner.lock().await;
    success(json!(app.session.analysis()))
}

async fn health() -> Response {
    Json(json!({ "status": "healthy", "service": "chess-server" })).into_response()
}

async fn not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "Endpoint not found", None)
}
