//! HTTP layer: translates engine and record-store operations into JSON
//! endpoints for the browser frontend.

use crate::records::{BestRecord, RecordStore};
use crate::session::{EngineError, GameEngine, SessionId};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, instrument};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The in-progress game table.
    pub engine: GameEngine,
    /// The durable best-record store.
    pub records: Arc<RecordStore>,
}

/// Request body for submitting a guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRequest {
    /// Session to guess against.
    pub game_id: SessionId,
    /// The guessed 4-digit code.
    pub guess: String,
}

/// Request body for reporting a finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRequest {
    /// How many guesses the game took.
    pub attempts: u32,
    /// How long the game took, in seconds.
    pub time: f64,
}

/// Response body for a new game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGameResponse {
    /// Identifier for the created session.
    pub game_id: SessionId,
}

/// The A/B counts for one guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbCount {
    /// Exact-position matches.
    #[serde(rename = "A")]
    pub a: u8,
    /// Right-digit wrong-position matches.
    #[serde(rename = "B")]
    pub b: u8,
}

/// Response body for an evaluated guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessResponse {
    /// The A/B score for this guess.
    pub result: AbCount,
    /// Whether the guess matched the secret exactly.
    pub is_correct: bool,
    /// Guesses evaluated so far in this session.
    pub attempts: u32,
}

/// Response body for a record submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// Whether the submission improved any best.
    pub updated: bool,
}

/// Errors a handler can surface to the client.
#[derive(Debug)]
enum ApiError {
    /// Unknown session id.
    NotFound(String),
    /// Malformed guess.
    Validation(String),
    /// Anything unexpected.
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound => Self::NotFound(err.to_string()),
            EngineError::InvalidGuess(_) => Self::Validation(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!(error = %err, "Internal error in handler");
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            Self::Validation(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Builds the application router over the given state.
///
/// CORS is wide open; the frontend is served separately during
/// development.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/game/new", post(new_game))
        .route("/api/game/guess", post(guess))
        .route("/api/records", get(get_records).post(save_record))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

#[instrument(skip(state))]
async fn new_game(State(state): State<AppState>) -> Json<NewGameResponse> {
    let game_id = state.engine.new_game();
    Json(NewGameResponse { game_id })
}

#[instrument(skip(state, req), fields(game_id = %req.game_id))]
async fn guess(
    State(state): State<AppState>,
    Json(req): Json<GuessRequest>,
) -> Result<Json<GuessResponse>, ApiError> {
    let score = state.engine.check_guess(&req.game_id, &req.guess)?;
    let attempts = state.engine.attempts(&req.game_id)?;

    // A won game is finished; drop its session.
    if score.is_win() {
        state.engine.remove_game(&req.game_id);
    }

    Ok(Json(GuessResponse {
        result: AbCount {
            a: score.a,
            b: score.b,
        },
        is_correct: score.is_win(),
        attempts,
    }))
}

#[instrument(skip(state))]
async fn get_records(State(state): State<AppState>) -> Json<BestRecord> {
    Json(state.records.get())
}

#[instrument(skip(state, req))]
async fn save_record(
    State(state): State<AppState>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let updated = state.records.update(req.attempts, req.time)?;
    Ok(Json(UpdateResponse { updated }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
