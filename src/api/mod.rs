//! REST API endpoints.
//!
//! Axum-based HTTP API for creating tournaments, scheduling rounds,
//! submitting scores and reading the leaderboard.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};

use crate::engine::EngineError;
use crate::models::SubmitError;
use crate::storage::StorageError;

use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if let ApiError::Internal(msg) = &self {
            error!("Internal API error: {}", msg);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            // An ID that can't be a file name can't name a tournament either.
            StorageError::NotFound(_) | StorageError::InvalidPath(_) => {
                ApiError::NotFound("Tournament not found".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidConfiguration(_)
            | EngineError::ArityMismatch { .. }
            | EngineError::InvalidScoreFormat(_)
            | EngineError::ScoreOverflow(_) => ApiError::BadRequest(e.to_string()),
            EngineError::RoundNotFound(_) => ApiError::NotFound(e.to_string()),
            EngineError::InsufficientCapacity => ApiError::Conflict(e.to_string()),
            EngineError::MalformedState(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::NotCurrentRound { .. } | SubmitError::AlreadyScored(_) => {
                ApiError::Conflict(e.to_string())
            }
            SubmitError::Engine(inner) => inner.into(),
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Ignoring invalid CORS origin {:?}", origin);
            layer
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/", get(routes::tournaments::service_info))
        .route(
            "/tournaments",
            get(routes::tournaments::list_tournaments).post(routes::tournaments::create_tournament),
        )
        .route("/tournaments/:tid", get(routes::tournaments::get_tournament))
        .route(
            "/tournaments/:tid/leaderboard",
            get(routes::tournaments::get_leaderboard),
        )
        .route("/tournaments/:tid/rounds/next", post(routes::rounds::next_round))
        .route(
            "/tournaments/:tid/rounds/current",
            get(routes::rounds::current_round),
        )
        .route(
            "/tournaments/:tid/rounds/:round/scores",
            post(routes::rounds::post_scores),
        )
        .layer(cors)
        .with_state(state)
}
