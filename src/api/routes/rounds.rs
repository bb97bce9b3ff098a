use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::routes::tournaments::load;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::engine::LeaderboardRow;
use crate::models::Game;

#[derive(Debug, Serialize)]
pub struct RoundOut {
    pub round_idx: u32,
    pub matches: Vec<Game>,
}

#[derive(Debug, Deserialize)]
pub struct ScoresIn {
    pub scores: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoresOut {
    pub ok: bool,
    pub leaderboard: Vec<LeaderboardRow>,
}

pub async fn next_round(
    State(state): State<AppState>,
    Path(tid): Path<String>,
) -> Result<Json<RoundOut>, ApiError> {
    let _guard = state.write_lock.lock().await;
    let mut tournament = load(&state, &tid)?;
    let matches = tournament.next_round()?;
    state.store.save(&tournament)?;

    Ok(Json(RoundOut {
        round_idx: tournament.americano.round_idx(),
        matches,
    }))
}

pub async fn current_round(
    State(state): State<AppState>,
    Path(tid): Path<String>,
) -> Result<Json<RoundOut>, ApiError> {
    let tournament = load(&state, &tid)?;
    let (round_idx, games) = tournament.current_round();
    Ok(Json(RoundOut {
        round_idx,
        matches: games.to_vec(),
    }))
}

pub async fn post_scores(
    State(state): State<AppState>,
    Path((tid, round)): Path<(String, u32)>,
    Json(body): Json<ScoresIn>,
) -> Result<Json<ScoresOut>, ApiError> {
    let _guard = state.write_lock.lock().await;
    let mut tournament = load(&state, &tid)?;
    tournament.submit_scores(round, &body.scores)?;
    state.store.save(&tournament)?;

    Ok(Json(ScoresOut {
        ok: true,
        leaderboard: tournament.leaderboard(),
    }))
}
