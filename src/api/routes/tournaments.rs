use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::engine::LeaderboardRow;
use crate::models::{Player, Tournament};
use crate::storage::{TournamentStore, TournamentSummary};

#[derive(Debug, Deserialize)]
pub struct CreateTournamentIn {
    pub name: String,
    pub players: Vec<Player>,
    pub courts: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TournamentOut {
    pub id: String,
    pub name: String,
    pub players: Vec<Player>,
    pub courts: u32,
    pub round_idx: u32,
}

impl From<&Tournament> for TournamentOut {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            players: t.americano.players().to_vec(),
            courts: t.americano.courts(),
            round_idx: t.americano.round_idx(),
        }
    }
}

/// Load a tournament by the raw ID from the URL.
pub(crate) fn load(state: &AppState, raw_id: &str) -> Result<Tournament, ApiError> {
    let id = TournamentStore::parse_id(raw_id)?;
    Ok(state.store.load(&id)?)
}

pub async fn service_info() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": "padel-americano",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/tournaments (GET, POST)",
            "/tournaments/{tid} (GET)",
            "/tournaments/{tid}/rounds/next (POST)",
            "/tournaments/{tid}/rounds/{round}/scores (POST)",
            "/tournaments/{tid}/rounds/current (GET)",
            "/tournaments/{tid}/leaderboard (GET)",
        ],
    }))
}

pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<Vec<TournamentSummary>>, ApiError> {
    Ok(Json(state.store.list()?))
}

pub async fn create_tournament(
    State(state): State<AppState>,
    Json(body): Json<CreateTournamentIn>,
) -> Result<Json<TournamentOut>, ApiError> {
    let courts = body
        .courts
        .unwrap_or(state.config.tournament.default_courts);
    let tournament = Tournament::create(body.name, body.players, courts)?;

    let _guard = state.write_lock.lock().await;
    state.store.save(&tournament)?;
    Ok(Json(TournamentOut::from(&tournament)))
}

pub async fn get_tournament(
    State(state): State<AppState>,
    Path(tid): Path<String>,
) -> Result<Json<TournamentOut>, ApiError> {
    let tournament = load(&state, &tid)?;
    Ok(Json(TournamentOut::from(&tournament)))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(tid): Path<String>,
) -> Result<Json<Vec<LeaderboardRow>>, ApiError> {
    let tournament = load(&state, &tid)?;
    Ok(Json(tournament.leaderboard()))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{create, get_json, post_json, setup_test_state};
    use axum::http::StatusCode;

    const SIX: [&str; 6] = ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"];

    #[tokio::test]
    async fn test_service_info() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert!(json["endpoints"].as_array().unwrap().len() >= 6);
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let id = create(app.clone(), &SIX, 1).await;
        let (status, json) = get_json(app, &format!("/tournaments/{id}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], id.as_str());
        assert_eq!(json["name"], "Test");
        assert_eq!(json["players"].as_array().unwrap().len(), 6);
        assert_eq!(json["courts"], 1);
        assert_eq!(json["round_idx"], 0);
    }

    #[tokio::test]
    async fn test_create_uses_default_courts() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let body = r#"{"name":"Default","players":["A","B","C","D"]}"#;
        let (status, json) = post_json(app, "/tournaments", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["courts"], 1);
    }

    #[tokio::test]
    async fn test_create_too_few_players() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let body = r#"{"name":"Tiny","players":["A","B","C"],"courts":1}"#;
        let (status, json) = post_json(app, "/tournaments", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_create_zero_courts() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let body = r#"{"name":"None","players":["A","B","C","D"],"courts":0}"#;
        let (status, _) = post_json(app, "/tournaments", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_tournament() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app.clone(), "/tournaments/doesnotexist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");

        let (status, _) = get_json(app, "/tournaments/..%2Fetc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_tournaments() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app.clone(), "/tournaments").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 0);

        let id = create(app.clone(), &SIX, 1).await;
        let (_, json) = get_json(app, "/tournaments").await;
        assert_eq!(json[0]["id"], id.as_str());
        assert_eq!(json[0]["name"], "Test");
    }

    #[tokio::test]
    async fn test_leaderboard_fresh() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));
        let id = create(app.clone(), &SIX, 1).await;

        let (status, json) = get_json(app, &format!("/tournaments/{id}/leaderboard")).await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["player"], "Alice");
        assert_eq!(rows[0]["points"], 0);
        assert_eq!(rows[0]["matches"], 0);
        assert_eq!(rows[0]["gf"], 0);
        assert_eq!(rows[0]["ga"], 0);
    }
}
