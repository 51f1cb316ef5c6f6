use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::calculate;
use crate::models::{PlayStats, Player, PlayerId};

use super::games::GameView;
use super::stats::configured_filter;

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<Player>,
}

#[derive(Debug, Deserialize)]
pub struct NewPlayer {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerDetailResponse {
    pub player: Player,
    /// Stats under the default filter, null if too few games
    pub stats: Option<PlayStats>,
    pub games: Vec<GameView>,
}

pub async fn list_players(State(state): State<AppState>) -> Json<PlayersResponse> {
    let repo = state.repository.read().await;
    let mut players = repo.players().to_vec();
    players.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Json(PlayersResponse { players })
}

pub async fn create_player(
    State(state): State<AppState>,
    Json(body): Json<NewPlayer>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let player = state.repository.write().await.create_player(&body.name)?;
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<PlayerDetailResponse>, ApiError> {
    let id = PlayerId(id);
    let repo = state.repository.read().await;
    let player = repo
        .player(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Player {}", id)))?;

    let stats = calculate(repo.games(), &configured_filter(repo.games(), &state.stats));
    let games = repo
        .player_games(id)
        .into_iter()
        .map(|g| GameView::new(g, &repo))
        .collect();

    Ok(Json(PlayerDetailResponse {
        stats: stats.player(id).cloned(),
        player,
        games,
    }))
}

pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Player>, ApiError> {
    let player = state.repository.write().await.delete_player(PlayerId(id))?;
    Ok(Json(player))
}
