use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{DeckId, Game, GameId, PlayerId};
use crate::repository::{GameInput, Repository};

#[derive(Debug, Serialize)]
pub struct PlayView {
    pub place: u32,
    pub player_id: PlayerId,
    pub player_name: String,
    pub deck_id: DeckId,
    pub deck_name: String,
}

/// A game with player and deck names resolved.
#[derive(Debug, Serialize)]
pub struct GameView {
    pub id: GameId,
    pub when: DateTime<Utc>,
    pub duration: Option<u32>,
    pub comment: String,
    pub player_count: usize,
    /// Name of the player who finished first
    pub winner: Option<String>,
    pub plays: Vec<PlayView>,
}

impl GameView {
    pub fn new(game: &Game, repo: &Repository) -> Self {
        let plays = game
            .plays
            .iter()
            .map(|p| PlayView {
                place: p.place,
                player_id: p.player,
                player_name: repo
                    .player(p.player)
                    .map(|pl| pl.name.clone())
                    .unwrap_or_default(),
                deck_id: p.deck,
                deck_name: repo
                    .deck(p.deck)
                    .map(|d| d.name.clone())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            id: game.id,
            when: game.when,
            duration: game.duration,
            comment: game.comment.clone(),
            player_count: game.player_count(),
            winner: game
                .winner()
                .and_then(|w| repo.player(w.player))
                .map(|p| p.name.clone()),
            plays,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<GameView>,
}

pub async fn list_games(State(state): State<AppState>) -> Json<GamesResponse> {
    let repo = state.repository.read().await;
    let games = repo.games().iter().map(|g| GameView::new(g, &repo)).collect();
    Json(GamesResponse { games })
}

pub async fn record_game(
    State(state): State<AppState>,
    Json(input): Json<GameInput>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let mut repo = state.repository.write().await;
    let game = repo.record_game(input)?;
    Ok((StatusCode::CREATED, Json(GameView::new(&game, &repo))))
}

pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(input): Json<GameInput>,
) -> Result<Json<GameView>, ApiError> {
    let mut repo = state.repository.write().await;
    let game = repo.update_game(GameId(id), input)?;
    Ok(Json(GameView::new(&game, &repo)))
}

pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<GameView>, ApiError> {
    let mut repo = state.repository.write().await;
    let game = repo.delete_game(GameId(id))?;
    Ok(Json(GameView::new(&game, &repo)))
}
