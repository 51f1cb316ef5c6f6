use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::calculate;
use crate::models::{Deck, DeckId, PlayStats, Player};
use crate::repository::DeckInput;

use super::games::GameView;
use super::stats::configured_filter;

/// A deck with its owner's name.
#[derive(Debug, Serialize)]
pub struct DeckSummary {
    #[serde(flatten)]
    pub deck: Deck,
    pub owner_name: String,
}

#[derive(Debug, Serialize)]
pub struct DecksResponse {
    pub decks: Vec<DeckSummary>,
}

#[derive(Debug, Serialize)]
pub struct DeckDetailResponse {
    pub deck: Deck,
    pub owner: Option<Player>,
    /// Stats under the default filter, null if too few games
    pub stats: Option<PlayStats>,
    pub games: Vec<GameView>,
}

pub async fn list_decks(State(state): State<AppState>) -> Json<DecksResponse> {
    let repo = state.repository.read().await;
    let mut decks: Vec<DeckSummary> = repo
        .decks()
        .iter()
        .map(|d| DeckSummary {
            deck: d.clone(),
            owner_name: repo
                .player(d.owner)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
        })
        .collect();
    decks.sort_by(|a, b| a.deck.name.to_lowercase().cmp(&b.deck.name.to_lowercase()));
    Json(DecksResponse { decks })
}

pub async fn get_deck(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<DeckDetailResponse>, ApiError> {
    let id = DeckId(id);
    let repo = state.repository.read().await;
    let deck = repo
        .deck(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Deck {}", id)))?;

    let stats = calculate(repo.games(), &configured_filter(repo.games(), &state.stats));
    let games = repo
        .deck_games(id)
        .into_iter()
        .map(|g| GameView::new(g, &repo))
        .collect();

    Ok(Json(DeckDetailResponse {
        owner: repo.player(deck.owner).cloned(),
        stats: stats.deck(id).cloned(),
        deck,
        games,
    }))
}

pub async fn create_deck(
    State(state): State<AppState>,
    Json(input): Json<DeckInput>,
) -> Result<(StatusCode, Json<Deck>), ApiError> {
    let deck = state.repository.write().await.create_deck(input)?;
    Ok((StatusCode::CREATED, Json(deck)))
}

pub async fn update_deck(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(input): Json<DeckInput>,
) -> Result<Json<Deck>, ApiError> {
    let deck = state.repository.write().await.update_deck(DeckId(id), input)?;
    Ok(Json(deck))
}

pub async fn delete_deck(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Deck>, ApiError> {
    let deck = state.repository.write().await.delete_deck(DeckId(id))?;
    Ok(Json(deck))
}
