use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{calculate, filter_games};
use crate::config::StatsConfig;
use crate::models::{parse_player_counts, DeckId, Filter, Game, PlayStats, PlayerId};

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    /// Comma-separated participant counts, e.g. "2,4"
    pub players: Option<String>,
    pub min_plays_per_deck: Option<u32>,
    pub min_plays_per_player: Option<u32>,
}

/// One deck or player joined with its stats.
///
/// `stats` is null when the entity had too few eligible placings.
#[derive(Debug, Serialize)]
pub struct StatsRow<Id> {
    pub id: Id,
    pub name: String,
    pub stats: Option<PlayStats>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub filter: Filter,
    pub total_games: u32,
    pub eligible_games: u32,
    pub decks: Vec<StatsRow<DeckId>>,
    pub players: Vec<StatsRow<PlayerId>>,
}

/// Default filter for `games` with the configured minimums.
pub fn configured_filter(games: &[Game], config: &StatsConfig) -> Filter {
    Filter::default_for(games)
        .with_min_plays_per_deck(config.min_plays_per_deck)
        .with_min_plays_per_player(config.min_plays_per_player)
}

/// Apply request parameters on top of the configured default filter.
pub fn resolve_filter(
    games: &[Game],
    config: &StatsConfig,
    params: &StatsParams,
) -> Result<Filter, ApiError> {
    let mut filter = configured_filter(games, config);

    if let Some(raw) = params.players.as_deref() {
        let players = parse_player_counts(raw)
            .map_err(|e| ApiError::BadRequest(format!("Invalid players list {:?}: {}", raw, e)))?;
        filter = filter.with_players(players);
    }
    if let Some(min) = params.min_plays_per_deck {
        filter = filter.with_min_plays_per_deck(min);
    }
    if let Some(min) = params.min_plays_per_player {
        filter = filter.with_min_plays_per_player(min);
    }

    Ok(filter)
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsResponse>, ApiError> {
    let repo = state.repository.read().await;
    let games = repo.games();

    let filter = resolve_filter(games, &state.stats, &params)?;
    let stats = calculate(games, &filter);
    debug!(
        "Stats for {} decks and {} players",
        stats.decks.len(),
        stats.players.len()
    );

    let mut decks: Vec<StatsRow<DeckId>> = repo
        .decks()
        .iter()
        .map(|d| StatsRow {
            id: d.id,
            name: d.name.clone(),
            stats: stats.deck(d.id).cloned(),
        })
        .collect();
    decks.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let mut players: Vec<StatsRow<PlayerId>> = repo
        .players()
        .iter()
        .map(|p| StatsRow {
            id: p.id,
            name: p.name.clone(),
            stats: stats.player(p.id).cloned(),
        })
        .collect();
    players.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    Ok(Json(StatsResponse {
        total_games: games.len() as u32,
        eligible_games: filter_games(games, &filter).len() as u32,
        filter,
        decks,
        players,
    }))
}
