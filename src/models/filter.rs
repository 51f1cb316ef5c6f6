//! Game filter configuration for statistics.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Game;

/// Minimum placings a deck or player needs by default to appear in stats.
pub const DEFAULT_MIN_PLAYS: u32 = 3;

/// Selects which games and entities are statistically eligible.
///
/// Never persisted; derived from the game set with [`Filter::default_for`]
/// and then adjusted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Eligible participant counts (e.g. {2, 4} admits 2- and 4-player games)
    pub players: BTreeSet<u32>,

    /// Minimum placings for a deck to be included
    pub min_plays_per_deck: u32,

    /// Minimum placings for a player to be included
    pub min_plays_per_player: u32,

    /// Participant counts observed in the unfiltered data
    #[serde(default)]
    existing_player_counts: Vec<u32>,
}

impl Filter {
    /// Create a filter with no observed participant counts.
    pub fn new(
        players: impl IntoIterator<Item = u32>,
        min_plays_per_deck: u32,
        min_plays_per_player: u32,
    ) -> Self {
        Self {
            players: players.into_iter().collect(),
            min_plays_per_deck,
            min_plays_per_player,
            existing_player_counts: Vec::new(),
        }
    }

    /// Default filter for a game collection: admits every participant count
    /// found in the data, with both minimums at [`DEFAULT_MIN_PLAYS`].
    pub fn default_for(games: &[Game]) -> Self {
        let counts: BTreeSet<u32> = games.iter().map(|g| g.player_count() as u32).collect();

        Self {
            existing_player_counts: counts.iter().copied().collect(),
            players: counts,
            min_plays_per_deck: DEFAULT_MIN_PLAYS,
            min_plays_per_player: DEFAULT_MIN_PLAYS,
        }
    }

    /// Sorted distinct participant counts present in the full game set.
    pub fn existing_player_counts(&self) -> &[u32] {
        &self.existing_player_counts
    }

    pub fn with_players(mut self, players: impl IntoIterator<Item = u32>) -> Self {
        self.players = players.into_iter().collect();
        self
    }

    pub fn with_min_plays_per_deck(mut self, min: u32) -> Self {
        self.min_plays_per_deck = min;
        self
    }

    pub fn with_min_plays_per_player(mut self, min: u32) -> Self {
        self.min_plays_per_player = min;
        self
    }
}

/// Parse a comma-separated participant count list such as "2,4".
///
/// Blank entries are ignored; an entirely blank string yields an empty set.
pub fn parse_player_counts(s: &str) -> Result<BTreeSet<u32>, std::num::ParseIntError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u32>())
        .collect()
}
