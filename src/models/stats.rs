//! Derived statistics models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{DeckId, PlayerId};

/// Placing statistics for one deck or player.
///
/// Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayStats {
    /// Eligible placings
    pub games: u32,

    /// Placings equal to 1
    pub wins: u32,

    /// wins / games (0.0 to 1.0)
    pub win_rate: f64,

    /// Numerically smallest place
    pub placing_best: u32,

    /// Numerically largest place
    pub placing_worst: u32,

    /// Arithmetic mean of places
    pub placing_average: f64,

    /// Median of places
    pub placing_median: f64,

    /// Most frequent place, smallest on ties
    pub placing_mode: u32,
}

/// Statistics per deck and per player.
///
/// An entity missing from a map had too few eligible placings; that is
/// distinct from an entity that is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub decks: BTreeMap<DeckId, PlayStats>,
    pub players: BTreeMap<PlayerId, PlayStats>,
}

impl Stats {
    /// Stats for a deck, `None` if it had insufficient data.
    pub fn deck(&self, id: DeckId) -> Option<&PlayStats> {
        self.decks.get(&id)
    }

    /// Stats for a player, `None` if they had insufficient data.
    pub fn player(&self, id: PlayerId) -> Option<&PlayStats> {
        self.players.get(&id)
    }
}
