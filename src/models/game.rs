//! Recorded games and the per-participant plays inside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DeckId, GameId, PlayerId};

/// Violations of the place invariant of a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("game {0} has no plays")]
    NoPlays(GameId),

    #[error("game {game} has place {place} outside 1..={players}")]
    PlaceOutOfRange {
        game: GameId,
        place: u32,
        players: usize,
    },

    #[error("game {game} has place {place} more than once")]
    DuplicatePlace { game: GameId, place: u32 },
}

/// One participant's result within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    /// Who played
    pub player: PlayerId,

    /// Which deck they played
    pub deck: DeckId,

    /// Finishing position (1 = winner)
    pub place: u32,
}

impl Play {
    pub fn new(player: PlayerId, deck: DeckId, place: u32) -> Self {
        Self {
            player,
            deck,
            place,
        }
    }
}

/// A recorded play session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Unique identifier
    pub id: GameId,

    /// When the game was played
    pub when: DateTime<Utc>,

    /// Duration in minutes, if recorded
    #[serde(default)]
    pub duration: Option<u32>,

    /// Free-form comment
    #[serde(default)]
    pub comment: String,

    /// Plays ordered by place
    pub plays: Vec<Play>,
}

impl Game {
    /// Create a game with no duration or comment.
    pub fn new(id: GameId, when: DateTime<Utc>, plays: Vec<Play>) -> Self {
        Self {
            id,
            when,
            duration: None,
            comment: String::new(),
            plays,
        }
    }

    /// Number of participants.
    pub fn player_count(&self) -> usize {
        self.plays.len()
    }

    /// The winning play, if any.
    pub fn winner(&self) -> Option<&Play> {
        self.plays.iter().find(|p| p.place == 1)
    }

    pub fn involves_player(&self, player: PlayerId) -> bool {
        self.plays.iter().any(|p| p.player == player)
    }

    pub fn involves_deck(&self, deck: DeckId) -> bool {
        self.plays.iter().any(|p| p.deck == deck)
    }

    /// Order plays by place ascending.
    pub fn sort_plays(&mut self) {
        self.plays.sort_by_key(|p| p.place);
    }

    /// Check that places are distinct and cover exactly `1..=plays.len()`.
    pub fn validate_places(&self) -> Result<(), ModelError> {
        let players = self.plays.len();
        if players == 0 {
            return Err(ModelError::NoPlays(self.id));
        }

        let mut seen = vec![false; players];
        for play in &self.plays {
            let index = play.place as usize;
            if index == 0 || index > players {
                return Err(ModelError::PlaceOutOfRange {
                    game: self.id,
                    place: play.place,
                    players,
                });
            }
            if std::mem::replace(&mut seen[index - 1], true) {
                return Err(ModelError::DuplicatePlace {
                    game: self.id,
                    place: play.place,
                });
            }
        }

        Ok(())
    }
}
