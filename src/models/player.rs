//! Player model.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A person who plays games and owns decks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self { id, name }
    }
}
