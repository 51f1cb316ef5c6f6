//! Deck model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeckId, PlayerId};

/// A commander deck owned by one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Unique identifier
    pub id: DeckId,

    /// Display name (falls back to the commander)
    pub name: String,

    /// Commander card name
    pub commander: String,

    #[serde(default)]
    pub description: String,

    /// Owning player
    pub owner: PlayerId,

    /// Power bracket (1-5)
    #[serde(default)]
    pub bracket: u8,

    /// Color identity in mana symbol notation, e.g. "{W}{U}{B}"
    #[serde(default)]
    pub colors: String,

    /// Link to an external deck list
    #[serde(default)]
    pub url: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    /// Create a new deck; the name falls back to the commander when blank.
    pub fn new(id: DeckId, name: &str, commander: &str, owner: PlayerId) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: display_name(name, commander),
            commander: commander.trim().to_string(),
            description: String::new(),
            owner,
            bracket: 0,
            colors: String::new(),
            url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trimmed deck name, or the trimmed commander name if the name is blank.
pub fn display_name(name: &str, commander: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        commander.trim().to_string()
    } else {
        name.to_string()
    }
}
