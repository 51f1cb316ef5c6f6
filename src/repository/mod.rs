//! In-memory collections of players, decks and games backed by JSONL files.
//!
//! Every mutation validates references, rewrites the affected file and then
//! updates the in-memory collection. Callers share a repository behind a lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{display_name, Deck, DeckId, Game, GameId, ModelError, Play, Player, PlayerId};
use crate::storage::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};

/// Repository errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ModelError> for RepositoryError {
    fn from(e: ModelError) -> Self {
        RepositoryError::Invalid(e.to_string())
    }
}

/// Deck fields supplied when creating or editing a deck.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckInput {
    #[serde(default)]
    pub name: String,
    pub commander: String,
    #[serde(default)]
    pub description: String,
    pub owner: PlayerId,
    #[serde(default)]
    pub bracket: u8,
    #[serde(default)]
    pub colors: String,
    #[serde(default)]
    pub url: String,
}

/// One participant seat: who played which deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player: PlayerId,
    pub deck: DeckId,
}

/// Game fields supplied when recording or editing a game.
///
/// Seats are listed in finishing order: the first seat won.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInput {
    pub when: DateTime<Utc>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub comment: String,
    pub seats: Vec<Seat>,
}

impl GameInput {
    fn plays(&self) -> Vec<Play> {
        self.seats
            .iter()
            .enumerate()
            .map(|(i, seat)| Play::new(seat.player, seat.deck, i as u32 + 1))
            .collect()
    }

    fn into_game(self, id: GameId) -> Result<Game, ModelError> {
        let mut game = Game::new(id, self.when, self.plays());
        game.duration = self.duration;
        game.comment = self.comment.trim().to_string();
        game.validate_places()?;
        Ok(game)
    }
}

/// Loaded players, decks and games.
#[derive(Debug)]
pub struct Repository {
    storage: StorageConfig,
    players: Vec<Player>,
    decks: Vec<Deck>,
    games: Vec<Game>,
}

impl Repository {
    /// Load all collections from storage. Missing files are empty collections.
    pub fn load(storage: StorageConfig) -> Result<Self, RepositoryError> {
        let players = JsonlReader::<Player>::for_entity(&storage, EntityType::Player).read_all()?;
        let decks = JsonlReader::<Deck>::for_entity(&storage, EntityType::Deck).read_all()?;
        let games = JsonlReader::<Game>::for_entity(&storage, EntityType::Game).read_all()?;

        let repo = Self {
            storage,
            players,
            decks,
            games: ordered(games),
        };

        info!(
            "Loaded {} players, {} decks, {} games from {:?}",
            repo.players.len(),
            repo.decks.len(),
            repo.games.len(),
            repo.storage.data_dir
        );
        Ok(repo)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    /// Games, most recent first, plays ordered by place.
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn deck(&self, id: DeckId) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == id)
    }

    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Games a player took part in, most recent first.
    pub fn player_games(&self, id: PlayerId) -> Vec<&Game> {
        self.games.iter().filter(|g| g.involves_player(id)).collect()
    }

    /// Games a deck was played in, most recent first.
    pub fn deck_games(&self, id: DeckId) -> Vec<&Game> {
        self.games.iter().filter(|g| g.involves_deck(id)).collect()
    }

    // ── Players ──────────────────────────────────────────────────

    pub fn create_player(&mut self, name: &str) -> Result<Player, RepositoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::Invalid(
                "Player name must not be empty".to_string(),
            ));
        }

        let id = next_id(PlayerId::after(self.players.iter().map(|p| p.id)), "player")?;
        let player = Player::new(id, name.to_string());

        let mut players = self.players.clone();
        players.push(player.clone());
        self.commit_players(players)?;

        info!("Created player {} ({})", player.name, player.id);
        Ok(player)
    }

    pub fn delete_player(&mut self, id: PlayerId) -> Result<Player, RepositoryError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Player {}", id)))?;

        if self.decks.iter().any(|d| d.owner == id) {
            return Err(RepositoryError::Conflict(
                "A player with decks can't be deleted, delete the player's decks first"
                    .to_string(),
            ));
        }
        if self.games.iter().any(|g| g.involves_player(id)) {
            return Err(RepositoryError::Conflict(
                "A player who played games can't be deleted. Delete those games first."
                    .to_string(),
            ));
        }

        let mut players = self.players.clone();
        let player = players.remove(index);
        self.commit_players(players)?;

        info!("Deleted player {} ({})", player.name, player.id);
        Ok(player)
    }

    // ── Decks ────────────────────────────────────────────────────

    pub fn create_deck(&mut self, input: DeckInput) -> Result<Deck, RepositoryError> {
        self.check_deck_input(&input)?;

        let id = next_id(DeckId::after(self.decks.iter().map(|d| d.id)), "deck")?;
        let mut deck = Deck::new(id, &input.name, &input.commander, input.owner);
        apply_deck_input(&mut deck, &input);

        let mut decks = self.decks.clone();
        decks.push(deck.clone());
        self.commit_decks(decks)?;

        info!("Created deck {} ({})", deck.name, deck.id);
        Ok(deck)
    }

    pub fn update_deck(&mut self, id: DeckId, input: DeckInput) -> Result<Deck, RepositoryError> {
        self.check_deck_input(&input)?;

        let mut decks = self.decks.clone();
        let deck = decks
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Deck {}", id)))?;

        deck.name = display_name(&input.name, &input.commander);
        deck.commander = input.commander.trim().to_string();
        deck.owner = input.owner;
        apply_deck_input(deck, &input);
        deck.updated_at = Utc::now();
        let deck = deck.clone();

        self.commit_decks(decks)?;

        info!("Updated deck {} ({})", deck.name, deck.id);
        Ok(deck)
    }

    pub fn delete_deck(&mut self, id: DeckId) -> Result<Deck, RepositoryError> {
        let index = self
            .decks
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Deck {}", id)))?;

        if self.games.iter().any(|g| g.involves_deck(id)) {
            return Err(RepositoryError::Conflict(
                "A deck that was played can't be deleted. Delete those games first.".to_string(),
            ));
        }

        let mut decks = self.decks.clone();
        let deck = decks.remove(index);
        self.commit_decks(decks)?;

        info!("Deleted deck {} ({})", deck.name, deck.id);
        Ok(deck)
    }

    fn check_deck_input(&self, input: &DeckInput) -> Result<(), RepositoryError> {
        if input.commander.trim().is_empty() {
            return Err(RepositoryError::Invalid(
                "Commander must not be empty".to_string(),
            ));
        }
        if self.player(input.owner).is_none() {
            return Err(RepositoryError::Invalid(format!(
                "Owner {} does not exist",
                input.owner
            )));
        }
        Ok(())
    }

    // ── Games ────────────────────────────────────────────────────

    pub fn record_game(&mut self, input: GameInput) -> Result<Game, RepositoryError> {
        self.check_game_input(&input)?;

        let id = next_id(GameId::after(self.games.iter().map(|g| g.id)), "game")?;
        let game = input.into_game(id)?;

        let mut games = self.games.clone();
        games.push(game.clone());
        self.commit_games(games)?;

        info!("Recorded game {} with {} players", game.id, game.player_count());
        Ok(game)
    }

    /// Replace a game's details and its whole set of plays; the id is kept.
    pub fn update_game(&mut self, id: GameId, input: GameInput) -> Result<Game, RepositoryError> {
        self.check_game_input(&input)?;
        let game = input.into_game(id)?;

        let mut games = self.games.clone();
        let slot = games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Game {}", id)))?;
        *slot = game.clone();
        self.commit_games(games)?;

        info!("Updated game {}", id);
        Ok(game)
    }

    pub fn delete_game(&mut self, id: GameId) -> Result<Game, RepositoryError> {
        let index = self
            .games
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Game {}", id)))?;

        let mut games = self.games.clone();
        let game = games.remove(index);
        self.commit_games(games)?;

        info!("Deleted game {}", id);
        Ok(game)
    }

    fn check_game_input(&self, input: &GameInput) -> Result<(), RepositoryError> {
        if input.seats.is_empty() {
            return Err(RepositoryError::Invalid(
                "A game needs at least one player".to_string(),
            ));
        }
        for seat in &input.seats {
            if self.player(seat.player).is_none() {
                return Err(RepositoryError::Invalid(format!(
                    "Player {} does not exist",
                    seat.player
                )));
            }
            if self.deck(seat.deck).is_none() {
                return Err(RepositoryError::Invalid(format!(
                    "Deck {} does not exist",
                    seat.deck
                )));
            }
        }
        Ok(())
    }

    // ── Persistence ──────────────────────────────────────────────
    //
    // Each commit writes the new collection first and only replaces the
    // in-memory copy once the file is on disk.

    fn commit_players(&mut self, players: Vec<Player>) -> Result<(), StorageError> {
        JsonlWriter::<Player>::for_entity(&self.storage, EntityType::Player).write_all(&players)?;
        self.players = players;
        Ok(())
    }

    fn commit_decks(&mut self, decks: Vec<Deck>) -> Result<(), StorageError> {
        JsonlWriter::<Deck>::for_entity(&self.storage, EntityType::Deck).write_all(&decks)?;
        self.decks = decks;
        Ok(())
    }

    fn commit_games(&mut self, games: Vec<Game>) -> Result<(), StorageError> {
        let games = ordered(games);
        JsonlWriter::<Game>::for_entity(&self.storage, EntityType::Game).write_all(&games)?;
        self.games = games;
        Ok(())
    }
}

/// Most recent first, plays ordered by place.
fn ordered(mut games: Vec<Game>) -> Vec<Game> {
    for game in &mut games {
        game.sort_plays();
    }
    games.sort_by(|a, b| b.when.cmp(&a.when).then_with(|| b.id.cmp(&a.id)));
    games
}

fn next_id<T>(id: Option<T>, kind: &str) -> Result<T, RepositoryError> {
    id.ok_or_else(|| RepositoryError::Invalid(format!("No {} ids left", kind)))
}

fn apply_deck_input(deck: &mut Deck, input: &DeckInput) {
    deck.description = input.description.trim().to_string();
    deck.bracket = input.bracket;
    deck.colors = input.colors.trim().to_string();
    deck.url = input.url.trim().to_string();
}
