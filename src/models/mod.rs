//! Core data models: players, decks, games, filters and derived stats.

mod deck;
mod filter;
mod game;
mod ids;
mod player;
mod stats;

pub use deck::*;
pub use filter::*;
pub use game::*;
pub use ids::*;
pub use player::*;
pub use stats::*;
