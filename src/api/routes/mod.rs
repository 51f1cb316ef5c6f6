pub mod decks;
pub mod games;
pub mod players;
pub mod stats;
