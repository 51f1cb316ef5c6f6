//! # Commander Stats
//!
//! Tracks Commander play sessions for a playgroup and derives deck and
//! player statistics from the recorded games.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, decks, games, filters, stats)
//! - **calculate**: Statistics engine (filtering, placings, win rates)
//! - **storage**: JSONL files under the data directory
//! - **repository**: CRUD over the stored collections
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod repository;
pub mod storage;

pub use models::*;
