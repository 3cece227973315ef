//! Error types for the shuffle service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

use crate::types::PlayerId;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific shuffle scenarios
#[derive(Debug, thiserror::Error)]
pub enum ShuffleError {
    #[error("Too few players to shuffle: {count} requested, at least 2 required")]
    TooFewPlayers { count: usize },

    #[error("Odd roster size {count}: teams must be equal, supply an even number of players")]
    OddRoster { count: usize },

    #[error("Roster too large: {count} players requested, at most {max} supported")]
    RosterTooLarge { count: usize, max: usize },

    #[error("Ratings mismatch: {players} players but {ratings} ratings")]
    RatingsMismatch { players: usize, ratings: usize },

    #[error("Duplicate player in roster: {player_id}")]
    DuplicatePlayer { player_id: PlayerId },

    #[error("Round history unavailable: {message}")]
    HistoryUnavailable { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}
