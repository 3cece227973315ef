//! Skill Shuffle - team balancing service for NS2 rounds
//!
//! This crate rebuilds per-faction player skill from round history and splits
//! a roster into two teams with matching skill distributions, preferring
//! splits that move players off a faction they keep repeating.

pub mod api;
pub mod balance;
pub mod config;
pub mod error;
pub mod history;
pub mod metrics;
pub mod service;
pub mod skill;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Result, ShuffleError};
pub use types::*;

// Re-export key components
pub use history::{HistoryStore, InMemoryHistoryStore, MySqlHistoryStore};
pub use service::ShuffleService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
