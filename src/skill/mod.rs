//! Per-faction skill adjustment from historical round outcomes
//!
//! This module turns a player's recent win rate in each faction into a skill
//! multiplier, and tracks how long each player has been held on one faction.

pub mod model;
pub mod repeat;

// Re-export commonly used types
pub use model::{FactionSkill, PlayerSkill, SkillModel, SkillSnapshot};
pub use repeat::RepeatScores;
