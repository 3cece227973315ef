//! Skill model configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a player's repeat score is derived from their round history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RepeatPolicy {
    /// Length of the trailing run of rounds played in the faction of the
    /// player's most recent round
    TrailingStreak,
    /// Fraction of the last `rounds` rounds played in each faction
    RecentWindow { rounds: usize },
}

impl Default for RepeatPolicy {
    fn default() -> Self {
        RepeatPolicy::TrailingStreak
    }
}

impl FromStr for RepeatPolicy {
    type Err = String;

    /// Accepts `streak` or `window:<rounds>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.split_once(':') {
            None if s == "streak" || s == "trailing_streak" => Ok(RepeatPolicy::TrailingStreak),
            Some(("window", rounds)) | Some(("recent_window", rounds)) => rounds
                .parse()
                .map(|rounds| RepeatPolicy::RecentWindow { rounds })
                .map_err(|_| format!("Invalid repeat window size: {}", rounds)),
            _ => Err(format!("Unknown repeat policy: {}", s)),
        }
    }
}

impl std::fmt::Display for RepeatPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepeatPolicy::TrailingStreak => write!(f, "streak"),
            RepeatPolicy::RecentWindow { rounds } => write!(f, "window:{}", rounds),
        }
    }
}

/// Parameters of the win-rate skill adjustment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSettings {
    /// Number of most recent rounds per faction considered
    pub recency_window: usize,
    /// Exponent applied to the sample ratio to get the confidence weight
    pub confidence_exponent: u32,
    /// Repeat score policy
    pub repeat: RepeatPolicy,
}

impl Default for SkillSettings {
    fn default() -> Self {
        Self {
            recency_window: 30,
            confidence_exponent: 4,
            repeat: RepeatPolicy::default(),
        }
    }
}
