//! Common types used throughout the shuffle service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for players (Steam account id)
pub type PlayerId = i64;

/// Diagnostics schema version reported with every shuffle result
pub const SCHEMA_VERSION: &str = "2";

/// One of the two opposing sides of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Marine,
    Alien,
}

impl Faction {
    /// Parse the team number stored with a round (1 = Marine, 2 = Alien)
    pub fn from_team(team: i64) -> Option<Self> {
        match team {
            1 => Some(Faction::Marine),
            2 => Some(Faction::Alien),
            _ => None,
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faction::Marine => write!(f, "Marine"),
            Faction::Alien => write!(f, "Alien"),
        }
    }
}

/// A single player's participation in one historical round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub round_id: i64,
    pub player_id: PlayerId,
    /// Skill rating recorded for the player
    pub skill: i64,
    pub player_name: String,
    pub faction: Faction,
    pub won: bool,
}

/// Request to split a roster into two teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuffleRequest {
    #[serde(rename = "ns2ids")]
    pub player_ids: Vec<PlayerId>,
    /// Current ratings, parallel to `player_ids`
    #[serde(rename = "hiveskills")]
    pub ratings: Vec<i64>,
}

/// Outcome of a shuffle request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuffleResult {
    /// Marine team, in roster order
    pub team1: Vec<PlayerId>,
    /// Alien team, in roster order
    pub team2: Vec<PlayerId>,
    /// Players left out of an odd roster
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benched: Vec<PlayerId>,
    pub diagnostics: BTreeMap<String, String>,
    pub success: bool,
    pub message: String,
}

impl ShuffleResult {
    /// Build a failed result carrying only a message and the schema version
    pub fn failure(message: impl Into<String>) -> Self {
        let mut diagnostics = BTreeMap::new();
        diagnostics.insert("Version".to_string(), SCHEMA_VERSION.to_string());

        Self {
            team1: Vec::new(),
            team2: Vec::new(),
            benched: Vec::new(),
            diagnostics,
            success: false,
            message: message.into(),
        }
    }
}

/// Faction-adjusted skills for a single player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSkillResponse {
    #[serde(rename = "ns2id")]
    pub player_id: PlayerId,
    pub marine_skill: i64,
    pub alien_skill: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faction_from_team() {
        assert_eq!(Faction::from_team(1), Some(Faction::Marine));
        assert_eq!(Faction::from_team(2), Some(Faction::Alien));
        assert_eq!(Faction::from_team(0), None);
        assert_eq!(Faction::from_team(3), None);
    }

    #[test]
    fn test_shuffle_request_wire_names() {
        let request: ShuffleRequest =
            serde_json::from_str(r#"{"ns2ids":[1,2],"hiveskills":[1500,1200]}"#).unwrap();
        assert_eq!(request.player_ids, vec![1, 2]);
        assert_eq!(request.ratings, vec![1500, 1200]);
    }

    #[test]
    fn test_failure_result_serialization() {
        let result = ShuffleResult::failure("Too few players");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Too few players");
        assert_eq!(json["diagnostics"]["Version"], SCHEMA_VERSION);
        // benched is omitted when empty
        assert!(json.get("benched").is_none());
    }

    #[test]
    fn test_player_skill_response_wire_names() {
        let response = PlayerSkillResponse {
            player_id: 42,
            marine_skill: 1500,
            alien_skill: 900,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["ns2id"], 42);
        assert_eq!(json["marine_skill"], 1500);
        assert_eq!(json["alien_skill"], 900);
    }
}
