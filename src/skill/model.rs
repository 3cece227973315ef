//! Win-rate weighted skill model
//!
//! Every refresh rebuilds the full set of players from round history. For
//! each faction the most recent rounds (up to the recency window) give a win
//! rate and a confidence weight, which combine into a skill multiplier:
//!
//! `multiplier = win_rate * 2 * weight + (1 - weight)`
//!
//! A player with no rounds in a faction keeps a multiplier of exactly 1.

use crate::config::skill::SkillSettings;
use crate::skill::repeat::{repeat_scores, RepeatScores};
use crate::types::{Faction, PlayerId, Round};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Confidence weight for `samples` recent rounds out of a window of `window`
pub fn confidence_weight(samples: usize, window: usize, exponent: u32) -> f64 {
    if window == 0 {
        return 0.0;
    }
    (samples.min(window) as f64 / window as f64).powi(exponent as i32)
}

/// Skill multiplier for a win rate in [0, 1] and a weight in [0, 1]
pub fn skill_multiplier(win_rate: f64, weight: f64) -> f64 {
    win_rate * 2.0 * weight + (1.0 - weight)
}

/// Apply a multiplier to a base rating, rounding down
pub fn adjusted_skill(base_rating: i64, multiplier: f64) -> i64 {
    (base_rating as f64 * multiplier).floor() as i64
}

/// Skill adjustment for one faction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionSkill {
    /// Rounds inside the recency window
    pub samples: usize,
    pub win_rate: f64,
    pub weight: f64,
    pub multiplier: f64,
    pub repeat_score: f64,
    pub adjusted_skill: i64,
}

impl FactionSkill {
    /// No history: the base rating passes through unchanged
    pub fn neutral(base_rating: i64) -> Self {
        Self {
            samples: 0,
            win_rate: 0.0,
            weight: 0.0,
            multiplier: 1.0,
            repeat_score: 0.0,
            adjusted_skill: base_rating,
        }
    }

    fn rebased(&self, base_rating: i64) -> Self {
        Self {
            adjusted_skill: adjusted_skill(base_rating, self.multiplier),
            ..self.clone()
        }
    }
}

/// Aggregate skill state for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSkill {
    pub player_id: PlayerId,
    /// Last known display name; unknown players have none
    pub name: Option<String>,
    pub base_rating: i64,
    pub marine: FactionSkill,
    pub alien: FactionSkill,
}

impl PlayerSkill {
    /// A player without any recorded rounds
    pub fn new_player(player_id: PlayerId, rating: i64) -> Self {
        Self {
            player_id,
            name: None,
            base_rating: rating,
            marine: FactionSkill::neutral(rating),
            alien: FactionSkill::neutral(rating),
        }
    }

    pub fn faction(&self, faction: Faction) -> &FactionSkill {
        match faction {
            Faction::Marine => &self.marine,
            Faction::Alien => &self.alien,
        }
    }

    /// Copy of this player with a new base rating and recomputed adjusted skills
    pub fn with_rating(&self, rating: i64) -> Self {
        Self {
            player_id: self.player_id,
            name: self.name.clone(),
            base_rating: rating,
            marine: self.marine.rebased(rating),
            alien: self.alien.rebased(rating),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<New player>")
    }
}

/// Immutable view of every known player, built once per request
#[derive(Debug, Clone, Default)]
pub struct SkillSnapshot {
    players: HashMap<PlayerId, PlayerSkill>,
    rounds_loaded: usize,
}

impl SkillSnapshot {
    pub fn get(&self, player_id: PlayerId) -> Option<&PlayerSkill> {
        self.players.get(&player_id)
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players.contains_key(&player_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of rounds the snapshot was built from
    pub fn rounds_loaded(&self) -> usize {
        self.rounds_loaded
    }

    /// Skill for `player_id` at the caller-supplied rating. Known players keep
    /// their multipliers; unknown players are synthesized with none.
    pub fn resolve(&self, player_id: PlayerId, rating: i64) -> PlayerSkill {
        match self.players.get(&player_id) {
            Some(player) => player.with_rating(rating),
            None => PlayerSkill::new_player(player_id, rating),
        }
    }
}

/// Builds skill snapshots from round history
#[derive(Debug, Clone, Default)]
pub struct SkillModel {
    settings: SkillSettings,
}

impl SkillModel {
    pub fn new(settings: SkillSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SkillSettings {
        &self.settings
    }

    /// Rebuild every player from scratch
    pub fn build(&self, rounds: &[Round]) -> SkillSnapshot {
        let mut ordered: Vec<&Round> = rounds.iter().collect();
        ordered.sort_by_key(|round| round.round_id);

        let mut histories: HashMap<PlayerId, Vec<&Round>> = HashMap::new();
        for round in ordered {
            histories.entry(round.player_id).or_default().push(round);
        }

        let players: HashMap<PlayerId, PlayerSkill> = histories
            .into_iter()
            .filter_map(|(player_id, history)| {
                self.player_skill(&history)
                    .map(|player| (player_id, player))
            })
            .collect();

        debug!(
            "Built skill snapshot: {} players from {} rounds",
            players.len(),
            rounds.len()
        );

        SkillSnapshot {
            players,
            rounds_loaded: rounds.len(),
        }
    }

    fn player_skill(&self, history: &[&Round]) -> Option<PlayerSkill> {
        let latest = history.last()?;
        let base_rating = latest.skill;
        let repeat = repeat_scores(self.settings.repeat, history);

        Some(PlayerSkill {
            player_id: latest.player_id,
            name: Some(latest.player_name.clone()),
            base_rating,
            marine: self.faction_skill(history, Faction::Marine, base_rating, &repeat),
            alien: self.faction_skill(history, Faction::Alien, base_rating, &repeat),
        })
    }

    fn faction_skill(
        &self,
        history: &[&Round],
        faction: Faction,
        base_rating: i64,
        repeat: &RepeatScores,
    ) -> FactionSkill {
        let window = self.settings.recency_window;
        let recent: Vec<&Round> = history
            .iter()
            .rev()
            .filter(|round| round.faction == faction)
            .take(window)
            .copied()
            .collect();

        let samples = recent.len();
        let wins = recent.iter().filter(|round| round.won).count();
        let win_rate = if samples == 0 {
            0.0
        } else {
            wins as f64 / samples as f64
        };
        let weight = confidence_weight(samples, window, self.settings.confidence_exponent);
        let multiplier = skill_multiplier(win_rate, weight);

        FactionSkill {
            samples,
            win_rate,
            weight,
            multiplier,
            repeat_score: repeat.for_faction(faction),
            adjusted_skill: adjusted_skill(base_rating, multiplier),
        }
    }
}
