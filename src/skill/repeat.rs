//! Repeat scores: how strongly a player has recently been held on one faction

use crate::config::skill::RepeatPolicy;
use crate::types::{Faction, Round};
use serde::{Deserialize, Serialize};

/// Per-faction repeat scores for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RepeatScores {
    pub marine: f64,
    pub alien: f64,
}

impl RepeatScores {
    pub fn for_faction(&self, faction: Faction) -> f64 {
        match faction {
            Faction::Marine => self.marine,
            Faction::Alien => self.alien,
        }
    }

    fn set(&mut self, faction: Faction, score: f64) {
        match faction {
            Faction::Marine => self.marine = score,
            Faction::Alien => self.alien = score,
        }
    }
}

/// Compute repeat scores from a player's chronological round history
pub fn repeat_scores(policy: RepeatPolicy, history: &[&Round]) -> RepeatScores {
    match policy {
        RepeatPolicy::TrailingStreak => trailing_streak(history),
        RepeatPolicy::RecentWindow { rounds } => recent_window(history, rounds),
    }
}

fn trailing_streak(history: &[&Round]) -> RepeatScores {
    let mut scores = RepeatScores::default();
    let Some(last) = history.last() else {
        return scores;
    };

    let streak = history
        .iter()
        .rev()
        .take_while(|round| round.faction == last.faction)
        .count();
    scores.set(last.faction, streak as f64);
    scores
}

fn recent_window(history: &[&Round], rounds: usize) -> RepeatScores {
    // Players with fewer rounds than the window carry no repeat penalty
    if rounds == 0 || history.len() < rounds {
        return RepeatScores::default();
    }

    let recent = &history[history.len() - rounds..];
    let share = |faction: Faction| {
        recent.iter().filter(|round| round.faction == faction).count() as f64 / rounds as f64
    };

    RepeatScores {
        marine: share(Faction::Marine),
        alien: share(Faction::Alien),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rounds(factions: &[Faction]) -> Vec<Round> {
        factions
            .iter()
            .enumerate()
            .map(|(i, faction)| Round {
                round_id: i as i64 + 1,
                player_id: 7,
                skill: 1000,
                player_name: "seven".to_string(),
                faction: *faction,
                won: false,
            })
            .collect()
    }

    #[test]
    fn test_streak_empty_history() {
        let scores = repeat_scores(RepeatPolicy::TrailingStreak, &[]);
        assert_eq!(scores, RepeatScores::default());
    }

    #[test]
    fn test_streak_counts_trailing_run_only() {
        use Faction::*;
        let history = rounds(&[Marine, Marine, Alien, Marine, Marine, Marine]);
        let refs: Vec<&Round> = history.iter().collect();

        let scores = repeat_scores(RepeatPolicy::TrailingStreak, &refs);
        assert_eq!(scores.marine, 3.0);
        assert_eq!(scores.alien, 0.0);
    }

    #[test]
    fn test_streak_single_round() {
        let history = rounds(&[Faction::Alien]);
        let refs: Vec<&Round> = history.iter().collect();

        let scores = repeat_scores(RepeatPolicy::TrailingStreak, &refs);
        assert_eq!(scores.for_faction(Faction::Alien), 1.0);
        assert_eq!(scores.for_faction(Faction::Marine), 0.0);
    }

    #[test]
    fn test_window_fraction() {
        use Faction::*;
        let history = rounds(&[Alien, Alien, Alien, Marine]);
        let refs: Vec<&Round> = history.iter().collect();

        let scores = repeat_scores(RepeatPolicy::RecentWindow { rounds: 2 }, &refs);
        assert_eq!(scores.marine, 0.5);
        assert_eq!(scores.alien, 0.5);

        let scores = repeat_scores(RepeatPolicy::RecentWindow { rounds: 4 }, &refs);
        assert_eq!(scores.marine, 0.25);
        assert_eq!(scores.alien, 0.75);
    }

    #[test]
    fn test_window_short_history_is_zero() {
        let history = rounds(&[Faction::Marine]);
        let refs: Vec<&Round> = history.iter().collect();

        let scores = repeat_scores(RepeatPolicy::RecentWindow { rounds: 2 }, &refs);
        assert_eq!(scores, RepeatScores::default());
    }
}
