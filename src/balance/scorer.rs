//! Parity and repeat scoring of a single candidate split

use crate::balance::stats::{mean, population_std_dev};
use crate::skill::PlayerSkill;
use crate::types::Faction;
use serde::{Deserialize, Serialize};

/// One scored split of the seated roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Seat indices playing Marine (team 1)
    pub marines: Vec<usize>,
    /// Seat indices playing Alien (team 2)
    pub aliens: Vec<usize>,
    pub mean_diff: f64,
    pub std_diff: f64,
    /// Distance between the two teams' skill distributions; lower is better
    pub score: f64,
    /// Sum of each player's repeat score for the faction they are assigned
    pub repeat_score: f64,
}

/// Score a split of `seats`. Marines are measured on their marine-adjusted
/// skill, aliens on their alien-adjusted skill.
pub fn score_partition(seats: &[PlayerSkill], marines: Vec<usize>, aliens: Vec<usize>) -> Candidate {
    let (marine_skills, marine_repeat) = side_values(seats, &marines, Faction::Marine);
    let (alien_skills, alien_repeat) = side_values(seats, &aliens, Faction::Alien);

    let mean_diff = (mean(&marine_skills) - mean(&alien_skills)).abs();
    let std_diff =
        (population_std_dev(&marine_skills) - population_std_dev(&alien_skills)).abs();

    Candidate {
        marines,
        aliens,
        mean_diff,
        std_diff,
        score: mean_diff.hypot(std_diff),
        repeat_score: marine_repeat + alien_repeat,
    }
}

fn side_values(seats: &[PlayerSkill], side: &[usize], faction: Faction) -> (Vec<f64>, f64) {
    let mut skills = Vec::with_capacity(side.len());
    let mut repeat = 0.0;

    for &seat in side {
        let skill = seats[seat].faction(faction);
        skills.push(skill.adjusted_skill as f64);
        repeat += skill.repeat_score;
    }

    (skills, repeat)
}
