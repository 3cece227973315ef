//! Two-stage selection of the winning split
//!
//! Candidates are offered one at a time as they are enumerated. When more
//! than one candidate scores below the cutoff, the one among them with the
//! lowest repeat score wins. Otherwise the candidate with the lowest parity
//! score overall wins. All comparisons are strict, so the first candidate
//! enumerated wins any tie.

use crate::balance::scorer::Candidate;
use serde::{Deserialize, Serialize};

/// Which rule picked the winner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Several splits were balanced enough; lowest repeat score won
    Fairness,
    /// At most one split was under the cutoff; lowest parity score won
    Parity,
}

impl std::fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionPolicy::Fairness => write!(f, "fairness"),
            SelectionPolicy::Parity => write!(f, "parity"),
        }
    }
}

/// The chosen split and how it was chosen
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub candidate: Candidate,
    pub policy: SelectionPolicy,
    /// Candidates offered in total
    pub evaluated: u64,
    /// Candidates that scored below the cutoff
    pub within_cutoff: u64,
}

/// Streaming selector; keeps only the running winners
#[derive(Debug, Clone)]
pub struct Selector {
    score_cutoff: f64,
    best_score: Option<Candidate>,
    best_repeat_within_cutoff: Option<Candidate>,
    evaluated: u64,
    within_cutoff: u64,
}

impl Selector {
    pub fn new(score_cutoff: f64) -> Self {
        Self {
            score_cutoff,
            best_score: None,
            best_repeat_within_cutoff: None,
            evaluated: 0,
            within_cutoff: 0,
        }
    }

    pub fn offer(&mut self, candidate: Candidate) {
        self.evaluated += 1;

        if candidate.score < self.score_cutoff {
            self.within_cutoff += 1;
            let improves = self
                .best_repeat_within_cutoff
                .as_ref()
                .map_or(true, |best| candidate.repeat_score < best.repeat_score);
            if improves {
                self.best_repeat_within_cutoff = Some(candidate.clone());
            }
        }

        let improves = self
            .best_score
            .as_ref()
            .map_or(true, |best| candidate.score < best.score);
        if improves {
            self.best_score = Some(candidate);
        }
    }

    /// Pick the winner; `None` only if nothing was offered
    pub fn finish(self) -> Option<Selection> {
        let (candidate, policy) = if self.within_cutoff > 1 {
            (self.best_repeat_within_cutoff?, SelectionPolicy::Fairness)
        } else {
            (self.best_score?, SelectionPolicy::Parity)
        };

        Some(Selection {
            candidate,
            policy,
            evaluated: self.evaluated,
            within_cutoff: self.within_cutoff,
        })
    }
}

/// Select from an already materialized set of candidates
pub fn select<I>(candidates: I, score_cutoff: f64) -> Option<Selection>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut selector = Selector::new(score_cutoff);
    for candidate in candidates {
        selector.offer(candidate);
    }
    selector.finish()
}
