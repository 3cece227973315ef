//! Team balancing: enumeration, scoring and selection of roster splits
//!
//! For a seated roster of `2k` players every one of the `C(2k, k)` splits is
//! scored, so the cost is `Θ(C(2k, k) · k)`. Roughly 2.7 million candidates
//! at 24 players; the roster cap in the balance settings bounds this.

pub mod combinations;
pub mod scorer;
pub mod selector;
pub mod stats;

// Re-export commonly used types
pub use combinations::{binomial, Partitions};
pub use scorer::{score_partition, Candidate};
pub use selector::{select, Selection, SelectionPolicy, Selector};

use crate::skill::PlayerSkill;

/// Enumerate and score every split of `seats`, returning the selected one.
/// An odd trailing seat is never enumerated; callers seat an even roster.
pub fn find_best_split(seats: &[PlayerSkill], score_cutoff: f64) -> Option<Selection> {
    let mut selector = Selector::new(score_cutoff);
    for (marines, aliens) in Partitions::new(seats.len() / 2) {
        selector.offer(score_partition(seats, marines, aliens));
    }
    selector.finish()
}
