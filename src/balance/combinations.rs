//! Lazy enumeration of every two-team split of a roster
//!
//! Seats are assigned to team 1 (0) or team 2 (1). Splits are produced by
//! stepping the assignment vector through its lexicographic permutations,
//! starting from `[0; k] ++ [1; k]`, so each split is emitted exactly once
//! and always in the same order.

/// Number of ways to choose `k` items out of `n`
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u128, |acc, i| acc * (n - i) as u128 / (i + 1) as u128)
}

/// Iterator over all splits of `2 * team_size` seats into two teams of
/// `team_size`, yielding the seat indices of each team in ascending order
#[derive(Debug, Clone)]
pub struct Partitions {
    assignment: Vec<u8>,
    remaining: u128,
}

impl Partitions {
    pub fn new(team_size: usize) -> Self {
        let mut assignment = vec![0u8; team_size];
        assignment.resize(team_size * 2, 1);

        Self {
            assignment,
            remaining: binomial(team_size * 2, team_size),
        }
    }

    fn split(&self) -> (Vec<usize>, Vec<usize>) {
        let team_size = self.assignment.len() / 2;
        let mut team1 = Vec::with_capacity(team_size);
        let mut team2 = Vec::with_capacity(team_size);

        for (seat, side) in self.assignment.iter().enumerate() {
            if *side == 0 {
                team1.push(seat);
            } else {
                team2.push(seat);
            }
        }

        (team1, team2)
    }
}

impl Iterator for Partitions {
    type Item = (Vec<usize>, Vec<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let item = self.split();
        self.remaining -= 1;
        if self.remaining > 0 {
            next_permutation(&mut self.assignment);
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Advance to the next lexicographic permutation; false when already last
fn next_permutation(values: &mut [u8]) -> bool {
    let Some(pivot) = values.windows(2).rposition(|pair| pair[0] < pair[1]) else {
        return false;
    };

    // values[pivot + 1..] is non-increasing, so the rightmost larger value
    // is the smallest one greater than the pivot
    let successor = values
        .iter()
        .rposition(|value| *value > values[pivot])
        .unwrap_or(pivot + 1);

    values.swap(pivot, successor);
    values[pivot + 1..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(0, 0), 1);
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(12, 6), 924);
        assert_eq!(binomial(24, 12), 2_704_156);
        assert_eq!(binomial(32, 16), 601_080_390);
        assert_eq!(binomial(3, 5), 0);
    }

    #[test]
    fn test_four_seats_in_order() {
        let splits: Vec<_> = Partitions::new(2).collect();

        assert_eq!(
            splits,
            vec![
                (vec![0, 1], vec![2, 3]),
                (vec![0, 2], vec![1, 3]),
                (vec![0, 3], vec![1, 2]),
                (vec![1, 2], vec![0, 3]),
                (vec![1, 3], vec![0, 2]),
                (vec![2, 3], vec![0, 1]),
            ]
        );
    }

    #[test]
    fn test_size_hint_counts_down() {
        let mut partitions = Partitions::new(3);
        assert_eq!(partitions.size_hint(), (20, Some(20)));
        partitions.next();
        assert_eq!(partitions.size_hint(), (19, Some(19)));
        assert_eq!(partitions.count(), 19);
    }

    #[test]
    fn test_empty_roster_yields_one_empty_split() {
        let splits: Vec<_> = Partitions::new(0).collect();
        assert_eq!(splits, vec![(vec![], vec![])]);
    }

    #[test]
    fn test_next_permutation_last() {
        let mut values = vec![1, 1, 0, 0];
        assert!(!next_permutation(&mut values));
        assert_eq!(values, vec![1, 1, 0, 0]);
    }

    proptest! {
        #[test]
        fn prop_every_split_is_valid_and_unique(team_size in 1usize..=6) {
            let seats = team_size * 2;
            let mut seen = HashSet::new();

            for (team1, team2) in Partitions::new(team_size) {
                prop_assert_eq!(team1.len(), team_size);
                prop_assert_eq!(team2.len(), team_size);

                let mut all: Vec<usize> = team1.iter().chain(team2.iter()).copied().collect();
                all.sort_unstable();
                prop_assert_eq!(all, (0..seats).collect::<Vec<_>>());

                prop_assert!(seen.insert(team1));
            }

            prop_assert_eq!(seen.len() as u128, binomial(seats, team_size));
        }
    }
}
