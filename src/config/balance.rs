//! Team balancing configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Largest roster the enumerator will ever accept, whatever the configuration.
/// C(32, 16) is roughly 6e8 candidates.
pub const ROSTER_SIZE_CEILING: usize = 32;

/// What to do with a roster of odd size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddRosterPolicy {
    /// Fail the request
    Reject,
    /// Leave the last entrant out of both teams
    BenchLast,
}

impl Default for OddRosterPolicy {
    fn default() -> Self {
        OddRosterPolicy::Reject
    }
}

impl FromStr for OddRosterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(OddRosterPolicy::Reject),
            "bench_last" | "bench-last" => Ok(OddRosterPolicy::BenchLast),
            other => Err(format!("Unknown odd roster policy: {}", other)),
        }
    }
}

/// Selection policy parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSettings {
    /// Parity score below which a split counts as balanced enough
    pub score_cutoff: f64,
    /// Maximum roster size accepted; enumeration cost is C(N, N/2) * N
    pub max_roster_size: usize,
    pub odd_roster: OddRosterPolicy,
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            score_cutoff: 100.0,
            max_roster_size: 24,
            odd_roster: OddRosterPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = BalanceSettings::default();
        assert_eq!(settings.score_cutoff, 100.0);
        assert_eq!(settings.max_roster_size, 24);
        assert_eq!(settings.odd_roster, OddRosterPolicy::Reject);
    }

    #[test]
    fn test_parse_odd_roster_policy() {
        assert_eq!(
            "bench_last".parse::<OddRosterPolicy>().unwrap(),
            OddRosterPolicy::BenchLast
        );
        assert_eq!(
            "REJECT".parse::<OddRosterPolicy>().unwrap(),
            OddRosterPolicy::Reject
        );
        assert!("drop".parse::<OddRosterPolicy>().is_err());
    }
}
