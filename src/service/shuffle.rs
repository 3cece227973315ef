//! Shuffle orchestration
//!
//! Each request loads the round history, builds its own skill snapshot, seats
//! the roster with the caller's ratings and runs the balancer on a blocking
//! thread. Nothing mutable is shared between requests; a semaphore bounds how
//! many shuffles are computed at once.

use crate::balance::find_best_split;
use crate::config::{AppConfig, BalanceSettings, OddRosterPolicy, SkillSettings};
use crate::error::{Result, ShuffleError};
use crate::history::HistoryStore;
use crate::metrics::{MetricsCollector, ShuffleOutcome};
use crate::skill::{PlayerSkill, SkillModel, SkillSnapshot};
use crate::types::{PlayerId, PlayerSkillResponse, ShuffleRequest, ShuffleResult, SCHEMA_VERSION};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// Roster after validation: who plays and who sits out
#[derive(Debug, Clone, PartialEq)]
pub struct Seating {
    /// (player, rating) in roster order
    pub seated: Vec<(PlayerId, i64)>,
    pub benched: Vec<PlayerId>,
}

/// Computes shuffles and player skill lookups against a history store
pub struct ShuffleService {
    store: Arc<dyn HistoryStore>,
    skill_model: SkillModel,
    balance: BalanceSettings,
    permits: Semaphore,
    metrics: Option<Arc<MetricsCollector>>,
}

impl ShuffleService {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        skill: SkillSettings,
        balance: BalanceSettings,
        max_concurrent_operations: usize,
    ) -> Self {
        Self {
            store,
            skill_model: SkillModel::new(skill),
            balance,
            permits: Semaphore::new(max_concurrent_operations.max(1)),
            metrics: None,
        }
    }

    pub fn from_config(store: Arc<dyn HistoryStore>, config: &AppConfig) -> Self {
        Self::new(
            store,
            config.skill.clone(),
            config.balance.clone(),
            config.service.max_concurrent_operations,
        )
    }

    /// Attach a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Check that the history store is reachable
    pub async fn ping_store(&self) -> Result<()> {
        self.store.ping().await
    }

    /// Load the full round history and rebuild every player
    pub async fn refresh(&self) -> Result<SkillSnapshot> {
        let start = Instant::now();

        let rounds = match self.store.load_rounds().await {
            Ok(rounds) => rounds,
            Err(e) => {
                error!("Failed to load round history: {:#}", e);
                if let Some(metrics) = &self.metrics {
                    metrics.record_refresh_failure();
                }
                return Err(e.context("Failed to refresh skill model"));
            }
        };

        let snapshot = self.skill_model.build(&rounds);
        let elapsed = start.elapsed();

        debug!(
            "Skill model refreshed: {} players, {} rounds in {:.2}ms",
            snapshot.len(),
            snapshot.rounds_loaded(),
            elapsed.as_secs_f64() * 1000.0
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_refresh(snapshot.rounds_loaded(), snapshot.len(), elapsed);
        }

        Ok(snapshot)
    }

    /// Validate a roster and decide who is seated
    pub fn seat_roster(&self, request: &ShuffleRequest) -> std::result::Result<Seating, ShuffleError> {
        let count = request.player_ids.len();
        if count <= 1 {
            return Err(ShuffleError::TooFewPlayers { count });
        }
        if request.ratings.len() != count {
            return Err(ShuffleError::RatingsMismatch {
                players: count,
                ratings: request.ratings.len(),
            });
        }

        let mut seen = HashSet::with_capacity(count);
        if let Some(duplicate) = request.player_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(ShuffleError::DuplicatePlayer {
                player_id: *duplicate,
            });
        }

        let mut seated: Vec<(PlayerId, i64)> = request
            .player_ids
            .iter()
            .copied()
            .zip(request.ratings.iter().copied())
            .collect();

        let mut benched = Vec::new();
        if count % 2 == 1 {
            match self.balance.odd_roster {
                OddRosterPolicy::Reject => return Err(ShuffleError::OddRoster { count }),
                OddRosterPolicy::BenchLast => {
                    if let Some((player_id, _)) = seated.pop() {
                        benched.push(player_id);
                    }
                }
            }
        }

        if seated.len() > self.balance.max_roster_size {
            return Err(ShuffleError::RosterTooLarge {
                count: seated.len(),
                max: self.balance.max_roster_size,
            });
        }

        Ok(Seating { seated, benched })
    }

    /// Split a roster into two balanced teams.
    ///
    /// Invalid rosters produce an unsuccessful result; only history store or
    /// internal failures are returned as errors.
    pub async fn shuffle(&self, request: ShuffleRequest) -> Result<ShuffleResult> {
        let start = Instant::now();
        let team_size = request.player_ids.len() / 2;
        info!("Requested {}v{} shuffle", team_size, team_size);

        let seating = match self.seat_roster(&request) {
            Ok(seating) => seating,
            Err(e) => {
                warn!("Rejected shuffle request: {}", e);
                self.record_outcome(ShuffleOutcome::InvalidInput, start);
                return Ok(ShuffleResult::failure(e.to_string()));
            }
        };

        match self.run_shuffle(seating, start).await {
            Ok(result) => {
                self.record_outcome(ShuffleOutcome::Success, start);
                Ok(result)
            }
            Err(e) => {
                self.record_outcome(ShuffleOutcome::Error, start);
                Err(e)
            }
        }
    }

    async fn run_shuffle(&self, seating: Seating, start: Instant) -> Result<ShuffleResult> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ShuffleError::InternalError {
                message: "Shuffle semaphore closed".to_string(),
            })?;

        let snapshot = self.refresh().await?;
        let seats: Vec<PlayerSkill> = seating
            .seated
            .iter()
            .map(|(player_id, rating)| snapshot.resolve(*player_id, *rating))
            .collect();

        let cutoff = self.balance.score_cutoff;
        let (selection, seats) = tokio::task::spawn_blocking(move || {
            let selection = find_best_split(&seats, cutoff);
            (selection, seats)
        })
        .await
        .map_err(|e| ShuffleError::InternalError {
            message: format!("Shuffle task failed: {}", e),
        })?;

        let selection = selection.ok_or_else(|| ShuffleError::InternalError {
            message: "No candidate split was produced".to_string(),
        })?;
        let candidate = &selection.candidate;

        let team1: Vec<PlayerId> = candidate
            .marines
            .iter()
            .map(|&seat| seats[seat].player_id)
            .collect();
        let team2: Vec<PlayerId> = candidate
            .aliens
            .iter()
            .map(|&seat| seats[seat].player_id)
            .collect();

        let elapsed = start.elapsed();
        info!(
            "Shuffle complete - score: {:.2}, repeat score: {:.2}, policy: {}, candidates: {}, time: {:.2}ms",
            candidate.score,
            candidate.repeat_score,
            selection.policy,
            selection.evaluated,
            elapsed.as_secs_f64() * 1000.0
        );
        debug!("Team 1: {:?} - Team 2: {:?}", team1, team2);

        if let Some(metrics) = &self.metrics {
            metrics.record_selection(selection.policy, seats.len(), selection.evaluated);
        }

        let mut diagnostics = BTreeMap::new();
        diagnostics.insert("Time elapsed".to_string(), format!("{:?}", elapsed));
        diagnostics.insert("Score".to_string(), format!("{:.2}", candidate.score));
        diagnostics.insert("RScore".to_string(), format!("{:.2}", candidate.repeat_score));
        diagnostics.insert("Version".to_string(), SCHEMA_VERSION.to_string());
        diagnostics.insert("Candidates".to_string(), selection.evaluated.to_string());
        diagnostics.insert("Policy".to_string(), selection.policy.to_string());

        Ok(ShuffleResult {
            team1,
            team2,
            benched: seating.benched,
            diagnostics,
            success: true,
            message: "Shuffle complete".to_string(),
        })
    }

    /// Faction-adjusted skills of one player at the given rating
    pub async fn player_skill(&self, player_id: PlayerId, rating: i64) -> Result<PlayerSkillResponse> {
        let snapshot = self.refresh().await?;
        let known = snapshot.contains(player_id);
        let player = snapshot.resolve(player_id, rating);

        info!(
            "Requested player data for {} ({}): Marine: {} - Alien: {}",
            player.display_name(),
            player_id,
            player.marine.adjusted_skill,
            player.alien.adjusted_skill
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_player_lookup(known);
        }

        Ok(PlayerSkillResponse {
            player_id,
            marine_skill: player.marine.adjusted_skill,
            alien_skill: player.alien.adjusted_skill,
        })
    }

    fn record_outcome(&self, outcome: ShuffleOutcome, start: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record_shuffle(outcome, start.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{InMemoryHistoryStore, MockHistoryStore};
    use crate::types::{Faction, Round};

    fn service_with(rounds: Vec<Round>, balance: BalanceSettings) -> ShuffleService {
        ShuffleService::new(
            Arc::new(InMemoryHistoryStore::new(rounds)),
            SkillSettings::default(),
            balance,
            2,
        )
    }

    fn request(ids: &[PlayerId], rating: i64) -> ShuffleRequest {
        ShuffleRequest {
            player_ids: ids.to_vec(),
            ratings: vec![rating; ids.len()],
        }
    }

    fn round(round_id: i64, player_id: PlayerId, faction: Faction, won: bool) -> Round {
        Round {
            round_id,
            player_id,
            skill: 1000,
            player_name: format!("player{}", player_id),
            faction,
            won,
        }
    }

    #[test]
    fn test_seat_roster_rejections() {
        let service = service_with(vec![], BalanceSettings::default());

        assert!(matches!(
            service.seat_roster(&request(&[1], 100)),
            Err(ShuffleError::TooFewPlayers { count: 1 })
        ));
        assert!(matches!(
            service.seat_roster(&request(&[], 100)),
            Err(ShuffleError::TooFewPlayers { count: 0 })
        ));
        assert!(matches!(
            service.seat_roster(&ShuffleRequest {
                player_ids: vec![1, 2],
                ratings: vec![100],
            }),
            Err(ShuffleError::RatingsMismatch { players: 2, ratings: 1 })
        ));
        assert!(matches!(
            service.seat_roster(&request(&[1, 2, 1, 3], 100)),
            Err(ShuffleError::DuplicatePlayer { player_id: 1 })
        ));
        assert!(matches!(
            service.seat_roster(&request(&[1, 2, 3], 100)),
            Err(ShuffleError::OddRoster { count: 3 })
        ));

        let ids: Vec<PlayerId> = (1..=26).collect();
        assert!(matches!(
            service.seat_roster(&request(&ids, 100)),
            Err(ShuffleError::RosterTooLarge { count: 26, max: 24 })
        ));
    }

    #[test]
    fn test_bench_last_seats_even_roster() {
        let service = service_with(
            vec![],
            BalanceSettings {
                odd_roster: OddRosterPolicy::BenchLast,
                ..BalanceSettings::default()
            },
        );

        let seating = service.seat_roster(&request(&[10, 20, 30], 500)).unwrap();
        assert_eq!(seating.seated, vec![(10, 500), (20, 500)]);
        assert_eq!(seating.benched, vec![30]);
    }

    #[tokio::test]
    async fn test_too_few_players_never_touches_store() {
        let mut store = MockHistoryStore::new();
        store.expect_load_rounds().times(0);

        let service = ShuffleService::new(
            Arc::new(store),
            SkillSettings::default(),
            BalanceSettings::default(),
            1,
        );

        let result = service.shuffle(request(&[1], 1500)).await.unwrap();
        assert!(!result.success);
        assert!(result.message.contains("Too few players"));
        assert!(result.team1.is_empty());
        assert!(result.team2.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockHistoryStore::new();
        store.expect_load_rounds().times(1).returning(|| {
            Err(ShuffleError::HistoryUnavailable {
                message: "connection refused".to_string(),
            }
            .into())
        });

        let service = ShuffleService::new(
            Arc::new(store),
            SkillSettings::default(),
            BalanceSettings::default(),
            1,
        );

        let result = service.shuffle(request(&[1, 2], 1500)).await;
        let error = result.unwrap_err();
        assert!(format!("{:#}", error).contains("connection refused"));
        assert!(error
            .chain()
            .any(|cause| cause.downcast_ref::<ShuffleError>().is_some()));
    }

    #[tokio::test]
    async fn test_equal_roster_takes_first_split() {
        let service = service_with(vec![], BalanceSettings::default());

        let result = service.shuffle(request(&[11, 12, 13, 14], 100)).await.unwrap();
        assert!(result.success);
        assert_eq!(result.team1, vec![11, 12]);
        assert_eq!(result.team2, vec![13, 14]);
        assert_eq!(result.diagnostics["Score"], "0.00");
        assert_eq!(result.diagnostics["RScore"], "0.00");
        assert_eq!(result.diagnostics["Version"], SCHEMA_VERSION);
        assert_eq!(result.diagnostics["Candidates"], "6");
        assert!(result.diagnostics.contains_key("Time elapsed"));
    }

    #[tokio::test]
    async fn test_bench_last_result() {
        let service = service_with(
            vec![],
            BalanceSettings {
                odd_roster: OddRosterPolicy::BenchLast,
                ..BalanceSettings::default()
            },
        );

        let result = service.shuffle(request(&[1, 2, 3], 100)).await.unwrap();
        assert!(result.success);
        assert_eq!(result.team1, vec![1]);
        assert_eq!(result.team2, vec![2]);
        assert_eq!(result.benched, vec![3]);
    }

    #[tokio::test]
    async fn test_streak_player_moved_off_faction() {
        // Player 1 has played marine for the last five rounds
        let rounds: Vec<Round> = (1..=5).map(|id| round(id, 1, Faction::Marine, true)).collect();
        let service = service_with(rounds, BalanceSettings::default());

        let result = service.shuffle(request(&[1, 2, 3, 4], 100)).await.unwrap();
        assert!(result.success);
        assert!(result.team2.contains(&1));
        assert_eq!(result.diagnostics["Policy"], "fairness");
    }

    #[tokio::test]
    async fn test_player_skill_lookup() {
        let rounds: Vec<Round> = (1..=30).map(|id| round(id, 7, Faction::Marine, false)).collect();
        let service = service_with(rounds, BalanceSettings::default());

        let known = service.player_skill(7, 1600).await.unwrap();
        assert_eq!(known.player_id, 7);
        assert_eq!(known.marine_skill, 0);
        assert_eq!(known.alien_skill, 1600);

        let unknown = service.player_skill(8, 1400).await.unwrap();
        assert_eq!(unknown.marine_skill, 1400);
        assert_eq!(unknown.alien_skill, 1400);
    }

    #[tokio::test]
    async fn test_metrics_record_outcomes() {
        let metrics = Arc::new(MetricsCollector::new().unwrap());
        let service =
            service_with(vec![], BalanceSettings::default()).with_metrics(metrics.clone());

        service.shuffle(request(&[1], 100)).await.unwrap();
        service.shuffle(request(&[1, 2], 100)).await.unwrap();

        let requests = &metrics.shuffle().requests_total;
        assert_eq!(requests.with_label_values(&["invalid_input"]).get(), 1);
        assert_eq!(requests.with_label_values(&["success"]).get(), 1);
        assert_eq!(metrics.shuffle().candidates_evaluated_total.get(), 2);
    }

    #[tokio::test]
    async fn test_refresh_and_shuffle_durations_observed() {
        let metrics = Arc::new(MetricsCollector::new().unwrap());
        let service = service_with(
            vec![round(2000, 1, Faction::Marine, true)],
            BalanceSettings::default(),
        )
        .with_metrics(metrics.clone());

        service.refresh().await.unwrap();
        let refresh_timings = &metrics.history().refresh_duration_seconds;
        assert_eq!(refresh_timings.get_sample_count(), 1);
        assert_eq!(metrics.history().rounds_loaded.get(), 1);

        service.shuffle(request(&[1, 2], 1000)).await.unwrap();
        assert_eq!(refresh_timings.get_sample_count(), 2);
        assert_eq!(
            metrics
                .shuffle()
                .duration_seconds
                .with_label_values(&["success"])
                .get_sample_count(),
            1
        );
    }
}
