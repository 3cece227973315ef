//! Test fixtures and store implementations for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use skill_shuffle::config::{BalanceSettings, SkillSettings};
use skill_shuffle::error::{Result, ShuffleError};
use skill_shuffle::history::{HistoryStore, InMemoryHistoryStore};
use skill_shuffle::service::ShuffleService;
use skill_shuffle::types::{Faction, PlayerId, Round};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Builds round history with increasing round ids
#[derive(Debug)]
pub struct RoundLog {
    next_round_id: i64,
    rounds: Vec<Round>,
}

impl RoundLog {
    pub fn new() -> Self {
        Self {
            next_round_id: 2000,
            rounds: Vec::new(),
        }
    }

    /// Append `count` rounds of `player` on `faction` with the given outcome
    pub fn play(
        mut self,
        player_id: PlayerId,
        faction: Faction,
        won: bool,
        count: usize,
    ) -> Self {
        for _ in 0..count {
            self.rounds.push(Round {
                round_id: self.next_round_id,
                player_id,
                skill: 1500,
                player_name: format!("player-{}", player_id),
                faction,
                won,
            });
            self.next_round_id += 1;
        }
        self
    }

    pub fn rounds(self) -> Vec<Round> {
        self.rounds
    }
}

impl Default for RoundLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Shuffle service over in-memory history with default settings
pub fn service_with_rounds(rounds: Vec<Round>) -> ShuffleService {
    service_with_settings(rounds, BalanceSettings::default())
}

pub fn service_with_settings(rounds: Vec<Round>, balance: BalanceSettings) -> ShuffleService {
    ShuffleService::new(
        Arc::new(InMemoryHistoryStore::new(rounds)),
        SkillSettings::default(),
        balance,
        4,
    )
}

/// Store that counts how often history is loaded
#[derive(Debug, Default)]
pub struct CountingHistoryStore {
    inner: InMemoryHistoryStore,
    loads: AtomicUsize,
}

impl CountingHistoryStore {
    pub fn new(rounds: Vec<Round>) -> Self {
        Self {
            inner: InMemoryHistoryStore::new(rounds),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryStore for CountingHistoryStore {
    async fn load_rounds(&self) -> Result<Vec<Round>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_rounds().await
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Store whose database is always unreachable
#[derive(Debug, Default)]
pub struct UnavailableHistoryStore;

#[async_trait]
impl HistoryStore for UnavailableHistoryStore {
    async fn load_rounds(&self) -> Result<Vec<Round>> {
        Err(ShuffleError::HistoryUnavailable {
            message: "Can't connect to MySQL server".to_string(),
        }
        .into())
    }

    async fn ping(&self) -> Result<()> {
        self.load_rounds().await.map(|_| ())
    }
}
