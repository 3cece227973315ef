//! In-memory round history, used for tests and offline replays

use crate::error::{Result, ShuffleError};
use crate::history::HistoryStore;
use crate::types::Round;
use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use std::sync::RwLock;

/// Round history held in memory
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    rounds: RwLock<Vec<Round>>,
}

impl InMemoryHistoryStore {
    pub fn new(rounds: Vec<Round>) -> Self {
        Self {
            rounds: RwLock::new(rounds),
        }
    }

    /// Load rounds from a JSON array file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rounds file {}", path.display()))?;
        let rounds: Vec<Round> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse rounds file {}", path.display()))?;
        Ok(Self::new(rounds))
    }

    /// Append a round
    pub fn record(&self, round: Round) -> Result<()> {
        let mut rounds = self
            .rounds
            .write()
            .map_err(|_| ShuffleError::InternalError {
                message: "Failed to acquire rounds write lock".to_string(),
            })?;
        rounds.push(round);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rounds.read().map(|rounds| rounds.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn load_rounds(&self) -> Result<Vec<Round>> {
        let rounds = self
            .rounds
            .read()
            .map_err(|_| ShuffleError::InternalError {
                message: "Failed to acquire rounds read lock".to_string(),
            })?;

        let mut ordered = rounds.clone();
        ordered.sort_by_key(|round| round.round_id);
        Ok(ordered)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
