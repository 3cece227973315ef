//! Round history storage interface and implementations
//!
//! The skill model reads the full history once per request. Where the rounds
//! live is up to the implementation; the service only needs them in
//! chronological order.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryHistoryStore;
pub use mysql::MySqlHistoryStore;

use crate::error::Result;
use crate::types::Round;
use async_trait::async_trait;

/// Source of historical round records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load every relevant round, oldest first
    async fn load_rounds(&self) -> Result<Vec<Round>>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<()>;
}
