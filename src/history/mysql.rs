//! MySQL-backed round history reading the game's round statistics tables

use crate::config::{AppConfig, DatabaseSettings};
use crate::error::{Result, ShuffleError};
use crate::history::HistoryStore;
use crate::types::{Faction, Round};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info, warn};

/// Every player round after the configured starting round, oldest first.
/// Integer columns are cast so they always decode as BIGINT.
const ROUNDS_QUERY: &str = r#"
SELECT CAST(prs.roundId AS SIGNED) AS round_id,
       CAST(prs.steamId AS SIGNED) AS player_id,
       CAST(ps.hiveSkill AS SIGNED) AS skill,
       prs.playerName AS player_name,
       CAST(prs.lastTeam AS SIGNED) AS team,
       CAST(IF(prs.lastTeam = ri.winningTeam, 1, 0) AS SIGNED) AS win
FROM PlayerRoundStats prs
INNER JOIN RoundInfo ri ON ri.roundId = prs.roundId
INNER JOIN PlayerStats ps ON ps.steamId = prs.steamId
WHERE ri.roundId > ? AND prs.lastTeam IN (1, 2)
ORDER BY prs.roundId ASC
"#;

#[derive(Debug, FromRow)]
struct RoundRow {
    round_id: i64,
    player_id: i64,
    skill: i64,
    player_name: String,
    team: i64,
    win: i64,
}

impl RoundRow {
    fn into_round(self) -> Option<Round> {
        let faction = Faction::from_team(self.team)?;
        Some(Round {
            round_id: self.round_id,
            player_id: self.player_id,
            skill: self.skill,
            player_name: self.player_name,
            faction,
            won: self.win != 0,
        })
    }
}

/// Round history read from MySQL
#[derive(Debug, Clone)]
pub struct MySqlHistoryStore {
    pool: MySqlPool,
    first_round_id: i64,
}

impl MySqlHistoryStore {
    /// Create a store with a lazily connected pool; nothing is contacted until
    /// the first query
    pub fn new(config: &AppConfig) -> Self {
        let settings = &config.database;
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(config.database_connect_timeout())
            .connect_lazy_with(connect_options(settings));

        info!(
            "Round history: mysql://{}@{}:{}/{} (rounds after {})",
            settings.user, settings.host, settings.port, settings.database, settings.first_round_id
        );

        Self {
            pool,
            first_round_id: settings.first_round_id,
        }
    }
}

fn connect_options(settings: &DatabaseSettings) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.database)
}

#[async_trait]
impl HistoryStore for MySqlHistoryStore {
    async fn load_rounds(&self) -> Result<Vec<Round>> {
        let rows: Vec<RoundRow> = sqlx::query_as(ROUNDS_QUERY)
            .bind(self.first_round_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ShuffleError::HistoryUnavailable {
                message: e.to_string(),
            })?;

        let total = rows.len();
        let rounds: Vec<Round> = rows.into_iter().filter_map(RoundRow::into_round).collect();
        if rounds.len() != total {
            warn!(
                "Skipped {} rounds with an unknown team",
                total - rounds.len()
            );
        }

        debug!("Loaded {} rounds from MySQL", rounds.len());
        Ok(rounds)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| ShuffleError::HistoryUnavailable {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let row = RoundRow {
            round_id: 2000,
            player_id: 123,
            skill: 1800,
            player_name: "gorge".to_string(),
            team: 2,
            win: 1,
        };
        let round = row.into_round().unwrap();

        assert_eq!(round.faction, Faction::Alien);
        assert!(round.won);
        assert_eq!(round.player_id, 123);
    }

    #[test]
    fn test_spectator_row_is_dropped() {
        let row = RoundRow {
            round_id: 2000,
            player_id: 123,
            skill: 1800,
            player_name: "spec".to_string(),
            team: 0,
            win: 0,
        };
        assert!(row.into_round().is_none());
    }

    #[tokio::test]
    async fn test_lazy_pool_does_not_connect() {
        let mut config = AppConfig::default();
        config.database.host = "127.0.0.1".to_string();
        config.database.port = 1;

        // Construction must succeed without a reachable server
        let store = MySqlHistoryStore::new(&config);
        assert_eq!(store.first_round_id, 1933);
    }
}
