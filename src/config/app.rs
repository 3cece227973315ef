//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! skill-shuffle service, including environment variable loading, TOML file
//! loading and validation.

use crate::config::balance::{BalanceSettings, ROSTER_SIZE_CEILING};
use crate::config::skill::{RepeatPolicy, SkillSettings};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub database: DatabaseSettings,
    pub skill: SkillSettings,
    pub balance: BalanceSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Interface the HTTP server binds to
    pub host: String,
    /// Port for the shuffle, health and metrics endpoints
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
    /// Maximum shuffles computed at the same time
    pub max_concurrent_operations: usize,
}

/// Round history database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Only rounds with an id strictly greater than this are loaded
    pub first_round_id: i64,
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "skill-shuffle".to_string(),
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            http_port: 3000,
            shutdown_timeout_seconds: 30,
            max_concurrent_operations: 4,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "ns2plus".to_string(),
            first_round_id: 1933,
            max_connections: 5,
            connect_timeout_seconds: 10,
        }
    }
}

impl DatabaseSettings {
    /// Apply a `host[:port]` address
    pub fn set_address(&mut self, address: &str) -> Result<()> {
        match address.split_once(':') {
            Some((host, port)) => {
                self.host = host.to_string();
                self.port = port
                    .parse()
                    .map_err(|_| anyhow!("Invalid database port in address: {}", address))?;
            }
            None => self.host = address.to_string(),
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(host) = env::var("HTTP_HOST") {
            self.service.host = host;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            self.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            self.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }
        if let Ok(max_ops) = env::var("MAX_CONCURRENT_OPERATIONS") {
            self.service.max_concurrent_operations = max_ops
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_CONCURRENT_OPERATIONS value: {}", max_ops))?;
        }

        // Database settings, named as the game server deployment exports them
        if let Ok(address) = env::var("MYSQL_HOST") {
            self.database.set_address(&address)?;
        }
        if let Ok(user) = env::var("MYSQL_USER") {
            self.database.user = user;
        }
        if let Ok(password) = env::var("MYSQL_PASS") {
            self.database.password = password;
        }
        if let Ok(database) = env::var("MYSQL_DB") {
            self.database.database = database;
        }
        if let Ok(first_round) = env::var("FIRST_ROUND_ID") {
            self.database.first_round_id = first_round
                .parse()
                .map_err(|_| anyhow!("Invalid FIRST_ROUND_ID value: {}", first_round))?;
        }
        if let Ok(max_connections) = env::var("MYSQL_MAX_CONNECTIONS") {
            self.database.max_connections = max_connections.parse().map_err(|_| {
                anyhow!("Invalid MYSQL_MAX_CONNECTIONS value: {}", max_connections)
            })?;
        }

        // Skill model settings
        if let Ok(window) = env::var("RECENCY_WINDOW") {
            self.skill.recency_window = window
                .parse()
                .map_err(|_| anyhow!("Invalid RECENCY_WINDOW value: {}", window))?;
        }
        if let Ok(exponent) = env::var("CONFIDENCE_EXPONENT") {
            self.skill.confidence_exponent = exponent
                .parse()
                .map_err(|_| anyhow!("Invalid CONFIDENCE_EXPONENT value: {}", exponent))?;
        }
        if let Ok(policy) = env::var("REPEAT_POLICY") {
            self.skill.repeat = policy.parse().map_err(|e: String| anyhow!(e))?;
        }

        // Balance settings
        if let Ok(cutoff) = env::var("SCORE_CUTOFF") {
            self.balance.score_cutoff = cutoff
                .parse()
                .map_err(|_| anyhow!("Invalid SCORE_CUTOFF value: {}", cutoff))?;
        }
        if let Ok(max_roster) = env::var("MAX_ROSTER_SIZE") {
            self.balance.max_roster_size = max_roster
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_ROSTER_SIZE value: {}", max_roster))?;
        }
        if let Ok(policy) = env::var("ODD_ROSTER_POLICY") {
            self.balance.odd_roster = policy.parse().map_err(|e: String| anyhow!(e))?;
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get database connect timeout as Duration
    pub fn database_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.database.connect_timeout_seconds)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate service settings
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }
    if config.service.max_concurrent_operations == 0 {
        return Err(anyhow!("Max concurrent operations must be greater than 0"));
    }

    // Validate database settings
    if config.database.host.is_empty() {
        return Err(anyhow!("Database host cannot be empty"));
    }
    if config.database.database.is_empty() {
        return Err(anyhow!("Database name cannot be empty"));
    }
    if config.database.max_connections == 0 {
        return Err(anyhow!("Database max connections must be greater than 0"));
    }

    // Validate skill settings
    if config.skill.recency_window == 0 {
        return Err(anyhow!("Recency window must be greater than 0"));
    }
    if config.skill.confidence_exponent == 0 {
        return Err(anyhow!("Confidence exponent must be greater than 0"));
    }
    if let RepeatPolicy::RecentWindow { rounds: 0 } = config.skill.repeat {
        return Err(anyhow!("Repeat window must be greater than 0"));
    }

    // Validate balance settings
    if config.balance.score_cutoff.is_nan() || config.balance.score_cutoff <= 0.0 {
        return Err(anyhow!("Score cutoff must be positive"));
    }
    if config.balance.max_roster_size < 2 || config.balance.max_roster_size > ROSTER_SIZE_CEILING {
        return Err(anyhow!(
            "Max roster size must be between 2 and {}",
            ROSTER_SIZE_CEILING
        ));
    }

    Ok(())
}
