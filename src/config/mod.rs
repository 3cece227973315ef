//! Configuration management for the skill-shuffle service
//!
//! This module handles all configuration loading from environment variables
//! and TOML files, validation, and default values for the shuffle service.

pub mod app;
pub mod balance;
pub mod skill;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, DatabaseSettings, ServiceSettings};
pub use balance::{BalanceSettings, OddRosterPolicy, ROSTER_SIZE_CEILING};
pub use skill::{RepeatPolicy, SkillSettings};
