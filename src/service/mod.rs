//! Service layer for the skill-shuffle service
//!
//! This module contains the shuffle orchestration, the application state that
//! wires it to the round history, and health reporting.

pub mod app;
pub mod health;
pub mod shuffle;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
pub use shuffle::{Seating, ShuffleService};
