//! Metrics and monitoring for the skill-shuffle service
//!
//! This module provides Prometheus metrics collection for shuffle requests,
//! history refreshes and player lookups.

pub mod collector;

pub use collector::{
    HistoryMetrics, MetricsCollector, ServiceMetrics, ShuffleMetrics, ShuffleOutcome,
};
