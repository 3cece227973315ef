//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the skill-shuffle service
//! using Prometheus metrics.

use crate::balance::SelectionPolicy;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec,
    Opts, Registry,
};
use std::sync::Arc;
use std::time::Duration;

/// How a shuffle request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleOutcome {
    Success,
    InvalidInput,
    Error,
}

impl ShuffleOutcome {
    fn as_label(&self) -> &'static str {
        match self {
            ShuffleOutcome::Success => "success",
            ShuffleOutcome::InvalidInput => "invalid_input",
            ShuffleOutcome::Error => "error",
        }
    }
}

/// Main metrics collector for the shuffle service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Shuffle-related metrics
    shuffle_metrics: ShuffleMetrics,

    /// Round history metrics
    history_metrics: HistoryMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,

    /// Player lookups by whether the player had history
    pub player_lookups_total: IntCounterVec,
}

/// Shuffle-related metrics
#[derive(Clone)]
pub struct ShuffleMetrics {
    /// Shuffle requests by outcome
    pub requests_total: IntCounterVec,

    /// Selections by winning policy
    pub selections_total: IntCounterVec,

    /// Candidate splits scored
    pub candidates_evaluated_total: IntCounter,

    /// Seated roster sizes
    pub roster_size: Histogram,

    /// End-to-end shuffle time
    pub duration_seconds: HistogramVec,
}

/// Round history metrics
#[derive(Clone)]
pub struct HistoryMetrics {
    /// Rounds in the most recent snapshot
    pub rounds_loaded: IntGauge,

    /// Players in the most recent snapshot
    pub players_known: IntGauge,

    /// Failed history loads
    pub refresh_failures_total: IntCounter,

    /// History load and model build time
    pub refresh_duration_seconds: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let shuffle_metrics = ShuffleMetrics::new(&registry)?;
        let history_metrics = HistoryMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            shuffle_metrics,
            history_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    pub fn shuffle(&self) -> &ShuffleMetrics {
        &self.shuffle_metrics
    }

    pub fn history(&self) -> &HistoryMetrics {
        &self.history_metrics
    }

    /// Record a finished shuffle request
    pub fn record_shuffle(&self, outcome: ShuffleOutcome, duration: Duration) {
        let label = outcome.as_label();

        self.shuffle_metrics
            .requests_total
            .with_label_values(&[label])
            .inc();

        self.shuffle_metrics
            .duration_seconds
            .with_label_values(&[label])
            .observe(duration.as_secs_f64());
    }

    /// Record the work done by a completed selection
    pub fn record_selection(&self, policy: SelectionPolicy, seated: usize, evaluated: u64) {
        let policy = match policy {
            SelectionPolicy::Fairness => "fairness",
            SelectionPolicy::Parity => "parity",
        };

        self.shuffle_metrics
            .selections_total
            .with_label_values(&[policy])
            .inc();

        self.shuffle_metrics
            .candidates_evaluated_total
            .inc_by(evaluated);

        self.shuffle_metrics.roster_size.observe(seated as f64);
    }

    /// Record a successful history refresh
    pub fn record_refresh(&self, rounds: usize, players: usize, duration: Duration) {
        self.history_metrics.rounds_loaded.set(rounds as i64);
        self.history_metrics.players_known.set(players as i64);
        self.history_metrics
            .refresh_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Record a failed history refresh
    pub fn record_refresh_failure(&self) {
        self.history_metrics.refresh_failures_total.inc();
    }

    /// Record a single player lookup
    pub fn record_player_lookup(&self, known: bool) {
        let label = if known { "known" } else { "new" };
        self.service_metrics
            .player_lookups_total
            .with_label_values(&[label])
            .inc();
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let health_status = IntGauge::new(
            "skill_shuffle_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("skill_shuffle_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        let player_lookups_total = IntCounterVec::new(
            Opts::new(
                "skill_shuffle_player_lookups_total",
                "Total single player skill lookups",
            ),
            &["player"],
        )?;
        registry.register(Box::new(player_lookups_total.clone()))?;

        Ok(Self {
            health_status,
            component_health,
            player_lookups_total,
        })
    }
}

impl ShuffleMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("skill_shuffle_requests_total", "Total shuffle requests"),
            &["outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let selections_total = IntCounterVec::new(
            Opts::new(
                "skill_shuffle_selections_total",
                "Completed selections by winning policy",
            ),
            &["policy"],
        )?;
        registry.register(Box::new(selections_total.clone()))?;

        let candidates_evaluated_total = IntCounter::new(
            "skill_shuffle_candidates_evaluated_total",
            "Total candidate splits scored",
        )?;
        registry.register(Box::new(candidates_evaluated_total.clone()))?;

        let roster_size = Histogram::with_opts(
            HistogramOpts::new("skill_shuffle_roster_size", "Seated roster size per shuffle")
                .buckets(vec![2.0, 4.0, 8.0, 12.0, 16.0, 20.0, 24.0, 28.0, 32.0]),
        )?;
        registry.register(Box::new(roster_size.clone()))?;

        let duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "skill_shuffle_duration_seconds",
                "Shuffle request processing time",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
            &["outcome"],
        )?;
        registry.register(Box::new(duration_seconds.clone()))?;

        Ok(Self {
            requests_total,
            selections_total,
            candidates_evaluated_total,
            roster_size,
            duration_seconds,
        })
    }
}

impl HistoryMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let rounds_loaded = IntGauge::new(
            "skill_shuffle_rounds_loaded",
            "Rounds in the most recent skill snapshot",
        )?;
        registry.register(Box::new(rounds_loaded.clone()))?;

        let players_known = IntGauge::new(
            "skill_shuffle_players_known",
            "Players in the most recent skill snapshot",
        )?;
        registry.register(Box::new(players_known.clone()))?;

        let refresh_failures_total = IntCounter::new(
            "skill_shuffle_refresh_failures_total",
            "Total failed round history loads",
        )?;
        registry.register(Box::new(refresh_failures_total.clone()))?;

        let refresh_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "skill_shuffle_refresh_duration_seconds",
            "Round history load and skill model build time",
        ))?;
        registry.register(Box::new(refresh_duration_seconds.clone()))?;

        Ok(Self {
            rounds_loaded,
            players_known,
            refresh_failures_total,
            refresh_duration_seconds,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        let _service = collector.service();
        let _shuffle = collector.shuffle();
        let _history = collector.history();
    }

    #[test]
    fn test_shuffle_recording() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        collector.record_shuffle(ShuffleOutcome::Success, Duration::from_millis(12));
        collector.record_shuffle(ShuffleOutcome::InvalidInput, Duration::from_micros(5));
        collector.record_selection(SelectionPolicy::Fairness, 12, 924);

        assert_eq!(
            collector
                .shuffle()
                .requests_total
                .with_label_values(&["success"])
                .get(),
            1
        );
        assert_eq!(collector.shuffle().candidates_evaluated_total.get(), 924);
    }

    #[test]
    fn test_refresh_recording() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        collector.record_refresh(5000, 120, Duration::from_millis(40));
        collector.record_refresh_failure();

        assert_eq!(collector.history().rounds_loaded.get(), 5000);
        assert_eq!(collector.history().players_known.get(), 120);
        assert_eq!(collector.history().refresh_failures_total.get(), 1);
    }

    #[test]
    fn test_health_status_updates() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        collector.update_health_status(2); // Healthy
        collector.update_component_health("history_store", true);
        collector.record_player_lookup(false);

        assert_eq!(collector.service().health_status.get(), 2);
    }
}
