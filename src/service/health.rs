//! Health check endpoints and monitoring
//!
//! This module provides health check functionality for the skill-shuffle
//! service, including readiness and liveness probes.

use crate::service::app::AppState;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Gauge value exported to Prometheus
    pub fn as_gauge(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 2,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 0,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    pub stats: ServiceStats,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    pub name: String,
    pub status: HealthStatus,
    /// Error message if unhealthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Service statistics for health reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStats {
    /// Rounds in the most recent skill snapshot
    pub rounds_loaded: i64,
    /// Players in the most recent skill snapshot
    pub players_known: i64,
    /// Successful shuffles since service start
    pub shuffles_completed: u64,
    /// Failed history loads since service start
    pub refresh_failures: u64,
}

impl HealthCheck {
    /// Perform a comprehensive health check of the service
    pub async fn check(app_state: Arc<AppState>) -> Result<Self> {
        let mut checks = Vec::new();

        let service_check = Self::check_service_running(&app_state).await;
        let mut overall_status = service_check.status.clone();
        checks.push(service_check);

        // An unreachable store degrades the service; it does not make it unhealthy
        let store_check = Self::check_history_store(&app_state).await;
        if store_check.status != HealthStatus::Healthy && overall_status == HealthStatus::Healthy {
            overall_status = HealthStatus::Degraded;
        }
        checks.push(store_check);

        let metrics = app_state.metrics();
        metrics.update_health_status(overall_status.as_gauge());
        for check in &checks {
            metrics.update_component_health(&check.name, check.status == HealthStatus::Healthy);
        }

        Ok(HealthCheck {
            status: overall_status,
            service: app_state.config().service.name.clone(),
            version: crate::VERSION.to_string(),
            timestamp: chrono::Utc::now(),
            checks,
            stats: Self::gather_service_stats(&app_state),
        })
    }

    /// Simple liveness check - just verify service is running
    pub async fn liveness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if app_state.is_running().await {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy)
        }
    }

    /// Readiness check - the service must be running and the round history
    /// reachable
    pub async fn readiness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if !app_state.is_running().await {
            return Ok(HealthStatus::Unhealthy);
        }

        Ok(Self::check_history_store(&app_state).await.status)
    }

    async fn check_service_running(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = if app_state.is_running().await {
            (HealthStatus::Healthy, None)
        } else {
            (
                HealthStatus::Unhealthy,
                Some("Service is not running".to_string()),
            )
        };

        ComponentCheck {
            name: "service_running".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn check_history_store(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = match app_state.shuffle_service().ping_store().await {
            Ok(()) => (HealthStatus::Healthy, None),
            Err(e) => {
                warn!("History store ping failed: {:#}", e);
                (HealthStatus::Unhealthy, Some(format!("{:#}", e)))
            }
        };

        ComponentCheck {
            name: "history_store".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn gather_service_stats(app_state: &AppState) -> ServiceStats {
        let metrics = app_state.metrics();

        ServiceStats {
            rounds_loaded: metrics.history().rounds_loaded.get(),
            players_known: metrics.history().players_known.get(),
            shuffles_completed: metrics
                .shuffle()
                .requests_total
                .with_label_values(&["success"])
                .get(),
            refresh_failures: metrics.history().refresh_failures_total.get(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize health check: {}", e))
    }
}
