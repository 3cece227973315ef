//! Request handlers for the shuffle, player and monitoring endpoints

use crate::service::{AppState, HealthCheck, HealthStatus};
use crate::types::{PlayerId, ShuffleRequest, ShuffleResult};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Shuffle form as posted by game servers: both fields hold JSON arrays
#[derive(Debug, Deserialize)]
pub struct ShuffleForm {
    pub ns2ids: String,
    pub hiveskills: String,
}

impl ShuffleForm {
    /// Decode the JSON array fields into a request
    pub fn into_request(self) -> Result<ShuffleRequest, String> {
        let player_ids: Vec<PlayerId> = serde_json::from_str(&self.ns2ids)
            .map_err(|e| format!("Invalid ns2ids: {}", e))?;
        let ratings: Vec<i64> = serde_json::from_str(&self.hiveskills)
            .map_err(|e| format!("Invalid hiveskills: {}", e))?;

        Ok(ShuffleRequest {
            player_ids,
            ratings,
        })
    }
}

/// Single player lookup form
#[derive(Debug, Deserialize)]
pub struct PlayerForm {
    pub ns2id: PlayerId,
    pub hiveskill: i64,
}

fn service_unavailable(message: String) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "success": false,
            "message": message,
        })),
    )
        .into_response()
}

/// Balance a roster into two teams
pub async fn shuffle_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ShuffleForm>,
) -> Response {
    let request = match form.into_request() {
        Ok(request) => request,
        Err(message) => {
            warn!("Malformed shuffle request: {}", message);
            return (StatusCode::BAD_REQUEST, Json(ShuffleResult::failure(message)))
                .into_response();
        }
    };

    match state.shuffle_service().shuffle(request).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            error!("Shuffle failed: {:#}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ShuffleResult::failure(format!("Shuffle failed: {:#}", e))),
            )
                .into_response()
        }
    }
}

/// Faction-adjusted skills for one player
pub async fn player_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PlayerForm>,
) -> Response {
    match state
        .shuffle_service()
        .player_skill(form.ns2id, form.hiveskill)
        .await
    {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            error!("Player lookup failed for {}: {:#}", form.ns2id, e);
            service_unavailable(format!("Player lookup failed: {:#}", e))
        }
    }
}

/// Root endpoint handler - shows service information
pub async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "service": "skill-shuffle",
        "version": crate::VERSION,
        "endpoints": [
            "/shuffle",
            "/player/scoreboard_data",
            "/health",
            "/ready",
            "/alive",
            "/metrics"
        ]
    }))
}

/// Full health report
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Health check requested");

    match HealthCheck::check(state).await {
        Ok(health) => {
            let status = match health.status {
                HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
                HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
            };
            (status, Json(health)).into_response()
        }
        Err(e) => {
            error!("Health check failed: {:#}", e);
            service_unavailable(format!("Health check failed: {:#}", e))
        }
    }
}

/// Readiness check endpoint handler
pub async fn ready_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Readiness check requested");

    match HealthCheck::readiness_check(state).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Ready"),
        Ok(HealthStatus::Degraded) => (StatusCode::OK, "Degraded but ready"),
        Ok(HealthStatus::Unhealthy) => (StatusCode::SERVICE_UNAVAILABLE, "Not ready"),
        Err(e) => {
            error!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Not ready")
        }
    }
}

/// Liveness check endpoint handler
pub async fn alive_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Liveness check requested");

    match HealthCheck::liveness_check(state).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Alive"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "Not alive"),
    }
}

/// Prometheus metrics endpoint handler
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Metrics endpoint requested");

    let metric_families = state.metrics().registry().gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(metrics_output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            metrics_output,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
                .into_response()
        }
    }
}
