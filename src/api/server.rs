//! HTTP server for the shuffle API, health checks and Prometheus metrics

use crate::api::handlers::{
    alive_handler, health_handler, metrics_handler, player_handler, ready_handler, root_handler,
    shuffle_handler,
};
use crate::config::AppConfig;
use crate::service::AppState;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Server bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Host to bind to (typically "0.0.0.0" for all interfaces)
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl From<&AppConfig> for ServerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            port: config.service.http_port,
            host: config.service.host.clone(),
        }
    }
}

/// Build the router for every endpoint
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/shuffle", post(shuffle_handler))
        .route("/player/scoreboard_data", post(player_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/alive", get(alive_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// HTTP server with broadcast-driven graceful shutdown
pub struct ShuffleServer {
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ShuffleServer {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            state,
            shutdown_tx,
        }
    }

    /// Bind and serve until `stop` is called
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid server address")?;

        let app = create_router(self.state.clone());
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("Listening on http://{}", addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("Server shutdown signal received");
            })
            .await?;

        info!("Server stopped");
        Ok(())
    }

    /// Signal the server to stop accepting connections
    pub fn stop(&self) {
        info!("Stopping server...");

        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to server: {}", e);
        }
    }
}
