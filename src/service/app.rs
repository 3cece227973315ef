//! Main application state and service coordination
//!
//! This module contains the production AppState that wires the round history
//! store, the shuffle service and metrics together.

use crate::config::{validate_config, AppConfig};
use crate::history::{HistoryStore, MySqlHistoryStore};
use crate::metrics::MetricsCollector;
use crate::service::shuffle::ShuffleService;
use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Shuffle and player skill computations
    shuffle_service: Arc<ShuffleService>,

    /// Metrics for monitoring and health checks
    metrics: Arc<MetricsCollector>,

    /// Service status
    is_running: Arc<RwLock<bool>>,
}

impl AppState {
    /// Initialize the application against the configured MySQL database.
    /// Must be called from within a tokio runtime.
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing skill-shuffle service");
        info!(
            "Configuration: service={}, database={}@{}:{}/{}",
            config.service.name,
            config.database.user,
            config.database.host,
            config.database.port,
            config.database.database
        );

        let store: Arc<dyn HistoryStore> = Arc::new(MySqlHistoryStore::new(&config));
        Self::with_store(config, store)
    }

    /// Initialize the application with an explicit history store
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn HistoryStore>,
    ) -> Result<Self, ServiceError> {
        validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: e.to_string(),
        })?;

        let metrics = Arc::new(
            MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                message: format!("Failed to create metrics collector: {}", e),
            })?,
        );

        let shuffle_service =
            Arc::new(ShuffleService::from_config(store, &config).with_metrics(metrics.clone()));

        Ok(Self {
            config,
            shuffle_service,
            metrics,
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    /// Start the service: the round history must load once before requests
    /// are accepted
    pub async fn start(&self) -> Result<(), ServiceError> {
        info!("Loading round history...");

        let snapshot = self.shuffle_service.refresh().await.map_err(|e| {
            error!("Initial round history load failed: {:#}", e);
            ServiceError::Initialization {
                message: format!("Failed to load round history: {:#}", e),
            }
        })?;

        info!(
            "Round history loaded: {} rounds, {} players",
            snapshot.rounds_loaded(),
            snapshot.len()
        );

        *self.is_running.write().await = true;
        info!("Service started");
        Ok(())
    }

    /// Stop accepting work
    pub async fn stop(&self) {
        info!("Stopping skill-shuffle service");
        *self.is_running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn shuffle_service(&self) -> Arc<ShuffleService> {
        self.shuffle_service.clone()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }
}
