//! Main entry point for the Skill Shuffle service
//!
//! Loads configuration, verifies the round history can be read, then serves
//! the shuffle API until SIGINT or SIGTERM.

use anyhow::Result;
use clap::Parser;
use skill_shuffle::api::{ServerConfig, ShuffleServer};
use skill_shuffle::config::{validate_config, AppConfig};
use skill_shuffle::service::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Skill Shuffle - balanced team shuffles from NS2 round history
#[derive(Parser)]
#[command(
    name = "skill-shuffle",
    version,
    about = "Balances NS2 rosters into two teams using per-faction player skill",
    long_about = "Skill Shuffle reads round history from the NS2+ statistics database, \
                 adjusts each player's rating per faction by recent win rate, and splits \
                 a roster into the two teams whose skill distributions match most closely."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// HTTP port override
    #[arg(long, value_name = "PORT", help = "Override HTTP server port")]
    http_port: Option<u16>,

    /// MySQL host override
    #[arg(long, value_name = "HOST[:PORT]", help = "Override MySQL host")]
    mysql_host: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and exit without starting service"
    )]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("Skill Shuffle Service");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   HTTP: {}:{}", config.service.host, config.service.http_port);
    info!(
        "   MySQL: {}:{}/{} (rounds after {})",
        config.database.host,
        config.database.port,
        config.database.database,
        config.database.first_round_id
    );
    info!(
        "   Skill: window {}, exponent {}, repeat {}",
        config.skill.recency_window, config.skill.confidence_exponent, config.skill.repeat
    );
    info!(
        "   Balance: cutoff {}, max roster {}, odd rosters {:?}",
        config.balance.score_cutoff, config.balance.max_roster_size, config.balance.odd_roster
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(http_port) = args.http_port {
        config.service.http_port = http_port;
    }

    if let Some(mysql_host) = &args.mysql_host {
        config.database.set_address(mysql_host)?;
    }

    validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // CLI args override environment/config file
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without starting service");
        return Ok(());
    }

    display_startup_banner(&config);

    info!("Initializing service components...");
    let app_state = match AppState::new(config.clone()) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app_state.start().await {
        error!("Failed to start service: {}", e);
        std::process::exit(1);
    }

    let server = Arc::new(ShuffleServer::new(
        ServerConfig::from(&config),
        app_state.clone(),
    ));
    let mut server_task = {
        let server = server.clone();
        tokio::spawn(async move { server.start().await })
    };

    info!("Skill Shuffle Service is running");

    tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("Shutdown signal received, beginning graceful shutdown...");
        }
        result = &mut server_task => {
            match result {
                Ok(Ok(())) => warn!("Server exited unexpectedly"),
                Ok(Err(e)) => error!("Server failed: {:#}", e),
                Err(e) => error!("Server task panicked: {}", e),
            }
            app_state.stop().await;
            std::process::exit(1);
        }
    }

    app_state.stop().await;
    server.stop();

    // In-flight requests get the configured grace period
    match tokio::time::timeout(config.shutdown_timeout(), server_task).await {
        Ok(Ok(Ok(()))) => info!("Graceful shutdown completed successfully"),
        Ok(Ok(Err(e))) => error!("Server failed during shutdown: {:#}", e),
        Ok(Err(e)) => error!("Server task panicked: {}", e),
        Err(_) => warn!("Shutdown timeout exceeded, forcing exit"),
    }

    info!("Skill Shuffle Service stopped");
    Ok(())
}
