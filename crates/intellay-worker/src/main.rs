//! Intellay worker binary — the main entry point.
//!
//! Loads configuration, initializes structured logging, prewarms the VAD
//! model, starts the agent session for the configured room, and shuts the
//! session down gracefully on SIGTERM/SIGINT, logging the usage summary.

use intellay_agent::VadOptions;
use intellay_worker::{config, RoomDirectory, RoomJob};
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("INTELLAY_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the worker cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    if let Some(path) = selected_config_path {
        if !std::path::Path::new(path).exists() {
            tracing::info!(path, "config file not found, using defaults");
        }
    }

    // The VAD model is shared by every session this worker runs.
    let vad = VadOptions::prewarm();

    let directory = RoomDirectory::new(config.livekit.clone());

    tracing::info!(
        url = directory.url(),
        room = %config.agent.room,
        identity = %config.agent.identity,
        "starting intellay worker"
    );

    let job = RoomJob::start(&directory, &config, vad)
        .await
        .expect("failed to start agent session — check livekit settings in config");

    shutdown_signal().await;

    let summary = job.shutdown().await;
    tracing::info!(usage = %summary, "intellay worker shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
