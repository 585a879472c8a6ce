//! Augur service binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `augur-config.yaml` (or the path given as the
//!    first argument), with environment overrides
//! 2. Initialize structured logging (tracing)
//! 3. Build the API client with the operator's User-Agent
//! 4. Load the regions dump and founderless list into a session
//! 5. Start the tracker and run until Ctrl-C
//! 6. Stop the tracker and log the final calibration

use std::path::PathBuf;

use anyhow::Context as _;
use augur_core::config::AugurConfig;
use augur_engine::Session;
use augur_feed::NsClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "augur-config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let found = config_path.exists();
    let config = if found {
        AugurConfig::from_file(&config_path)
    } else {
        AugurConfig::parse("{}")
    }
    .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "augur starting");
    if found {
        info!(path = %config_path.display(), "configuration loaded");
    } else {
        info!("config file not found, using defaults and environment");
    }
    info!(
        operator = %config.operator.name,
        api = %config.api.base_url,
        dump_path = %config.catalog.dump_path.display(),
        major_seconds = config.model.major_seconds,
        minor_seconds = config.model.minor_seconds,
        "configuration resolved"
    );

    let client = NsClient::new(&config.api, &config.operator.name)
        .context("building API client")?;
    let session = Session::load(
        client,
        config.catalog.dump_path.clone(),
        config.model.durations(),
    )
    .await
    .context("loading session")?;

    session.start().await;
    info!(
        status = %serde_json::to_string(&session.status().await)?,
        "augur running, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    session.stop().await;
    info!(
        status = %serde_json::to_string(&session.status().await)?,
        "augur shutdown complete"
    );
    Ok(())
}
