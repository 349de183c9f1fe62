//! Application setup and initialization
//!
//! Everything `main` needs to go from configuration to a running router.

pub mod database;
pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use geolayers_core::Config;
use geolayers_db::GeoDataRepository;
use geolayers_infra::LogFormat;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    geolayers_infra::init_telemetry(
        LogFormat::from_json_flag(config.json_logs()),
        config.environment(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let store = Arc::new(GeoDataRepository::new(pool));

    let state = Arc::new(AppState::new(config.clone(), store));

    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
