//! Florb Engine service entry point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use florb_engine::infrastructure::config::AppConfig;
use florb_engine::infrastructure::state::AppState;
use florb_engine::infrastructure::workers::placement_expiry_worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "florb_engine=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Florb Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Database: {}", config.database_url);
    tracing::info!("  Base images: {}", config.base_image_dir.display());
    match &config.catalog_path {
        Some(path) => tracing::info!("  Catalog: {}", path.display()),
        None => tracing::info!("  Catalog: built-in standard"),
    }

    // Initialize application state
    let state = Arc::new(AppState::new(config).await?);
    tracing::info!("Application state initialized");

    let seeded = state.ensure_resource_nodes().await?;
    if seeded > 0 {
        tracing::info!("Seeded world map with {} resource nodes", seeded);
    }

    // Start background workers
    let expiry_worker = tokio::spawn(placement_expiry_worker(
        state.world_map_service.clone(),
        state.config.world_map.expiry_sweep_interval,
    ));

    // Wait for shutdown signal (Ctrl+C)
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping workers...");
    expiry_worker.abort();
    state.repository.pool().close().await;
    tracing::info!("Workers stopped");

    Ok(())
}
