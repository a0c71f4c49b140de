//! Background workers

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::application::services::WorldMapService;

/// Periodically remove placements whose gathering duration has elapsed
///
/// Runs until the task is aborted. Failed sweeps are logged and retried on
/// the next tick.
pub async fn placement_expiry_worker(service: Arc<dyn WorldMapService>, interval: Duration) {
    tracing::info!("Starting placement expiry worker, sweeping every {:?}", interval);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match service.expire_placements(Utc::now()).await {
            Ok(0) => {}
            Ok(expired) => tracing::debug!("Expiry sweep removed {} placements", expired),
            Err(e) => tracing::error!("Placement expiry sweep failed: {:#}", e),
        }
    }
}
