//! Recent Events Refresh Task
//!
//! Warms the recent events view at startup, then rebuilds it on a fixed
//! period whether or not anything was written, since an event moves from
//! upcoming to past purely with the clock.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheCoordinator;

/// Spawns the refresh task for `coordinator`.
///
/// A failed rebuild is logged and retried on the next tick only.
pub fn spawn_refresh_task(coordinator: Weak<CacheCoordinator>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Warming recent events cache");
        if !refresh_once(&coordinator, "initial warm-up").await {
            return;
        }

        loop {
            tokio::time::sleep(interval).await;
            debug!("Performing scheduled cache refresh");
            if !refresh_once(&coordinator, "scheduled refresh").await {
                break;
            }
        }
    })
}

/// Returns false once the coordinator is gone.
async fn refresh_once(coordinator: &Weak<CacheCoordinator>, reason: &str) -> bool {
    let Some(coordinator) = coordinator.upgrade() else {
        debug!("Coordinator dropped, refresh task exiting");
        return false;
    };

    match coordinator.refresh_recent().await {
        Ok(recent) => debug!("{}: {} recent events cached", reason, recent.events.len()),
        Err(err) => warn!("{} failed, retrying next tick: {}", reason, err),
    }
    true
}
