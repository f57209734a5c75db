//! Periodic flagging of equipment with overdue maintenance.
//!
//! In-service items that have a pending maintenance task past its due date
//! are moved to `maintenance_due`. Completing the task moves them back.

use std::time::Duration;

use chrono::Utc;
use fathom_db::repositories::EquipmentRepo;
use fathom_db::DbPool;
use tokio_util::sync::CancellationToken;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the sweep loop until `cancel` is triggered. The first sweep runs
/// immediately.
pub async fn run(pool: DbPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Maintenance sweeper started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Maintenance sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                sweep_once(&pool).await;
            }
        }
    }
}

/// One sweep. Errors are logged, never propagated.
pub async fn sweep_once(pool: &DbPool) -> u64 {
    match EquipmentRepo::flag_overdue(pool, Utc::now()).await {
        Ok(flagged) => {
            if flagged > 0 {
                tracing::info!(flagged, "Maintenance sweeper: items now due for maintenance");
            } else {
                tracing::debug!("Maintenance sweeper: nothing overdue");
            }
            flagged
        }
        Err(e) => {
            tracing::error!(error = %e, "Maintenance sweeper: sweep failed");
            0
        }
    }
}
