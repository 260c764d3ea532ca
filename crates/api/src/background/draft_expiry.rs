//! Periodic purge of expired booking sessions.
//!
//! Expired rows are already invisible to the draft store; this job only
//! reclaims the space. Runs on a fixed interval using `tokio::time::interval`.

use std::time::Duration;

use bookings_db::repositories::BookingSessionRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the purge runs.
const PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the draft expiry loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = PURGE_INTERVAL.as_secs(),
        "Draft expiry job started"
    );

    let mut interval = tokio::time::interval(PURGE_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Draft expiry job stopping");
                break;
            }
            _ = interval.tick() => {
                match BookingSessionRepo::delete_expired(&pool).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Draft expiry: purged expired sessions");
                    }
                    Ok(_) => {
                        tracing::debug!("Draft expiry: nothing to purge");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Draft expiry: purge failed");
                    }
                }
            }
        }
    }
}
