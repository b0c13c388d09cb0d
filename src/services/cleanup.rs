use std::time::Duration;

use chrono::Utc;

use crate::config::DbPool;
use crate::modules::auth::crud::TokenCrud;

const SWEEP_INTERVAL_SECS: u64 = 3600;

/// Background sweeper for expired verification codes. Lookups already
/// filter on expiry, so this only reclaims storage.
pub struct CleanupEngine {
    db: DbPool,
    interval: Duration,
}

impl CleanupEngine {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            interval: Duration::from_secs(SWEEP_INTERVAL_SECS),
        }
    }

    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.interval);
        let tokens = TokenCrud::new(self.db.clone());

        loop {
            interval.tick().await;

            match tokens.delete_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(swept) => tracing::info!(swept, "removed expired verification tokens"),
                Err(e) => tracing::error!(error = %e, "verification token sweep failed"),
            }
        }
    }
}
