//! Settings Service
//!
//! Hands out point-in-time snapshots of the store settings aggregate.
//! Pricing and notification code receive a snapshot as an argument — they
//! never read ambient global state, which keeps them independently
//! testable.

use crate::db::repository::settings as settings_repo;
use shared::models::StoreSettings;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Settings snapshot provider
///
/// Reads are fresh per call; the last good snapshot is kept so a settings
/// read failure degrades to stale configuration instead of failing the
/// caller.
#[derive(Clone)]
pub struct SettingsService {
    pool: SqlitePool,
    last_good: Arc<RwLock<StoreSettings>>,
}

impl SettingsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            last_good: Arc::new(RwLock::new(StoreSettings::default())),
        }
    }

    /// Current settings snapshot
    pub async fn snapshot(&self) -> StoreSettings {
        match settings_repo::read(&self.pool).await {
            Ok(settings) => {
                *self.last_good.write().await = settings.clone();
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "Settings read failed, using last good snapshot");
                self.last_good.read().await.clone()
            }
        }
    }
}
