//! Settings Repository
//!
//! The settings aggregate lives in a single row as one JSON document.
//! This core only reads it; the admin surface that writes it is elsewhere.

use super::RepoResult;
use shared::models::StoreSettings;
use sqlx::SqlitePool;

/// Read the settings aggregate
///
/// A missing row or an unreadable document degrades to defaults — settings
/// problems must never take the order path down.
pub async fn read(pool: &SqlitePool) -> RepoResult<StoreSettings> {
    let data: Option<String> = sqlx::query_scalar("SELECT data FROM settings WHERE id = 1")
        .fetch_optional(pool)
        .await?;

    let settings = match data {
        Some(doc) => serde_json::from_str(&doc).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Settings document unreadable, using defaults");
            StoreSettings::default()
        }),
        None => StoreSettings::default(),
    };
    Ok(settings)
}

#[cfg(test)]
pub async fn write(pool: &SqlitePool, settings: &StoreSettings) -> RepoResult<()> {
    let doc = serde_json::to_string(settings).expect("settings serialize");
    sqlx::query("UPDATE settings SET data = ?1 WHERE id = 1")
        .bind(doc)
        .execute(pool)
        .await?;
    Ok(())
}
