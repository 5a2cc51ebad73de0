//! Notification Log Repository
//!
//! Best-effort record of every notification attempt. Callers treat a
//! failed write as a log line, never as an error.

use super::RepoResult;
use sqlx::SqlitePool;

/// One notification attempt
#[derive(Debug, Clone)]
pub struct NotificationRecord {
    pub recipient_number: Option<String>,
    /// Template name + rendered parameters, serialized for auditing
    pub message_content: Option<String>,
    /// "success" | "failed" | "skipped"
    pub status: String,
    pub reason: Option<String>,
    pub order_id: Option<String>,
    pub user_id: Option<String>,
    /// e.g. "new_order_customer", "status_update_shipped"
    pub message_type: String,
}

pub async fn insert(pool: &SqlitePool, record: &NotificationRecord) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO notification_log \
         (recipient_number, message_content, status, reason, order_id, user_id, message_type, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(&record.recipient_number)
    .bind(&record.message_content)
    .bind(&record.status)
    .bind(&record.reason)
    .bind(&record.order_id)
    .bind(&record.user_id)
    .bind(&record.message_type)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
pub async fn count_for_order(pool: &SqlitePool, order_id: &str) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM notification_log WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
