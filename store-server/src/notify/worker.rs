//! Notification Worker
//!
//! Listens on the notification event channel and delivers messages through
//! the configured provider. Decoupled from the request path: order creation
//! and status updates publish and return; everything that can go wrong here
//! is absorbed, traced and recorded.

use super::dispatcher::{self, PlannedMessage};
use super::provider::{Provider, SendOutcome};
use super::NotificationEvent;
use crate::db::repository::notification_log::{self, NotificationRecord};
use crate::services::SettingsService;
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Order notification worker
pub struct NotificationWorker {
    pool: SqlitePool,
    settings: SettingsService,
    http: reqwest::Client,
}

impl NotificationWorker {
    pub fn new(pool: SqlitePool, settings: SettingsService) -> Self {
        Self {
            pool,
            settings,
            http: reqwest::Client::new(),
        }
    }

    /// Run the worker (blocks until the channel closes or shutdown fires)
    pub async fn run(
        self,
        mut event_rx: mpsc::Receiver<NotificationEvent>,
        shutdown: CancellationToken,
    ) {
        tracing::info!("Notification worker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Notification worker received shutdown signal");
                    break;
                }
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        tracing::info!("Notification channel closed, worker stopping");
                        break;
                    };
                    self.handle_event(event).await;
                }
            }
        }
    }

    /// Process one event end to end; never propagates failure
    async fn handle_event(&self, event: NotificationEvent) {
        let settings = self.settings.snapshot().await.whatsapp_notifications;

        if !settings.enable_order_notifications {
            tracing::debug!(
                order_id = %event.order_id(),
                "Order notifications disabled in settings, skipping"
            );
            return;
        }

        let messages = dispatcher::plan(&settings, &event);
        if messages.is_empty() {
            tracing::debug!(order_id = %event.order_id(), "No notifications to send for event");
            return;
        }

        let provider = Provider::from_settings(&settings, &self.http);

        for message in messages {
            let outcome = match &provider {
                Some(provider) => {
                    provider
                        .send_template(
                            &message.recipient,
                            &message.template_name,
                            &message.parameters,
                        )
                        .await
                }
                None => SendOutcome::failed("Provider 'none' is not supported"),
            };

            if outcome.success {
                tracing::info!(
                    order_id = %message.order_id,
                    message_type = %message.message_type,
                    "Notification delivered"
                );
            } else {
                tracing::warn!(
                    order_id = %message.order_id,
                    message_type = %message.message_type,
                    reason = %outcome.reason,
                    "Notification not delivered"
                );
            }

            self.record(&message, &outcome).await;
        }
    }

    /// Record the attempt; a failed write is only a log line
    async fn record(&self, message: &PlannedMessage, outcome: &SendOutcome) {
        let content = serde_json::json!({
            "template": message.template_name,
            "params": message.parameters,
        })
        .to_string();

        let status = if outcome.success { "success" } else { "failed" };
        let record = NotificationRecord {
            recipient_number: Some(message.recipient.clone()),
            message_content: Some(content),
            status: status.to_string(),
            reason: Some(outcome.reason.clone()),
            order_id: Some(message.order_id.clone()),
            user_id: message.user_id.clone(),
            message_type: message.message_type.clone(),
        };

        if let Err(e) = notification_log::insert(&self.pool, &record).await {
            tracing::error!(
                order_id = %message.order_id,
                error = %e,
                "Failed to record notification attempt"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::settings as settings_repo;
    use shared::models::{
        ApiProvider, Order, OrderStatus, ShippingAddress, StoreSettings,
    };

    fn order() -> Order {
        Order {
            id: "ORD-7".to_string(),
            order_date: 0,
            customer_name: "Asha Rao".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: Some("9876543210".to_string()),
            shipping_address: ShippingAddress {
                street: "12 MG Road".to_string(),
                city: "Pune".to_string(),
                state: "MH".to_string(),
                zip: "411001".to_string(),
            },
            total_amount: 100.0,
            status: OrderStatus::Pending,
            user_id: None,
            shipping_info: None,
            payment_details: None,
            items: vec![],
        }
    }

    async fn worker_with(settings: StoreSettings) -> (NotificationWorker, SqlitePool) {
        let pool = DbService::new_in_memory().await.unwrap().pool;
        settings_repo::write(&pool, &settings).await.unwrap();
        let service = SettingsService::new(pool.clone());
        (NotificationWorker::new(pool.clone(), service), pool)
    }

    fn enabled_mock_settings() -> StoreSettings {
        let mut settings = StoreSettings::default();
        let ns = &mut settings.whatsapp_notifications;
        ns.enable_order_notifications = true;
        ns.api_provider = ApiProvider::MockServer;
        ns.customer_new_order_template_name = "order_placed".to_string();
        ns.customer_new_order_template_params = "[CUSTOMER_NAME],[ORDER_ID]".to_string();
        ns.admin_phone_number = "9000000000".to_string();
        ns.admin_new_order_template_name = "admin_new_order".to_string();
        settings
    }

    #[tokio::test]
    async fn new_order_with_mock_provider_records_both_attempts() {
        let (worker, pool) = worker_with(enabled_mock_settings()).await;
        worker.handle_event(NotificationEvent::NewOrder(order())).await;

        let count = notification_log::count_for_order(&pool, "ORD-7").await.unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn disabled_settings_produce_no_side_effects() {
        let (worker, pool) = worker_with(StoreSettings::default()).await;
        worker.handle_event(NotificationEvent::NewOrder(order())).await;

        let count = notification_log::count_for_order(&pool, "ORD-7").await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn provider_none_records_failed_attempts() {
        let mut settings = enabled_mock_settings();
        settings.whatsapp_notifications.api_provider = ApiProvider::None;
        let (worker, pool) = worker_with(settings).await;
        worker.handle_event(NotificationEvent::NewOrder(order())).await;

        let statuses: Vec<String> =
            sqlx::query_scalar("SELECT status FROM notification_log WHERE order_id = ?")
                .bind("ORD-7")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| s == "failed"));
    }

    #[tokio::test]
    async fn pending_status_change_never_notifies() {
        let (worker, pool) = worker_with(enabled_mock_settings()).await;
        worker
            .handle_event(NotificationEvent::StatusChanged {
                order: order(),
                status: OrderStatus::Pending,
            })
            .await;

        let count = notification_log::count_for_order(&pool, "ORD-7").await.unwrap();
        assert_eq!(count, 0);
    }
}
