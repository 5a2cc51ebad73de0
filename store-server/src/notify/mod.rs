//! Order Notifications
//!
//! Fire-and-forget WhatsApp notifications for order events. The request
//! path publishes an event and moves on; a background worker resolves the
//! current notification settings, plans the messages, delivers them through
//! the configured provider and records the outcome. Nothing in here can
//! fail an order operation: publishing never blocks, and every worker-side
//! failure is absorbed and logged.

pub mod dispatcher;
pub mod provider;
pub mod worker;

pub use provider::{Provider, SendOutcome};
pub use worker::NotificationWorker;

use shared::models::{Order, OrderStatus};
use tokio::sync::mpsc;

/// An order event worth notifying about
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    /// Checkout committed a new order
    NewOrder(Order),
    /// An admin moved an order to `status`
    StatusChanged { order: Order, status: OrderStatus },
}

/// Publishing handle held by the request path
///
/// `publish` is best-effort: a full or closed channel drops the event with
/// a warning instead of blocking or failing the caller.
#[derive(Clone)]
pub struct NotificationService {
    tx: mpsc::Sender<NotificationEvent>,
}

impl NotificationService {
    /// Create the service and the worker's receiving end
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    /// Hand an event to the notification worker without waiting
    pub fn publish(&self, event: NotificationEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                tracing::warn!(
                    order_id = %event.order_id(),
                    "Notification channel full, dropping event"
                );
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                tracing::warn!(
                    order_id = %event.order_id(),
                    "Notification worker not running, dropping event"
                );
            }
        }
    }
}

impl NotificationEvent {
    pub fn order_id(&self) -> &str {
        match self {
            NotificationEvent::NewOrder(order) => &order.id,
            NotificationEvent::StatusChanged { order, .. } => &order.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order {
            id: "ORD-1".to_string(),
            order_date: 0,
            customer_name: "Asha Rao".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: Some("9876543210".to_string()),
            shipping_address: shared::models::ShippingAddress {
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

    #[test]
    fn publish_to_closed_channel_never_errors() {
        let (service, rx) = NotificationService::channel(4);
        drop(rx);
        // Must not panic or block
        service.publish(NotificationEvent::NewOrder(sample_order()));
    }

    #[test]
    fn publish_to_full_channel_drops_silently() {
        let (service, _rx) = NotificationService::channel(1);
        service.publish(NotificationEvent::NewOrder(sample_order()));
        // Channel is now full; the second publish must not block
        service.publish(NotificationEvent::NewOrder(sample_order()));
    }
}
