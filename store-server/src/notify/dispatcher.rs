//! Notification Dispatcher
//!
//! Turns an order event plus a settings snapshot into the concrete messages
//! to deliver: resolves recipients, selects templates, and builds the
//! ordered parameter list each template expects. Pure planning — no I/O —
//! so every policy here is unit-testable.

use super::NotificationEvent;
use shared::models::{Order, OrderStatus, WhatsappSettings};
use std::collections::HashMap;

/// A message ready for a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMessage {
    pub recipient: String,
    pub template_name: String,
    pub parameters: Vec<String>,
    /// Audit tag, e.g. "new_order_customer", "status_update_shipped"
    pub message_type: String,
    pub order_id: String,
    pub user_id: Option<String>,
}

/// Build an ordered parameter array from a comma-separated mapping string
///
/// The mapping lists placeholders in template-variable order
/// (`"[CUSTOMER_NAME],[ORDER_ID]"` fills `{{1}}`, `{{2}}`). Entries are
/// trimmed and empties from stray commas discarded. An unmapped placeholder
/// becomes a single space — the provider rejects empty parameter fields, so
/// this is deliberate policy, not data loss.
pub fn build_template_parameters(
    mapping: &str,
    values: &HashMap<&'static str, String>,
) -> Vec<String> {
    if mapping.trim().is_empty() {
        return Vec::new();
    }

    mapping
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| values.get(key).cloned().unwrap_or_else(|| " ".to_string()))
        .collect()
}

/// Placeholder dictionary for a new order
fn new_order_placeholders(order: &Order) -> HashMap<&'static str, String> {
    HashMap::from([
        ("[ORDER_ID]", order.id.clone()),
        ("[CUSTOMER_NAME]", order.customer_name.clone()),
        ("[TOTAL_AMOUNT]", order.total_amount.to_string()),
    ])
}

/// Placeholder dictionary for a status update
///
/// Carrier/tracking fall back to display text when the order has no
/// shipping info (e.g. a Processing or Cancelled update).
fn status_placeholders(order: &Order) -> HashMap<&'static str, String> {
    let (carrier, tracking) = match &order.shipping_info {
        Some(info) => (info.carrier.clone(), info.tracking_number.clone()),
        None => ("our courier partner".to_string(), "N/A".to_string()),
    };
    HashMap::from([
        ("[ORDER_ID]", order.id.clone()),
        ("[CUSTOMER_NAME]", order.customer_name.clone()),
        ("[CARRIER]", carrier),
        ("[TRACKING_NUMBER]", tracking),
    ])
}

/// Plan the messages for an event
///
/// Assumes notifications are enabled — the worker checks the kill switch
/// before planning anything.
pub fn plan(settings: &WhatsappSettings, event: &NotificationEvent) -> Vec<PlannedMessage> {
    match event {
        NotificationEvent::NewOrder(order) => plan_new_order(settings, order),
        NotificationEvent::StatusChanged { order, status } => {
            plan_status_change(settings, order, *status)
        }
    }
}

/// New order: customer message (if a phone and template exist) plus admin
/// message (if an admin number and template exist)
fn plan_new_order(settings: &WhatsappSettings, order: &Order) -> Vec<PlannedMessage> {
    let values = new_order_placeholders(order);
    let mut messages = Vec::new();

    if let Some(phone) = &order.customer_phone
        && !phone.is_empty()
        && !settings.customer_new_order_template_name.is_empty()
    {
        messages.push(PlannedMessage {
            recipient: phone.clone(),
            template_name: settings.customer_new_order_template_name.clone(),
            parameters: build_template_parameters(
                &settings.customer_new_order_template_params,
                &values,
            ),
            message_type: "new_order_customer".to_string(),
            order_id: order.id.clone(),
            user_id: order.user_id.clone(),
        });
    }

    if !settings.admin_phone_number.is_empty() && !settings.admin_new_order_template_name.is_empty()
    {
        messages.push(PlannedMessage {
            recipient: settings.admin_phone_number.clone(),
            template_name: settings.admin_new_order_template_name.clone(),
            parameters: build_template_parameters(
                &settings.admin_new_order_template_params,
                &values,
            ),
            message_type: "new_order_admin".to_string(),
            order_id: order.id.clone(),
            user_id: order.user_id.clone(),
        });
    }

    messages
}

/// Status change: customer only, and only for statuses with a configured
/// template. Pending and unknown statuses never notify.
fn plan_status_change(
    settings: &WhatsappSettings,
    order: &Order,
    status: OrderStatus,
) -> Vec<PlannedMessage> {
    let Some(key) = status.transition_rule().template else {
        return Vec::new();
    };
    let (template_name, template_params) = settings.customer_template(key);
    if template_name.is_empty() {
        tracing::debug!(
            status = status.as_str(),
            "No template configured for status, skipping notification"
        );
        return Vec::new();
    }
    let Some(phone) = order.customer_phone.clone().filter(|p| !p.is_empty()) else {
        return Vec::new();
    };

    let values = status_placeholders(order);
    vec![PlannedMessage {
        recipient: phone,
        template_name: template_name.to_string(),
        parameters: build_template_parameters(template_params, &values),
        message_type: format!("status_update_{}", status.as_str().to_lowercase()),
        order_id: order.id.clone(),
        user_id: order.user_id.clone(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ShippingAddress, ShippingInfo};

    fn order() -> Order {
        Order {
            id: "ORD-42".to_string(),
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
            total_amount: 1949.0,
            status: OrderStatus::Pending,
            user_id: Some("user-1".to_string()),
            shipping_info: None,
            payment_details: None,
            items: vec![],
        }
    }

    fn settings() -> WhatsappSettings {
        WhatsappSettings {
            enable_order_notifications: true,
            admin_phone_number: "9000000000".to_string(),
            customer_new_order_template_name: "order_placed".to_string(),
            customer_new_order_template_params: "[CUSTOMER_NAME],[ORDER_ID],[TOTAL_AMOUNT]"
                .to_string(),
            admin_new_order_template_name: "admin_new_order".to_string(),
            admin_new_order_template_params: "[ORDER_ID],[TOTAL_AMOUNT]".to_string(),
            customer_shipped_template_name: "order_shipped".to_string(),
            customer_shipped_template_params: "[CUSTOMER_NAME],[CARRIER],[TRACKING_NUMBER]"
                .to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn parameters_follow_mapping_order() {
        let values = HashMap::from([
            ("[ORDER_ID]", "ORD-42".to_string()),
            ("[CUSTOMER_NAME]", "Asha".to_string()),
        ]);
        let params = build_template_parameters("[CUSTOMER_NAME],[ORDER_ID]", &values);
        assert_eq!(params, vec!["Asha".to_string(), "ORD-42".to_string()]);
    }

    #[test]
    fn unmapped_placeholder_becomes_a_space() {
        let values = HashMap::from([("[ORDER_ID]", "ORD-42".to_string())]);
        let params = build_template_parameters("[ORDER_ID],[NO_SUCH_KEY]", &values);
        assert_eq!(params, vec!["ORD-42".to_string(), " ".to_string()]);
    }

    #[test]
    fn blank_mapping_yields_no_parameters() {
        let values = HashMap::new();
        assert!(build_template_parameters("", &values).is_empty());
        assert!(build_template_parameters("   ", &values).is_empty());
    }

    #[test]
    fn stray_commas_are_discarded() {
        let values = HashMap::from([("[ORDER_ID]", "ORD-42".to_string())]);
        let params = build_template_parameters(" [ORDER_ID] ,, ", &values);
        assert_eq!(params, vec!["ORD-42".to_string()]);
    }

    #[test]
    fn new_order_targets_customer_and_admin() {
        let messages = plan(&settings(), &NotificationEvent::NewOrder(order()));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message_type, "new_order_customer");
        assert_eq!(messages[0].recipient, "9876543210");
        assert_eq!(
            messages[0].parameters,
            vec!["Asha Rao".to_string(), "ORD-42".to_string(), "1949".to_string()]
        );
        assert_eq!(messages[1].message_type, "new_order_admin");
        assert_eq!(messages[1].recipient, "9000000000");
    }

    #[test]
    fn new_order_without_phone_only_notifies_admin() {
        let mut o = order();
        o.customer_phone = None;
        let messages = plan(&settings(), &NotificationEvent::NewOrder(o));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message_type, "new_order_admin");
    }

    #[test]
    fn new_order_without_admin_template_skips_admin() {
        let mut s = settings();
        s.admin_new_order_template_name.clear();
        let messages = plan(&s, &NotificationEvent::NewOrder(order()));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message_type, "new_order_customer");
    }

    #[test]
    fn shipped_update_uses_shipping_info_placeholders() {
        let mut o = order();
        o.shipping_info = Some(ShippingInfo {
            carrier: "BlueDart".to_string(),
            tracking_number: "BD123".to_string(),
            estimated_delivery: "2026-08-14".to_string(),
        });
        let messages = plan(
            &settings(),
            &NotificationEvent::StatusChanged {
                order: o,
                status: OrderStatus::Shipped,
            },
        );
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message_type, "status_update_shipped");
        assert_eq!(
            messages[0].parameters,
            vec!["Asha Rao".to_string(), "BlueDart".to_string(), "BD123".to_string()]
        );
    }

    #[test]
    fn status_without_configured_template_is_silently_skipped() {
        // Processing has a template slot, but the settings leave it empty
        let messages = plan(
            &settings(),
            &NotificationEvent::StatusChanged {
                order: order(),
                status: OrderStatus::Processing,
            },
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn cancelled_without_shipping_info_uses_fallback_text() {
        let mut s = settings();
        s.customer_cancelled_template_name = "order_cancelled".to_string();
        s.customer_cancelled_template_params = "[CARRIER],[TRACKING_NUMBER]".to_string();
        let messages = plan(
            &s,
            &NotificationEvent::StatusChanged {
                order: order(),
                status: OrderStatus::Cancelled,
            },
        );
        assert_eq!(
            messages[0].parameters,
            vec!["our courier partner".to_string(), "N/A".to_string()]
        );
    }
}
