//! Order Model
//!
//! Order/line-item entities, the status state machine and its per-status
//! transition rules. Line items are denormalized snapshots taken at
//! purchase time and never refreshed afterwards.

use serde::{Deserialize, Serialize};

// =============================================================================
// Order Status
// =============================================================================

/// Order lifecycle status
///
/// `Pending → Processing → Shipped → Delivered`, with `Cancelled` reachable
/// from any non-terminal state. `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Notification template key for a customer status notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKey {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// What entering a status requires and triggers
///
/// Consulted by both the transition validator (repository) and the
/// notification dispatcher, so the two can never disagree.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    /// Carrier/tracking/estimated delivery must be supplied with the update
    pub requires_shipping_info: bool,
    /// Customer notification template for this status, if any
    pub template: Option<TemplateKey>,
}

impl OrderStatus {
    /// Position in the forward chain (Cancelled sits outside it)
    fn rank(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    /// Terminal statuses accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether moving from `self` to `next` is legal
    ///
    /// Forward moves along the chain are allowed (including skips, e.g.
    /// Pending → Shipped); Cancelled is reachable from any non-terminal
    /// state; nothing leaves a terminal state.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self.is_terminal() || next == self {
            return false;
        }
        match next {
            OrderStatus::Cancelled => true,
            OrderStatus::Pending => false,
            _ => next.rank() > self.rank(),
        }
    }

    /// Rule applied when an order enters this status
    pub fn transition_rule(self) -> TransitionRule {
        match self {
            // Pending never notifies: it is the creation status, covered by
            // the new-order templates instead.
            OrderStatus::Pending => TransitionRule {
                requires_shipping_info: false,
                template: None,
            },
            OrderStatus::Processing => TransitionRule {
                requires_shipping_info: false,
                template: Some(TemplateKey::Processing),
            },
            OrderStatus::Shipped => TransitionRule {
                requires_shipping_info: true,
                template: Some(TemplateKey::Shipped),
            },
            OrderStatus::Delivered => TransitionRule {
                requires_shipping_info: false,
                template: Some(TemplateKey::Delivered),
            },
            OrderStatus::Cancelled => TransitionRule {
                requires_shipping_info: false,
                template: Some(TemplateKey::Cancelled),
            },
        }
    }

    /// Status name as stored in the DB and shown in the API ("Pending", ...)
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse a stored status string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(OrderStatus::Pending),
            "Processing" => Some(OrderStatus::Processing),
            "Shipped" => Some(OrderStatus::Shipped),
            "Delivered" => Some(OrderStatus::Delivered),
            "Cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

// =============================================================================
// Order entities
// =============================================================================

/// Shipping address captured at checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Shipment details, present once an order is Shipped
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub carrier: String,
    pub tracking_number: String,
    /// Free-form date text, stored verbatim
    pub estimated_delivery: String,
}

/// Payment gateway reference attached at checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub payment_id: String,
    pub provider: String,
}

/// Order line item — price/name/image snapshot at purchase time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    pub price: f64,
    pub old_price: Option<f64>,
    #[serde(default)]
    pub image: String,
}

/// Persisted order with its line items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Creation time, UTC millis
    pub order_date: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: ShippingAddress,
    pub total_amount: f64,
    pub status: OrderStatus,
    /// Owning user; None for guest checkout
    pub user_id: Option<String>,
    pub shipping_info: Option<ShippingInfo>,
    pub payment_details: Option<PaymentDetails>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Request payloads
// =============================================================================

/// Customer identity captured at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<OrderItem>,
    pub customer_details: CustomerDetails,
    pub customer_phone: Option<String>,
    pub total_amount: f64,
    pub shipping_address: ShippingAddress,
    pub user_id: Option<String>,
    pub payment_details: Option<PaymentDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_allowed() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
        // Skipping ahead is allowed
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
    }

    #[test]
    fn backward_and_self_transitions_rejected() {
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Processing));
    }

    #[test]
    fn cancelled_reachable_from_non_terminal_only() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn shipped_requires_shipping_info() {
        assert!(OrderStatus::Shipped.transition_rule().requires_shipping_info);
        assert!(!OrderStatus::Processing.transition_rule().requires_shipping_info);
        assert!(!OrderStatus::Cancelled.transition_rule().requires_shipping_info);
    }

    #[test]
    fn pending_never_notifies() {
        assert!(OrderStatus::Pending.transition_rule().template.is_none());
        assert_eq!(
            OrderStatus::Shipped.transition_rule().template,
            Some(TemplateKey::Shipped)
        );
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("Unknown"), None);
    }
}
