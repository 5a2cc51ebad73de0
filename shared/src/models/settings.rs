//! Settings Models
//!
//! Read-only snapshot of the store settings aggregate. The server keeps the
//! whole aggregate as one JSON document in a single-row table; the field
//! names here match that document, so partial documents deserialize with
//! defaults filled in.

use super::order::TemplateKey;
use serde::{Deserialize, Serialize};

// =============================================================================
// Shipping
// =============================================================================

/// Shipping cost configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingSettings {
    pub flat_rate_enabled: bool,
    pub flat_rate_cost: f64,
    pub free_shipping_enabled: bool,
    pub free_shipping_threshold: f64,
    pub pincode_free_shipping_enabled: bool,
    /// Comma-separated pincode list; entries are trimmed on evaluation
    pub free_shipping_pincodes: String,
}

// =============================================================================
// Notifications
// =============================================================================

/// Messaging provider selector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiProvider {
    /// No provider configured — every dispatch is skipped
    #[default]
    #[serde(rename = "none")]
    None,
    /// Log the outgoing payload and report success
    #[serde(rename = "mock_server")]
    MockServer,
    /// WhatsApp Graph API template send
    #[serde(rename = "graph_api")]
    GraphApi,
}

/// WhatsApp order-notification configuration
///
/// Template params fields hold a comma-separated, ordered placeholder list
/// (e.g. `"[CUSTOMER_NAME],[ORDER_ID]"`) that maps template variables
/// `{{1}}`, `{{2}}`, ... to values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WhatsappSettings {
    pub enable_order_notifications: bool,
    pub api_provider: ApiProvider,

    // Graph API credentials
    pub whatsapp_token: String,
    pub whatsapp_phone_id: String,
    pub whatsapp_version: String,

    pub admin_phone_number: String,

    // New-order templates
    pub customer_new_order_template_name: String,
    pub customer_new_order_template_params: String,
    pub admin_new_order_template_name: String,
    pub admin_new_order_template_params: String,

    // Status-update templates
    pub customer_processing_template_name: String,
    pub customer_processing_template_params: String,
    pub customer_shipped_template_name: String,
    pub customer_shipped_template_params: String,
    pub customer_delivered_template_name: String,
    pub customer_delivered_template_params: String,
    pub customer_cancelled_template_name: String,
    pub customer_cancelled_template_params: String,
}

impl WhatsappSettings {
    /// Customer template (name, params) for a status-update key
    ///
    /// An empty name means no template is configured for that status.
    pub fn customer_template(&self, key: TemplateKey) -> (&str, &str) {
        match key {
            TemplateKey::Processing => (
                &self.customer_processing_template_name,
                &self.customer_processing_template_params,
            ),
            TemplateKey::Shipped => (
                &self.customer_shipped_template_name,
                &self.customer_shipped_template_params,
            ),
            TemplateKey::Delivered => (
                &self.customer_delivered_template_name,
                &self.customer_delivered_template_params,
            ),
            TemplateKey::Cancelled => (
                &self.customer_cancelled_template_name,
                &self.customer_cancelled_template_params,
            ),
        }
    }
}

// =============================================================================
// Aggregate
// =============================================================================

/// Store settings aggregate, as read from the settings store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    pub shipping: ShippingSettings,
    pub whatsapp_notifications: WhatsappSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_fills_defaults() {
        let doc = r#"{"shipping":{"flatRateEnabled":true,"flatRateCost":50.0}}"#;
        let settings: StoreSettings = serde_json::from_str(doc).unwrap();
        assert!(settings.shipping.flat_rate_enabled);
        assert_eq!(settings.shipping.flat_rate_cost, 50.0);
        assert!(!settings.shipping.free_shipping_enabled);
        assert_eq!(
            settings.whatsapp_notifications.api_provider,
            ApiProvider::None
        );
    }

    #[test]
    fn provider_uses_wire_names() {
        let ns: WhatsappSettings =
            serde_json::from_str(r#"{"apiProvider":"mock_server"}"#).unwrap();
        assert_eq!(ns.api_provider, ApiProvider::MockServer);
        let ns: WhatsappSettings = serde_json::from_str(r#"{"apiProvider":"graph_api"}"#).unwrap();
        assert_eq!(ns.api_provider, ApiProvider::GraphApi);
    }

    #[test]
    fn empty_template_name_means_unconfigured() {
        let ns = WhatsappSettings::default();
        let (name, params) = ns.customer_template(TemplateKey::Shipped);
        assert!(name.is_empty());
        assert!(params.is_empty());
    }
}
