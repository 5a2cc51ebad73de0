//! Notification Providers
//!
//! Tagged provider variants selected from the settings snapshot: a
//! simulated provider that only logs, and the WhatsApp Graph API. Sending
//! never panics and never returns an error type — every path reduces to a
//! [`SendOutcome`] the dispatcher records.

use shared::models::WhatsappSettings;

/// Result of one delivery attempt
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub success: bool,
    pub reason: String,
}

impl SendOutcome {
    pub(crate) fn ok(reason: impl Into<String>) -> Self {
        Self {
            success: true,
            reason: reason.into(),
        }
    }

    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: reason.into(),
        }
    }
}

/// Format a phone number for the Graph API
///
/// Strips whitespace and `+`, prefixes country code 91 when missing.
pub fn format_phone(number: &str) -> Option<String> {
    let cleaned: String = number.chars().filter(|c| !c.is_whitespace() && *c != '+').collect();
    if cleaned.is_empty() {
        return None;
    }
    if cleaned.starts_with("91") {
        Some(cleaned)
    } else {
        Some(format!("91{cleaned}"))
    }
}

/// Configured messaging provider
#[derive(Debug, Clone)]
pub enum Provider {
    /// Log the outgoing payload and report success
    Simulated,
    /// WhatsApp Graph API template send
    GraphApi(GraphApiProvider),
}

/// Graph API credentials and client
#[derive(Debug, Clone)]
pub struct GraphApiProvider {
    client: reqwest::Client,
    token: String,
    phone_id: String,
    version: String,
}

impl Provider {
    /// Select a provider from the settings snapshot
    ///
    /// Returns None for provider "none" — the dispatcher records a skip.
    pub fn from_settings(settings: &WhatsappSettings, client: &reqwest::Client) -> Option<Self> {
        match settings.api_provider {
            shared::models::ApiProvider::None => None,
            shared::models::ApiProvider::MockServer => Some(Provider::Simulated),
            shared::models::ApiProvider::GraphApi => Some(Provider::GraphApi(GraphApiProvider {
                client: client.clone(),
                token: settings.whatsapp_token.clone(),
                phone_id: settings.whatsapp_phone_id.clone(),
                version: settings.whatsapp_version.clone(),
            })),
        }
    }

    /// Deliver a template message
    pub async fn send_template(
        &self,
        recipient: &str,
        template_name: &str,
        parameters: &[String],
    ) -> SendOutcome {
        match self {
            Provider::Simulated => simulate_send(recipient, template_name, parameters),
            Provider::GraphApi(provider) => {
                provider.send_template(recipient, template_name, parameters).await
            }
        }
    }
}

fn simulate_send(recipient: &str, template_name: &str, parameters: &[String]) -> SendOutcome {
    if recipient.is_empty() {
        return SendOutcome::failed("Recipient phone number is missing");
    }
    tracing::info!(
        to = recipient,
        template = template_name,
        parameters = ?parameters,
        "Simulating WhatsApp template message"
    );
    SendOutcome::ok("Simulated successfully")
}

impl GraphApiProvider {
    async fn send_template(
        &self,
        recipient: &str,
        template_name: &str,
        parameters: &[String],
    ) -> SendOutcome {
        if self.token.is_empty()
            || self.phone_id.is_empty()
            || self.version.is_empty()
            || template_name.is_empty()
        {
            return SendOutcome::failed(
                "Graph API settings (token, phone id, version or template name) are missing",
            );
        }

        let Some(to) = format_phone(recipient) else {
            return SendOutcome::failed(format!("Invalid recipient phone number: {recipient:?}"));
        };

        let url = format!(
            "https://graph.facebook.com/{}/{}/messages",
            self.version, self.phone_id
        );

        let mut template = serde_json::json!({
            "name": template_name,
            "language": { "code": "en_US" },
        });

        // The API rejects a components object on templates with no
        // variables, so it is attached only when parameters exist.
        if !parameters.is_empty() {
            let body_params: Vec<serde_json::Value> = parameters
                .iter()
                .map(|p| serde_json::json!({ "type": "text", "text": p }))
                .collect();
            template["components"] = serde_json::json!([
                {
                    "type": "body",
                    "parameters": body_params,
                },
                {
                    "type": "button",
                    "sub_type": "url",
                    "index": "0",
                    "parameters": [
                        { "type": "text", "text": "www.google.com" }
                    ]
                }
            ]);
        }

        let payload = serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "template",
            "template": template,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(template = template_name, to = %to, "WhatsApp template sent");
                SendOutcome::ok("Message sent via Graph API")
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                SendOutcome::failed(format!("Graph API error: {status}: {body}"))
            }
            Err(e) => SendOutcome::failed(format!("Graph API error: {e}")),
        }
    }
}
