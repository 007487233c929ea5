//! Webhook channel: POST each notification as JSON to an outbound URL.
//!
//! Useful for integrating with external systems (n8n, Zapier, custom APIs).

use async_trait::async_trait;
use daybell_core::config::WebhookConfig;
use daybell_core::error::{DaybellError, Result};
use daybell_core::traits::Channel;
use daybell_core::types::NotificationMessage;

/// Webhook channel.
pub struct WebhookChannel {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// JSON body for one notification.
    pub fn payload(message: &NotificationMessage) -> serde_json::Value {
        serde_json::json!({
            "kind": message.kind,
            "html": message.html,
            "plain": message.plain,
            "sent_at": chrono::Utc::now().to_rfc3339(),
        })
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, message: &NotificationMessage) -> Result<()> {
        let mut request = self
            .client
            .post(&self.config.outbound_url)
            .json(&Self::payload(message));
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DaybellError::delivery(format!("Webhook send failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(200).collect();
            return Err(DaybellError::delivery(format!(
                "Webhook returned HTTP {status}: {body}"
            )));
        }
        Ok(())
    }
}
