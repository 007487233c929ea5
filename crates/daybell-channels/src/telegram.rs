//! Telegram Bot channel: `sendMessage` to one chat or channel.

use async_trait::async_trait;
use daybell_core::config::TelegramConfig;
use daybell_core::error::{DaybellError, Result};
use daybell_core::traits::Channel;
use daybell_core::types::{Markup, NotificationMessage};
use serde::Deserialize;

/// Telegram Bot channel.
pub struct TelegramChannel {
    api_base: String,
    bot_token: String,
    channel_id: String,
    rich_text: bool,
    client: reqwest::Client,
}

/// Bot identity returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<u16>,
}

/// Why a Bot API call did not succeed.
#[derive(Debug)]
enum ApiFailure {
    Transport(String),
    Rejected { code: Option<u16>, description: String },
}

impl ApiFailure {
    /// Telegram refused the HTML markup rather than the message itself.
    fn is_markup_rejection(&self) -> bool {
        matches!(self, ApiFailure::Rejected { code: Some(400), description }
            if description.contains("can't parse entities"))
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiFailure::Transport(e) => write!(f, "transport: {e}"),
            ApiFailure::Rejected { code: Some(code), description } => write!(f, "{code}: {description}"),
            ApiFailure::Rejected { code: None, description } => f.write_str(description),
        }
    }
}

impl TelegramChannel {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            channel_id: config.channel_id.clone(),
            rich_text: config.rich_text,
            client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: Option<serde_json::Value>,
    ) -> std::result::Result<T, ApiFailure> {
        let request = match body {
            Some(body) => self.client.post(self.method_url(method)).json(&body),
            None => self.client.get(self.method_url(method)),
        };

        // without_url(): the URL carries the bot token.
        let response = request
            .send()
            .await
            .map_err(|e| ApiFailure::Transport(e.without_url().to_string()))?;
        let status = response.status();
        let parsed: ApiResponse<T> = response.json().await.map_err(|e| ApiFailure::Rejected {
            code: Some(status.as_u16()),
            description: format!("unreadable response: {}", e.without_url()),
        })?;

        match parsed {
            ApiResponse { ok: true, result: Some(result), .. } => Ok(result),
            ApiResponse { description, error_code, .. } => Err(ApiFailure::Rejected {
                code: error_code.or(Some(status.as_u16())),
                description: description.unwrap_or_else(|| "no description".into()),
            }),
        }
    }

    async fn send_text(&self, text: &str, markup: Markup) -> std::result::Result<(), ApiFailure> {
        let mut body = serde_json::json!({
            "chat_id": self.channel_id,
            "text": text,
            "disable_web_page_preview": true,
        });
        if markup == Markup::Html {
            body["parse_mode"] = serde_json::Value::String("HTML".into());
        }
        self.call::<serde_json::Value>("sendMessage", Some(body)).await.map(|_| ())
    }

    /// Send raw text, optionally as HTML.
    pub async fn send_message(&self, text: &str, markup: Markup) -> Result<()> {
        self.send_text(text, markup)
            .await
            .map_err(|e| DaybellError::delivery(format!("Telegram sendMessage failed: {e}")))
    }

    /// Identity of the configured bot; doubles as a token check.
    pub async fn get_me(&self) -> Result<TelegramUser> {
        self.call("getMe", None)
            .await
            .map_err(|e| DaybellError::delivery(format!("Telegram getMe failed: {e}")))
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn deliver(&self, message: &NotificationMessage) -> Result<()> {
        if !self.rich_text {
            return self.send_message(&message.plain, Markup::Plain).await;
        }

        match self.send_text(&message.html, Markup::Html).await {
            Ok(()) => Ok(()),
            Err(failure) if failure.is_markup_rejection() => {
                tracing::warn!(
                    "⚠️ Telegram rejected HTML for {} ({failure}), sending plain text",
                    message.kind
                );
                self.send_message(&message.plain, Markup::Plain).await
            }
            Err(failure) => Err(DaybellError::delivery(format!(
                "Telegram sendMessage failed: {failure}"
            ))),
        }
    }
}
