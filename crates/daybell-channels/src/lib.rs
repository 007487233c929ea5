//! # Daybell Channels
//! Delivery sinks for rendered notifications.

pub mod telegram;
pub mod webhook;

use std::sync::Arc;

use daybell_core::config::{ChannelKind, DaybellConfig};
use daybell_core::error::{DaybellError, Result};
use daybell_core::traits::Channel;

pub use telegram::{TelegramChannel, TelegramUser};
pub use webhook::WebhookChannel;

/// Create the configured delivery channel.
pub fn create_channel(config: &DaybellConfig) -> Result<Arc<dyn Channel>> {
    match config.channel.kind {
        ChannelKind::Telegram => Ok(Arc::new(TelegramChannel::new(&config.channel.telegram))),
        ChannelKind::Webhook => {
            let webhook = config
                .channel
                .webhook
                .clone()
                .ok_or_else(|| DaybellError::config("channel.webhook section is missing"))?;
            Ok(Arc::new(WebhookChannel::new(webhook)))
        }
    }
}
