//! Daybell configuration: `~/.daybell/config.toml` plus environment overrides.
//!
//! ```toml
//! [schedule]
//! hour = 9
//! minute = 0
//!
//! [calendar]
//! calendar_id = "family@group.calendar.google.com"
//!
//! [channel.telegram]
//! bot_token = "123:abc"
//! channel_id = "@family_digest"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DaybellError, Result};

pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";
pub const GOOGLE_PEOPLE_API: &str = "https://people.googleapis.com/v1";
pub const TELEGRAM_API: &str = "https://api.telegram.org";

const MASK: &str = "***";

/// Top-level configuration, read once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaybellConfig {
    pub schedule: ScheduleConfig,
    pub google: GoogleConfig,
    pub calendar: CalendarConfig,
    pub contacts: ContactsConfig,
    pub classifier: ClassifierConfig,
    pub channel: ChannelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Local hour of the daily run (0-23).
    pub hour: u32,
    pub minute: u32,
    /// Also run once right after startup.
    pub run_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { hour: 9, minute: 0, run_on_start: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// Token JSON written by the external authorization tool.
    pub token_path: String,
    /// Static bearer token; takes precedence over `token_path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            token_path: "google-token.json".into(),
            access_token: None,
        }
    }
}

impl GoogleConfig {
    pub fn resolved_token_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.token_path).into_owned())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub calendar_id: String,
    pub api_base: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_id: String::new(),
            api_base: GOOGLE_CALENDAR_API.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsConfig {
    pub enabled: bool,
    pub api_base: String,
    pub page_size: u32,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: GOOGLE_PEOPLE_API.into(),
            page_size: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Case-insensitive title fragments that mark a calendar event as a birthday.
    pub birthday_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            birthday_keywords: vec!["birthday".into(), "день рождения".into()],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    #[default]
    Telegram,
    Webhook,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelKind::Telegram => write!(f, "telegram"),
            ChannelKind::Webhook => write!(f, "webhook"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub kind: ChannelKind,
    pub telegram: TelegramConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Chat id or `@channel` username.
    pub channel_id: String,
    pub api_base: String,
    /// Send HTML markup (bold labels). Plain text is used when false.
    pub rich_text: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            channel_id: String::new(),
            api_base: TELEGRAM_API.into(),
            rich_text: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// URL that receives one JSON POST per notification.
    pub outbound_url: String,
    /// Sent as a bearer token when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl DaybellConfig {
    /// Daybell home directory (`~/.daybell`).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".daybell")
    }

    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Load from the default path, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path` (defaults when the file does not exist), then apply
    /// environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay values from environment-style variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = lookup("NOTIFICATION_HOUR") {
            self.schedule.hour = parse_number("NOTIFICATION_HOUR", &v)?;
        }
        if let Some(v) = lookup("NOTIFICATION_MINUTE") {
            self.schedule.minute = parse_number("NOTIFICATION_MINUTE", &v)?;
        }
        if let Some(v) = lookup("GOOGLE_CALENDAR_ID") {
            self.calendar.calendar_id = v;
        }
        if let Some(v) = lookup("GOOGLE_TOKEN_PATH") {
            self.google.token_path = v;
        }
        if let Some(v) = lookup("GOOGLE_ACCESS_TOKEN") {
            self.google.access_token = Some(v);
        }
        if let Some(v) = lookup("TELEGRAM_BOT_TOKEN") {
            self.channel.telegram.bot_token = v;
        }
        if let Some(v) = lookup("TELEGRAM_CHANNEL_ID") {
            self.channel.telegram.channel_id = v;
        }
        if let Some(v) = lookup("BIRTHDAY_KEYWORDS") {
            self.classifier.birthday_keywords = v
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(())
    }

    /// Check every required field, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.schedule.hour > 23 {
            problems.push(format!("schedule.hour must be 0-23, got {}", self.schedule.hour));
        }
        if self.schedule.minute > 59 {
            problems.push(format!("schedule.minute must be 0-59, got {}", self.schedule.minute));
        }
        if self.calendar.calendar_id.trim().is_empty() {
            problems.push("calendar.calendar_id is not set (GOOGLE_CALENDAR_ID)".into());
        }
        if self.classifier.birthday_keywords.iter().all(|k| k.trim().is_empty()) {
            problems.push("classifier.birthday_keywords is empty".into());
        }

        match self.channel.kind {
            ChannelKind::Telegram => {
                if self.channel.telegram.bot_token.trim().is_empty() {
                    problems.push("channel.telegram.bot_token is not set (TELEGRAM_BOT_TOKEN)".into());
                }
                if self.channel.telegram.channel_id.trim().is_empty() {
                    problems.push("channel.telegram.channel_id is not set (TELEGRAM_CHANNEL_ID)".into());
                }
            }
            ChannelKind::Webhook => match &self.channel.webhook {
                Some(webhook) if !webhook.outbound_url.trim().is_empty() => {}
                _ => problems.push("channel.webhook.outbound_url is not set".into()),
            },
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DaybellError::config(problems.join("; ")))
        }
    }

    /// Copy with tokens replaced, for display.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        if copy.google.access_token.is_some() {
            copy.google.access_token = Some(MASK.into());
        }
        if !copy.channel.telegram.bot_token.is_empty() {
            copy.channel.telegram.bot_token = MASK.into();
        }
        if let Some(webhook) = copy.channel.webhook.as_mut() {
            if webhook.auth_token.is_some() {
                webhook.auth_token = Some(MASK.into());
            }
        }
        copy
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| DaybellError::config(format!("{key} must be a number, got '{value}'")))
}
