//! Notification messages handed to a channel.

use serde::{Deserialize, Serialize};

use super::window::Day;

/// What a notification is about. Only used for logging and payload tagging;
/// channels treat every kind the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "birthdays")]
    Birthdays,
    #[serde(rename = "events-today")]
    EventsToday,
    #[serde(rename = "events-tomorrow")]
    EventsTomorrow,
}

impl NotificationKind {
    pub fn events(day: Day) -> Self {
        match day {
            Day::Today => NotificationKind::EventsToday,
            Day::Tomorrow => NotificationKind::EventsTomorrow,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Birthdays => write!(f, "birthdays"),
            NotificationKind::EventsToday => write!(f, "events-today"),
            NotificationKind::EventsTomorrow => write!(f, "events-tomorrow"),
        }
    }
}

/// How a message body is marked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
    /// Telegram-flavoured HTML: `<b>` labels, escaped user text.
    Html,
    Plain,
}

/// A formatted notification, rendered both with and without markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub kind: NotificationKind,
    pub html: String,
    pub plain: String,
}

impl NotificationMessage {
    /// Render `body` once per markup. Returns `None` when there is nothing to say.
    pub fn render<F>(kind: NotificationKind, body: F) -> Option<Self>
    where
        F: Fn(Markup) -> Option<String>,
    {
        Some(Self {
            kind,
            html: body(Markup::Html)?,
            plain: body(Markup::Plain)?,
        })
    }

    pub fn text(&self, markup: Markup) -> &str {
        match markup {
            Markup::Html => &self.html,
            Markup::Plain => &self.plain,
        }
    }
}
