//! Human-readable notification text.
//!
//! Every formatter returns `None` when there is nothing to say, so an empty
//! message can never reach a channel.

use chrono::{Local, TimeZone};
use daybell_core::types::{CalendarEvent, Markup};

/// Escape user text for Telegram HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn text(markup: Markup, raw: &str) -> String {
    match markup {
        Markup::Html => escape_html(raw),
        Markup::Plain => raw.to_string(),
    }
}

fn bold(markup: Markup, raw: &str) -> String {
    match markup {
        Markup::Html => format!("<b>{}</b>", escape_html(raw)),
        Markup::Plain => raw.to_string(),
    }
}

/// One name gives a single sentence; several give a bulleted list.
pub fn format_birthday_message(names: &[String], markup: Markup) -> Option<String> {
    match names {
        [] => None,
        [name] => Some(format!("🎉 Today is {}'s birthday! 🎂", bold(markup, name))),
        _ => {
            let mut lines = vec![format!("🎉 {}", bold(markup, "Today's birthdays:"))];
            lines.extend(names.iter().map(|name| format!("• {}", text(markup, name))));
            lines.push(String::new());
            lines.push("🎂 Congratulations!".to_string());
            Some(lines.join("\n"))
        }
    }
}

/// Event digest for one day, start times shown in the local timezone.
pub fn format_events_message(events: &[CalendarEvent], label: &str, markup: Markup) -> Option<String> {
    format_events_message_in(events, label, markup, &Local)
}

/// [`format_events_message`] with start times shown in `tz`.
pub fn format_events_message_in<Tz>(
    events: &[CalendarEvent],
    label: &str,
    markup: Markup,
    tz: &Tz,
) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if events.is_empty() {
        return None;
    }

    let mut blocks = vec![format!("📅 {}", bold(markup, &format!("Events for {label}")))];
    for event in events {
        let mut block = vec![bold(markup, event.display_title())];
        match event.start {
            Some(start) => block.push(format!("🕒 {}", start.with_timezone(tz).format("%H:%M"))),
            None => block.push("🕒 All day".to_string()),
        }
        if let Some(location) = event.display_location() {
            block.push(format!("📍 {}", text(markup, location)));
        }
        blocks.push(block.join("\n"));
    }
    Some(blocks.join("\n\n"))
}
