//! `daybell doctor`: walks through every external dependency and reports
//! what works. Never sends a notification.

use std::sync::Arc;

use chrono::{Local, Utc};
use daybell_channels::TelegramChannel;
use daybell_core::DaybellConfig;
use daybell_core::config::ChannelKind;
use daybell_core::traits::{ContactsProvider, CredentialProvider, EventProvider};
use daybell_core::types::{Day, DayWindow};
use daybell_notifier::classifier::contacts_born_on;
use daybell_providers::{GoogleCalendarProvider, GoogleContactsProvider, GoogleCredentials, TokenSnapshot};

/// Print a report; returns the number of failed checks.
pub async fn run(config: &DaybellConfig) -> usize {
    let mut failures = 0;
    let mut fail = |message: String| {
        println!("  ❌ {message}");
        failures += 1;
    };

    println!("🩺 Daybell doctor\n");

    println!("⚙️  Configuration");
    match config.validate() {
        Ok(()) => println!("  ✅ Configuration is complete"),
        Err(e) => fail(e.to_string()),
    }

    println!("\n🔑 Google credentials");
    let credentials = GoogleCredentials::resolve(&config.google);
    let usable = match &credentials {
        GoogleCredentials::Static(_) => {
            println!("  ✅ Static access token from configuration");
            true
        }
        GoogleCredentials::TokenFile(path) => match TokenSnapshot::read(path) {
            Ok(snapshot) => {
                println!("  ✅ Token file: {}", path.display());
                let expired = snapshot.is_expired_at(Utc::now());
                match snapshot.expires_at {
                    Some(expiry) if expired => fail(format!(
                        "Access token expired on {}",
                        expiry.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    )),
                    Some(expiry) => println!(
                        "  ✅ Token valid until {}",
                        expiry.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    ),
                    None => println!("  ⚠️  Token expiry unknown"),
                }
                if !snapshot.has_refresh_token {
                    println!("  ⚠️  No refresh token stored; re-authorize when the token expires");
                }
                !expired
            }
            Err(e) => {
                fail(e.to_string());
                false
            }
        },
    };

    if !usable {
        println!("\n  Skipping Google checks without a usable token.");
    } else {
        let credentials: Arc<dyn CredentialProvider> = Arc::new(credentials);
        let today = Local::now().date_naive();

        println!("\n📅 Google Calendar");
        let calendar = GoogleCalendarProvider::new(&config.calendar, credentials.clone());
        match calendar.list_calendars().await {
            Ok(calendars) => {
                println!("  ✅ {} calendars visible:", calendars.len());
                for entry in &calendars {
                    let marker = if entry.id == calendar.calendar_id() { "👉" } else { "  " };
                    println!(
                        "    {marker} {} ({})",
                        entry.summary.as_deref().unwrap_or("untitled"),
                        entry.id
                    );
                }
            }
            Err(e) => fail(format!("Cannot list calendars: {e}")),
        }

        if !calendar.calendar_id().is_empty() {
            match calendar.calendar_summary().await {
                Ok(summary) => println!(
                    "  ✅ Target calendar accessible: {}",
                    summary.summary.as_deref().unwrap_or(calendar.calendar_id())
                ),
                Err(e) => fail(format!("Target calendar not accessible: {e}")),
            }
            match calendar.fetch_events(&DayWindow::local(Day::Today, today)).await {
                Ok(events) => println!("  ✅ {} events today", events.len()),
                Err(e) => fail(format!("Cannot read today's events: {e}")),
            }
        }

        println!("\n👥 Google Contacts");
        if !config.contacts.enabled {
            println!("  ⬜ Disabled in configuration");
        } else {
            let contacts = GoogleContactsProvider::new(&config.contacts, credentials);
            match contacts.profile_name().await {
                Ok(Some(name)) => println!("  ✅ Signed in as {name}"),
                Ok(None) => println!("  ✅ Profile accessible (no display name)"),
                Err(e) => fail(format!("People API profile: {e}")),
            }
            match contacts.fetch_birthday_contacts().await {
                Ok(list) => println!(
                    "  ✅ {} contacts with birthdays, {} today",
                    list.len(),
                    contacts_born_on(&list, today).len()
                ),
                Err(e) => fail(format!("Cannot read contacts: {e}")),
            }
        }
    }

    println!("\n💬 Channel ({})", config.channel.kind);
    match config.channel.kind {
        ChannelKind::Telegram if config.channel.telegram.bot_token.is_empty() => {
            fail("Telegram bot token is not set".into())
        }
        ChannelKind::Telegram => {
            let telegram = TelegramChannel::new(&config.channel.telegram);
            match telegram.get_me().await {
                Ok(bot) => println!(
                    "  ✅ Bot @{} ({}) → {}",
                    bot.username.as_deref().unwrap_or("?"),
                    bot.first_name,
                    config.channel.telegram.channel_id
                ),
                Err(e) => fail(e.to_string()),
            }
        }
        ChannelKind::Webhook => match &config.channel.webhook {
            Some(webhook) => println!("  ✅ Posting to {}", webhook.outbound_url),
            None => fail("Webhook URL is not set".into()),
        },
    }

    println!();
    if failures == 0 {
        println!("✅ All checks passed");
    } else {
        println!("❌ {failures} check(s) failed");
    }
    failures
}
