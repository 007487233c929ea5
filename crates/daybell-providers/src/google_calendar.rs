//! Google Calendar provider: `events.list` for one calendar and one day-window.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use daybell_core::config::CalendarConfig;
use daybell_core::error::{DaybellError, Result};
use daybell_core::traits::{CredentialProvider, EventProvider};
use daybell_core::types::{CalendarEvent, DayWindow};
use serde::Deserialize;

use crate::http::send_json;

const SOURCE: &str = "google-calendar";
const PAGE_SIZE: &str = "250";
/// Upper bound on pages per window, in case the API keeps handing out tokens.
const MAX_PAGES: usize = 20;

pub struct GoogleCalendarProvider {
    api_base: String,
    calendar_id: String,
    client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

/// Calendar entry as shown by `calendarList.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarSummary {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<GoogleEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    summary: Option<String>,
    location: Option<String>,
    start: Option<EventDateTime>,
}

/// All-day events carry `date` instead of `dateTime`; only the latter matters here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime {
    date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarListPage {
    #[serde(default)]
    items: Vec<CalendarSummary>,
}

impl GoogleCalendarProvider {
    pub fn new(config: &CalendarConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
            client: reqwest::Client::new(),
            credentials,
        }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    async fn token(&self) -> Result<String> {
        self.credentials
            .access_token()
            .await
            .map_err(|e| DaybellError::from_source(SOURCE, e))
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&self.calendar_id)
        )
    }

    /// Calendars visible to the authenticated account.
    pub async fn list_calendars(&self) -> Result<Vec<CalendarSummary>> {
        let token = self.token().await?;
        let page: CalendarListPage = send_json(
            SOURCE,
            self.client
                .get(format!("{}/users/me/calendarList", self.api_base))
                .bearer_auth(token),
        )
        .await?;
        Ok(page.items)
    }

    /// Metadata of the configured calendar; fails when it is not accessible.
    pub async fn calendar_summary(&self) -> Result<CalendarSummary> {
        let token = self.token().await?;
        send_json(
            SOURCE,
            self.client
                .get(format!(
                    "{}/calendars/{}",
                    self.api_base,
                    urlencoding::encode(&self.calendar_id)
                ))
                .bearer_auth(token),
        )
        .await
    }
}

#[async_trait]
impl EventProvider for GoogleCalendarProvider {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn fetch_events(&self, window: &DayWindow) -> Result<Vec<CalendarEvent>> {
        let token = self.token().await?;
        let time_min = window.start.to_rfc3339();
        let time_max = window.end.to_rfc3339();

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut request = self
                .client
                .get(self.events_url())
                .bearer_auth(&token)
                .query(&[
                    ("timeMin", time_min.as_str()),
                    ("timeMax", time_max.as_str()),
                    ("singleEvents", "true"),
                    ("orderBy", "startTime"),
                    ("maxResults", PAGE_SIZE),
                ]);
            if let Some(ref pt) = page_token {
                request = request.query(&[("pageToken", pt.as_str())]);
            }

            let page: EventsPage = send_json(SOURCE, request).await?;
            events.extend(page.items.into_iter().map(into_calendar_event));

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        if page_token.is_some() {
            tracing::warn!("{SOURCE}: stopped after {MAX_PAGES} pages for {}", window.date);
        }

        tracing::debug!("{SOURCE}: {} events for {} ({})", events.len(), window.day, window.date);
        Ok(events)
    }
}

fn into_calendar_event(event: GoogleEvent) -> CalendarEvent {
    let start = event
        .start
        .and_then(|s| s.date_time)
        .and_then(|raw| parse_start(&raw));

    CalendarEvent {
        title: event.summary,
        start,
        location: event.location,
    }
}

fn parse_start(raw: &str) -> Option<DateTime<FixedOffset>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt),
        Err(e) => {
            tracing::warn!("{SOURCE}: unparseable start time '{raw}': {e}, treating as all-day");
            None
        }
    }
}
