//! "Check calendar events" use case: today's and tomorrow's regular events.

use std::sync::Arc;

use chrono::NaiveDate;
use daybell_core::traits::{Channel, EventProvider, FetchOutcome};
use daybell_core::types::{CalendarEvent, Day, DayWindow, NotificationKind, NotificationMessage};

use crate::classifier::BirthdayClassifier;
use crate::format::format_events_message;
use crate::guard::InFlightGuard;
use crate::outcome::{CheckOutcome, SkipReason};

pub struct CalendarEventNotifier {
    events: Arc<dyn EventProvider>,
    classifier: Arc<BirthdayClassifier>,
    channel: Arc<dyn Channel>,
    guard: InFlightGuard,
}

impl CalendarEventNotifier {
    pub fn new(
        events: Arc<dyn EventProvider>,
        classifier: Arc<BirthdayClassifier>,
        channel: Arc<dyn Channel>,
    ) -> Self {
        Self {
            events,
            classifier,
            channel,
            guard: InFlightGuard::new(),
        }
    }

    /// Today first, then tomorrow. The two days never affect each other.
    pub async fn check_and_notify(&self, today: NaiveDate) -> Vec<(NotificationKind, CheckOutcome)> {
        let days = [Day::Today, Day::Tomorrow];
        let Some(_permit) = self.guard.try_acquire() else {
            tracing::warn!("⏳ Calendar event check still running from a previous tick, skipping");
            return days
                .iter()
                .map(|day| (NotificationKind::events(*day), CheckOutcome::Skipped(SkipReason::InFlight)))
                .collect();
        };

        let mut outcomes = Vec::with_capacity(days.len());
        for day in days {
            let outcome = self.check_day(DayWindow::local(day, today)).await;
            outcomes.push((NotificationKind::events(day), outcome));
        }
        outcomes
    }

    async fn check_day(&self, window: DayWindow) -> CheckOutcome {
        let label = window.day.label();
        tracing::info!("📅 Checking calendar events for {label} ({})", window.date);

        let events: Vec<CalendarEvent> =
            match FetchOutcome::from_result(self.events.name(), self.events.fetch_events(&window).await) {
                FetchOutcome::Fetched(events) => events
                    .into_iter()
                    .filter(|e| !self.classifier.is_birthday_event(e))
                    .collect(),
                FetchOutcome::Failed { source_name, reason } => {
                    tracing::error!("❌ Events for {label} unavailable, {source_name}: {reason}");
                    return CheckOutcome::Failed(format!("{source_name}: {reason}"));
                }
            };
        tracing::info!("Found {} regular events for {label}", events.len());

        let kind = NotificationKind::events(window.day);
        let Some(message) =
            NotificationMessage::render(kind, |markup| format_events_message(&events, label, markup))
        else {
            tracing::info!("No calendar events for {label}");
            return CheckOutcome::Skipped(SkipReason::NothingToReport);
        };

        match self.channel.deliver(&message).await {
            Ok(()) => {
                tracing::info!("✅ Events for {label} sent via {}", self.channel.name());
                CheckOutcome::Delivered
            }
            Err(e) => {
                tracing::error!("❌ Events for {label} not delivered: {e}");
                CheckOutcome::Failed(e.to_string())
            }
        }
    }
}
