//! "Check birthdays" use case.

use std::sync::Arc;

use chrono::NaiveDate;
use daybell_core::traits::{Channel, ContactsProvider, EventProvider, FetchOutcome};
use daybell_core::types::{Day, DayWindow, NotificationKind, NotificationMessage};

use crate::aggregate::merge_birthday_names;
use crate::classifier::{BirthdayClassifier, contacts_born_on};
use crate::format::format_birthday_message;
use crate::guard::InFlightGuard;
use crate::outcome::{CheckOutcome, SkipReason};

/// Collects today's birthdays from the calendar and the contacts source and
/// sends one combined notification.
pub struct BirthdayNotifier {
    events: Arc<dyn EventProvider>,
    contacts: Option<Arc<dyn ContactsProvider>>,
    classifier: Arc<BirthdayClassifier>,
    channel: Arc<dyn Channel>,
    guard: InFlightGuard,
}

impl BirthdayNotifier {
    pub fn new(
        events: Arc<dyn EventProvider>,
        contacts: Option<Arc<dyn ContactsProvider>>,
        classifier: Arc<BirthdayClassifier>,
        channel: Arc<dyn Channel>,
    ) -> Self {
        Self {
            events,
            contacts,
            classifier,
            channel,
            guard: InFlightGuard::new(),
        }
    }

    pub async fn check_and_notify(&self, today: NaiveDate) -> CheckOutcome {
        let Some(_permit) = self.guard.try_acquire() else {
            tracing::warn!("⏳ Birthday check still running from a previous tick, skipping");
            return CheckOutcome::Skipped(SkipReason::InFlight);
        };

        tracing::info!("🎂 Checking birthdays for {today}");
        let mut failures = Vec::new();

        let window = DayWindow::local(Day::Today, today);
        let calendar = FetchOutcome::from_result(self.events.name(), self.events.fetch_events(&window).await);
        let calendar_names: Vec<String> = match calendar {
            FetchOutcome::Fetched(events) => events
                .iter()
                .filter(|e| self.classifier.is_birthday_event(e))
                .map(|e| e.display_title().to_string())
                .collect(),
            FetchOutcome::Failed { source_name, reason } => {
                tracing::warn!("⚠️ {source_name} failed, continuing without it: {reason}");
                failures.push(format!("{source_name}: {reason}"));
                Vec::new()
            }
        };
        tracing::info!("Found {} birthdays in calendar", calendar_names.len());

        let contact_names = match &self.contacts {
            Some(contacts) => {
                let outcome =
                    FetchOutcome::from_result(contacts.name(), contacts.fetch_birthday_contacts().await);
                match outcome {
                    FetchOutcome::Fetched(list) => {
                        let names = contacts_born_on(&list, today);
                        tracing::info!("Found {} birthdays in contacts", names.len());
                        names
                    }
                    FetchOutcome::Failed { source_name, reason } => {
                        tracing::warn!("⚠️ {source_name} failed, continuing without it: {reason}");
                        failures.push(format!("{source_name}: {reason}"));
                        Vec::new()
                    }
                }
            }
            None => Vec::new(),
        };

        let sources = 1 + usize::from(self.contacts.is_some());
        if failures.len() == sources {
            let reason = failures.join("; ");
            tracing::error!("❌ Birthday check failed, no source answered: {reason}");
            return CheckOutcome::Failed(reason);
        }

        let names = merge_birthday_names(calendar_names, contact_names);
        let Some(message) =
            NotificationMessage::render(NotificationKind::Birthdays, |markup| format_birthday_message(&names, markup))
        else {
            tracing::info!("No birthdays today");
            return CheckOutcome::Skipped(SkipReason::NothingToReport);
        };

        match self.channel.deliver(&message).await {
            Ok(()) => {
                tracing::info!("✅ Birthday notification sent via {} ({} names)", self.channel.name(), names.len());
                CheckOutcome::Delivered
            }
            Err(e) => {
                tracing::error!("❌ Birthday notification not delivered: {e}");
                CheckOutcome::Failed(e.to_string())
            }
        }
    }
}
