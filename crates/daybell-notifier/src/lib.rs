//! # Daybell Notifier
//! The notification pipeline: pulls from the providers, classifies, merges,
//! formats and hands messages to the channel.
//!
//! ```text
//! tick ─┬─ BirthdayNotifier ──── calendar + contacts → classify → merge → format → channel
//!       └─ CalendarEventNotifier ─ today, tomorrow   → classify → format → channel
//! ```

pub mod aggregate;
pub mod birthdays;
pub mod classifier;
pub mod events;
pub mod format;
pub mod guard;
pub mod outcome;

use std::sync::Arc;

use chrono::NaiveDate;
use daybell_core::traits::{Channel, ContactsProvider, EventProvider};
use daybell_core::types::NotificationKind;

pub use birthdays::BirthdayNotifier;
pub use classifier::BirthdayClassifier;
pub use events::CalendarEventNotifier;
pub use outcome::{CheckOutcome, SkipReason, TickReport};

/// Both use cases wired to the same providers and channel.
pub struct Notifier {
    birthdays: BirthdayNotifier,
    events: CalendarEventNotifier,
}

impl Notifier {
    pub fn new(
        events: Arc<dyn EventProvider>,
        contacts: Option<Arc<dyn ContactsProvider>>,
        channel: Arc<dyn Channel>,
        classifier: BirthdayClassifier,
    ) -> Self {
        let classifier = Arc::new(classifier);
        Self {
            birthdays: BirthdayNotifier::new(events.clone(), contacts, classifier.clone(), channel.clone()),
            events: CalendarEventNotifier::new(events, classifier, channel),
        }
    }

    /// One scheduled tick: both checks, concurrently.
    pub async fn run_tick(&self, today: NaiveDate) -> TickReport {
        let (birthdays, events) = tokio::join!(self.check_birthdays(today), self.check_events(today));

        let mut report = TickReport::default();
        report.push(NotificationKind::Birthdays, birthdays);
        for (kind, outcome) in events {
            report.push(kind, outcome);
        }
        log_report(&report);
        report
    }

    pub async fn check_birthdays(&self, today: NaiveDate) -> CheckOutcome {
        self.birthdays.check_and_notify(today).await
    }

    pub async fn check_events(&self, today: NaiveDate) -> Vec<(NotificationKind, CheckOutcome)> {
        self.events.check_and_notify(today).await
    }
}

fn log_report(report: &TickReport) {
    let summary: Vec<String> = report
        .outcomes
        .iter()
        .map(|(kind, outcome)| format!("{kind}={outcome}"))
        .collect();
    if report.has_failures() {
        tracing::warn!("Tick finished with failures: {}", summary.join(", "));
    } else {
        tracing::info!("Tick finished: {}", summary.join(", "));
    }
}
