//! End-to-end tick behaviour with in-memory providers and a recording channel.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use daybell_core::error::{DaybellError, Result};
use daybell_core::traits::{Channel, ContactsProvider, EventProvider};
use daybell_core::types::{
    BirthDate, CalendarEvent, ContactBirthday, Day, DayWindow, NotificationKind, NotificationMessage,
};
use daybell_notifier::{BirthdayClassifier, CheckOutcome, Notifier, SkipReason};
use tokio::sync::Notify;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
}

#[derive(Default)]
struct FakeCalendar {
    today: Option<Vec<CalendarEvent>>,
    tomorrow: Option<Vec<CalendarEvent>>,
    gate: Option<Arc<Notify>>,
}

impl FakeCalendar {
    fn with(today: Option<Vec<CalendarEvent>>, tomorrow: Option<Vec<CalendarEvent>>) -> Self {
        Self {
            today,
            tomorrow,
            gate: None,
        }
    }
}

#[async_trait]
impl EventProvider for FakeCalendar {
    fn name(&self) -> &str {
        "fake-calendar"
    }

    async fn fetch_events(&self, window: &DayWindow) -> Result<Vec<CalendarEvent>> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let events = match window.day {
            Day::Today => &self.today,
            Day::Tomorrow => &self.tomorrow,
        };
        events
            .clone()
            .ok_or_else(|| DaybellError::provider("fake-calendar", "HTTP 500 Internal Server Error"))
    }
}

struct FakeContacts(Option<Vec<ContactBirthday>>);

#[async_trait]
impl ContactsProvider for FakeContacts {
    fn name(&self) -> &str {
        "fake-contacts"
    }

    async fn fetch_birthday_contacts(&self) -> Result<Vec<ContactBirthday>> {
        self.0
            .clone()
            .ok_or_else(|| DaybellError::provider("fake-contacts", "HTTP 403 Forbidden"))
    }
}

#[derive(Default)]
struct RecordingChannel {
    sent: Mutex<Vec<NotificationMessage>>,
    fail: bool,
}

impl RecordingChannel {
    fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, message: &NotificationMessage) -> Result<()> {
        if self.fail {
            return Err(DaybellError::delivery("chat not found"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

fn ana() -> ContactBirthday {
    ContactBirthday::new("Ana", vec![BirthDate::new(5, 20)])
}

fn notifier(
    calendar: FakeCalendar,
    contacts: Option<FakeContacts>,
    channel: Arc<RecordingChannel>,
) -> Notifier {
    Notifier::new(
        Arc::new(calendar),
        contacts.map(|c| Arc::new(c) as Arc<dyn ContactsProvider>),
        channel,
        BirthdayClassifier::default(),
    )
}

#[tokio::test]
async fn test_calendar_and_contacts_birthdays_merge_in_order() {
    let channel = Arc::new(RecordingChannel::default());
    let calendar = FakeCalendar::with(Some(vec![CalendarEvent::new("Mom Birthday")]), Some(vec![]));
    let notifier = notifier(calendar, Some(FakeContacts(Some(vec![ana()]))), channel.clone());

    let report = notifier.run_tick(today()).await;

    assert_eq!(report.outcome(NotificationKind::Birthdays), Some(&CheckOutcome::Delivered));
    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Birthdays);
    assert_eq!(
        sent[0].plain,
        "🎉 Today's birthdays:\n• Mom Birthday\n• Ana\n\n🎂 Congratulations!"
    );
}

#[tokio::test]
async fn test_calendar_failure_still_delivers_contacts() {
    let channel = Arc::new(RecordingChannel::default());
    let calendar = FakeCalendar::with(None, None);
    let notifier = notifier(calendar, Some(FakeContacts(Some(vec![ana()]))), channel.clone());

    let report = notifier.run_tick(today()).await;

    assert_eq!(report.outcome(NotificationKind::Birthdays), Some(&CheckOutcome::Delivered));
    assert!(report.outcome(NotificationKind::EventsToday).unwrap().is_failed());
    assert!(report.outcome(NotificationKind::EventsTomorrow).unwrap().is_failed());

    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].plain, "🎉 Today is Ana's birthday! 🎂");
}

#[tokio::test]
async fn test_contacts_failure_still_delivers_calendar() {
    let channel = Arc::new(RecordingChannel::default());
    let calendar = FakeCalendar::with(Some(vec![CalendarEvent::new("Mom Birthday")]), Some(vec![]));
    let notifier = notifier(calendar, Some(FakeContacts(None)), channel.clone());

    let outcome = notifier.check_birthdays(today()).await;

    assert_eq!(outcome, CheckOutcome::Delivered);
    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Birthdays);
    assert_eq!(sent[0].plain, "🎉 Today is Mom Birthday's birthday! 🎂");
}

#[tokio::test]
async fn test_nothing_to_report_sends_nothing() {
    let channel = Arc::new(RecordingChannel::default());
    let calendar = FakeCalendar::with(Some(vec![]), Some(vec![]));
    let notifier = notifier(calendar, Some(FakeContacts(Some(vec![]))), channel.clone());

    let report = notifier.run_tick(today()).await;

    assert!(channel.sent().is_empty());
    assert_eq!(report.delivered(), 0);
    assert!(!report.has_failures());
    for (_, outcome) in &report.outcomes {
        assert_eq!(*outcome, CheckOutcome::Skipped(SkipReason::NothingToReport));
    }
}

#[tokio::test]
async fn test_both_birthday_sources_failing_is_a_failure() {
    let channel = Arc::new(RecordingChannel::default());
    let notifier = notifier(FakeCalendar::with(None, None), Some(FakeContacts(None)), channel.clone());

    let outcome = notifier.check_birthdays(today()).await;

    match outcome {
        CheckOutcome::Failed(reason) => {
            assert!(reason.contains("fake-calendar"));
            assert!(reason.contains("fake-contacts"));
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(channel.sent().is_empty());
}

#[tokio::test]
async fn test_today_failure_does_not_block_tomorrow() {
    let channel = Arc::new(RecordingChannel::default());
    let calendar = FakeCalendar::with(None, Some(vec![CalendarEvent::new("Dentist").in_location("Clinic")]));
    let notifier = notifier(calendar, None, channel.clone());

    let outcomes = notifier.check_events(today()).await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].0, NotificationKind::EventsToday);
    assert!(outcomes[0].1.is_failed());
    assert_eq!(outcomes[1], (NotificationKind::EventsTomorrow, CheckOutcome::Delivered));

    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::EventsTomorrow);
    assert_eq!(
        sent[0].plain,
        "📅 Events for tomorrow\n\nDentist\n🕒 All day\n📍 Clinic"
    );
}

#[tokio::test]
async fn test_birthday_events_are_left_out_of_the_digest() {
    let channel = Arc::new(RecordingChannel::default());
    let calendar = FakeCalendar::with(
        Some(vec![CalendarEvent::new("Mom Birthday"), CalendarEvent::new("Standup")]),
        Some(vec![]),
    );
    let notifier = notifier(calendar, None, channel.clone());

    let report = notifier.run_tick(today()).await;

    assert_eq!(report.delivered(), 2);
    let sent = channel.sent();
    let digest = sent
        .iter()
        .find(|m| m.kind == NotificationKind::EventsToday)
        .unwrap();
    assert!(digest.plain.contains("Standup"));
    assert!(!digest.plain.contains("Mom Birthday"));

    let birthdays = sent
        .iter()
        .find(|m| m.kind == NotificationKind::Birthdays)
        .unwrap();
    assert_eq!(birthdays.plain, "🎉 Today is Mom Birthday's birthday! 🎂");
}

#[tokio::test]
async fn test_contacts_disabled_uses_calendar_only() {
    let channel = Arc::new(RecordingChannel::default());
    let notifier = notifier(FakeCalendar::with(None, None), None, channel.clone());

    // The calendar is the only source, so its failure fails the check.
    assert!(notifier.check_birthdays(today()).await.is_failed());
}

#[tokio::test]
async fn test_delivery_failure_is_reported() {
    let channel = Arc::new(RecordingChannel::failing());
    let calendar = FakeCalendar::with(Some(vec![]), Some(vec![CalendarEvent::new("Dentist")]));
    let notifier = notifier(calendar, Some(FakeContacts(Some(vec![ana()]))), channel);

    let report = notifier.run_tick(today()).await;

    assert_eq!(
        report.outcome(NotificationKind::Birthdays),
        Some(&CheckOutcome::Failed("Delivery error: chat not found".into()))
    );
    assert!(report.outcome(NotificationKind::EventsTomorrow).unwrap().is_failed());
    assert_eq!(
        report.outcome(NotificationKind::EventsToday),
        Some(&CheckOutcome::Skipped(SkipReason::NothingToReport))
    );
}

#[tokio::test]
async fn test_overlapping_run_is_skipped() {
    let gate = Arc::new(Notify::new());
    let channel = Arc::new(RecordingChannel::default());
    let calendar = FakeCalendar {
        today: Some(vec![]),
        tomorrow: Some(vec![]),
        gate: Some(gate.clone()),
    };
    let notifier = notifier(calendar, Some(FakeContacts(Some(vec![ana()]))), channel.clone());

    let (first, second, _) = tokio::join!(
        notifier.check_birthdays(today()),
        notifier.check_birthdays(today()),
        async { gate.notify_one() },
    );

    assert_eq!(first, CheckOutcome::Delivered);
    assert_eq!(second, CheckOutcome::Skipped(SkipReason::InFlight));
    assert_eq!(channel.sent().len(), 1);
}
