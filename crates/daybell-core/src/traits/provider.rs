//! Event provider traits and the outcome of a single fetch.

use async_trait::async_trait;

use crate::error::{DaybellError, Result};
use crate::types::{CalendarEvent, ContactBirthday, DayWindow};

/// A calendar source queried one day-window at a time.
#[async_trait]
pub trait EventProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Every event in the window, unfiltered.
    async fn fetch_events(&self, window: &DayWindow) -> Result<Vec<CalendarEvent>>;
}

/// A contacts source listing everybody with a recorded birthday.
#[async_trait]
pub trait ContactsProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_birthday_contacts(&self) -> Result<Vec<ContactBirthday>>;
}

/// Result of asking one source for data.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Fetched(Vec<T>),
    Failed { source_name: String, reason: String },
}

impl<T> FetchOutcome<T> {
    pub fn from_result(source_name: &str, result: Result<Vec<T>>) -> Self {
        match result {
            Ok(items) => FetchOutcome::Fetched(items),
            Err(DaybellError::Provider { source_name, message }) => FetchOutcome::Failed {
                source_name,
                reason: message,
            },
            Err(e) => FetchOutcome::Failed {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_ok() {
        match FetchOutcome::from_result("calendar", Ok(vec![1, 2])) {
            FetchOutcome::Fetched(items) => assert_eq!(items, vec![1, 2]),
            FetchOutcome::Failed { reason, .. } => panic!("unexpected failure: {reason}"),
        }
    }

    #[test]
    fn test_outcome_from_provider_error_keeps_source() {
        let outcome: FetchOutcome<u8> =
            FetchOutcome::from_result("other", Err(DaybellError::provider("contacts", "403")));
        match outcome {
            FetchOutcome::Failed { source_name, reason } => {
                assert_eq!(source_name, "contacts");
                assert_eq!(reason, "403");
            }
            FetchOutcome::Fetched(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_other_error_is_attributed_to_caller() {
        let outcome: FetchOutcome<u8> =
            FetchOutcome::from_result("calendar", Err(DaybellError::Http("reset".into())));
        match outcome {
            FetchOutcome::Failed { source_name, reason } => {
                assert_eq!(source_name, "calendar");
                assert!(reason.contains("reset"));
            }
            FetchOutcome::Fetched(_) => panic!("expected failure"),
        }
    }
}
