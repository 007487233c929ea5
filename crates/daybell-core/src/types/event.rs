//! Records produced by the event providers.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown";
pub const UNNAMED_CONTACT: &str = "Unnamed Contact";

/// One calendar occurrence on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `None` means the event lasts all day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            start: None,
            location: None,
        }
    }

    pub fn at(mut self, start: DateTime<FixedOffset>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn in_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Title for display, with blank titles treated as missing.
    pub fn display_title(&self) -> &str {
        non_blank(self.title.as_deref()).unwrap_or(UNKNOWN_TITLE)
    }

    pub fn display_location(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }
}

/// A recorded birth date. The year is irrelevant for matching and not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BirthDate {
    pub month: u32,
    pub day: u32,
}

impl BirthDate {
    pub fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    pub fn falls_on(&self, date: NaiveDate) -> bool {
        self.month == date.month() && self.day == date.day()
    }
}

/// One contact with zero or more birth dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactBirthday {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub birth_dates: Vec<BirthDate>,
}

impl ContactBirthday {
    pub fn new(display_name: impl Into<String>, birth_dates: Vec<BirthDate>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            birth_dates,
        }
    }

    pub fn display_name(&self) -> &str {
        non_blank(self.display_name.as_deref()).unwrap_or(UNNAMED_CONTACT)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_fallbacks() {
        let mut event = CalendarEvent::new("Standup");
        assert_eq!(event.display_title(), "Standup");

        event.title = Some("   ".into());
        assert_eq!(event.display_title(), UNKNOWN_TITLE);

        event.title = None;
        assert_eq!(event.display_title(), UNKNOWN_TITLE);
        assert!(event.start.is_none());
    }

    #[test]
    fn test_blank_location_is_hidden() {
        let event = CalendarEvent::new("Lunch").in_location("  ");
        assert_eq!(event.display_location(), None);

        let event = CalendarEvent::new("Lunch").in_location("Cafe");
        assert_eq!(event.display_location(), Some("Cafe"));
    }

    #[test]
    fn test_birth_date_matches_month_and_day_only() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        assert!(BirthDate::new(3, 14).falls_on(today));
        assert!(!BirthDate::new(3, 15).falls_on(today));
        assert!(!BirthDate::new(4, 14).falls_on(today));
    }

    #[test]
    fn test_contact_name_fallback() {
        let contact = ContactBirthday {
            display_name: None,
            birth_dates: vec![],
        };
        assert_eq!(contact.display_name(), UNNAMED_CONTACT);
        assert_eq!(ContactBirthday::new("Ana", vec![]).display_name(), "Ana");
    }
}
