//! Birthday classification: keyword match for events, date match for contacts.

use chrono::NaiveDate;
use daybell_core::config::ClassifierConfig;
use daybell_core::types::{CalendarEvent, ContactBirthday};

/// Decides whether a calendar event is a birthday from a keyword list.
#[derive(Debug, Clone)]
pub struct BirthdayClassifier {
    /// Lowercased, blank entries removed.
    keywords: Vec<String>,
}

impl BirthdayClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(&config.birthday_keywords)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Case-insensitive substring match on the title. Untitled events are never birthdays.
    pub fn is_birthday_event(&self, event: &CalendarEvent) -> bool {
        event
            .title
            .as_deref()
            .is_some_and(|title| self.is_birthday_title(title))
    }

    pub fn is_birthday_title(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.keywords.iter().any(|k| title.contains(k.as_str()))
    }
}

impl Default for BirthdayClassifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

/// Names of contacts born on `date`'s month and day, in source order.
/// A contact with several matching dates is listed once.
pub fn contacts_born_on(contacts: &[ContactBirthday], date: NaiveDate) -> Vec<String> {
    contacts
        .iter()
        .filter(|c| c.birth_dates.iter().any(|d| d.falls_on(date)))
        .map(|c| c.display_name().to_string())
        .collect()
}
